//! ProjCAD 投影几何引擎
//!
//! 把一个画法几何题目（点、直线、薄板或立体，相对 HP/VP 给出）转换成第一角
//! 投影的主视图和俯视图，立体另附侧表面展开图。
//!
//! # 架构设计
//!
//! 数据单向流动：
//!
//! ```text
//! CanonicalRequest ─▶ builder ─▶ projector ─▶ layout ─▶ emitter ─▶ DrawingSink
//!                                   │
//!                                   └──────▶ info（视长、视倾角）
//! ```
//!
//! 引擎无 I/O、无全局状态，可在多线程中对独立请求并发调用。
//!
//! # 示例
//!
//! ```rust
//! use projcad_core::prelude::*;
//!
//! let request = CanonicalRequest::new("point")
//!     .with("distance_in_front_of_vp", 20.0)
//!     .with("height_above_hp", 30.0);
//!
//! let artifact = generate(&request, &DrawingConfig::default()).unwrap();
//! let drawing = artifact.as_drawing().unwrap();
//! assert_eq!(drawing.projectors.len(), 1);
//! ```

pub mod builder;
pub mod emitter;
pub mod error;
pub mod geometry;
pub mod info;
pub mod layout;
pub mod math;
pub mod projector;
pub mod properties;
pub mod request;
pub mod sink;
pub mod transform;
pub mod units;

use tracing::{debug, warn};

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::emitter::{Artifact, Diagnostic, Drawing, Primitive, ProjectionPlaneView};
    pub use crate::error::{GenerateError, ValidationError};
    pub use crate::geometry::Construction;
    pub use crate::info::{apparent_length, true_from_apparent, InfoReport};
    pub use crate::layout::{DrawingConfig, PlacedPoint, Sheet};
    pub use crate::math::{Point2, Point3, Vector2, Vector3};
    pub use crate::projector::ViewKind;
    pub use crate::properties::{LabelStyle, WeightClass};
    pub use crate::request::{AttributeValue, CanonicalRequest, EntityKind, EntitySpec};
    pub use crate::sink::DrawingSink;
    pub use crate::generate;
}

use emitter::{Artifact, Diagnostic};
use layout::{DrawingConfig, Sheet};
use request::{CanonicalRequest, Interpretation};

/// 处理一个请求
///
/// 参数校验失败返回错误，不生成任何图元；不支持的类型或形状返回诊断结果。
pub fn generate(request: &CanonicalRequest, config: &DrawingConfig) -> error::Result<Artifact> {
    let sheet = Sheet::new(config);
    let spec = match request.interpret()? {
        Interpretation::Supported(spec) => spec,
        Interpretation::Unsupported(variant) => {
            warn!(%variant, "unsupported request, emitting diagnostic");
            return Ok(Artifact::Diagnostic(Diagnostic::new(variant, &sheet)));
        }
    };
    debug!(kind = %spec.kind(), "request validated");

    let construction = builder::build(&spec);
    let placement = sheet.placement(construction.extent());
    let info = info::report(&spec, &construction, &placement, config);
    Ok(Artifact::Drawing(emitter::emit(
        &construction,
        &sheet,
        &placement,
        info,
    )))
}
