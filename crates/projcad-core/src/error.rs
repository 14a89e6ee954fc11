//! 投影引擎错误定义
//!
//! 只有参数校验失败是致命错误。不支持的形状走诊断产物，零尺寸在缩放阶段
//! 被吸收，二者都不会出现在这里。

use thiserror::Error;

/// 参数校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("attribute `{key}` must be a finite number, got {value}")]
    NotFinite { key: String, value: f64 },

    #[error("attribute `{key}` must be positive, got {value}")]
    NonPositive { key: String, value: f64 },

    #[error("attribute `{key}` must not be negative, got {value}")]
    Negative { key: String, value: f64 },

    #[error("attribute `{key}` must lie within [{min}, {max}] degrees, got {value}")]
    AngleOutOfRange {
        key: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("attribute `{key}` expects {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("a regular polygon needs a whole number of 3 to 64 sides, got {0}")]
    InvalidSideCount(f64),

    #[error("angle {angle_deg}° has zero cosine; true length cannot be recovered")]
    ZeroCosine { angle_deg: f64 },

    #[error(
        "inclinations {angle_to_hp}° to HP and {angle_to_vp}° to VP exceed 90° in sum; \
         no line satisfies both"
    )]
    InclinationsIncompatible { angle_to_hp: f64, angle_to_vp: f64 },
}

/// 生成流程错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
}

/// 结果类型别名
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
