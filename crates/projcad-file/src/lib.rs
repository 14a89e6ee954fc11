//! ProjCAD 文件处理
//!
//! - 请求语法：`kind=line length=80 angle_hp=30`
//! - JSON 请求文档和图纸文档
//! - TOML 图纸配置

pub mod config;
pub mod document;
pub mod error;
pub mod grammar;

pub use config::{load_config, parse_config, save_config};
pub use document::{load_request, ArtifactDocument, DocumentMetadata, RequestDocument};
pub use error::{FileError, GrammarError};
pub use grammar::parse_request;
