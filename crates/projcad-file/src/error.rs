//! 文件操作错误定义

use projcad_core::error::GenerateError;
use thiserror::Error;

/// 请求语法错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    #[error("empty request")]
    Empty,

    #[error("missing `kind=` assignment")]
    MissingKind,

    #[error("expected `key=value`, got `{0}`")]
    MalformedAssignment(String),

    #[error("attribute `{0}` given more than once")]
    DuplicateKey(String),

    #[error("invalid number `{text}` for `{key}`")]
    InvalidNumber { key: String, text: String },

    #[error("`{key}` expects {expected}, got `{text}`")]
    UnitMismatch {
        key: String,
        text: String,
        expected: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Request syntax error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Generation failed: {0}")]
    Core(#[from] GenerateError),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u32),
}

pub type Result<T> = std::result::Result<T, FileError>;
