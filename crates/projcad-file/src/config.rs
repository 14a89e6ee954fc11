//! 图纸配置文件（TOML）
//!
//! 所有字段均可省略，缺省值与 [`DrawingConfig::default`] 相同：
//!
//! ```toml
//! canvas_width = 1600.0
//! label_style = "DoublePrimed"
//! display_unit = "Centimeter"
//! ```

use crate::error::{FileError, Result};
use projcad_core::layout::DrawingConfig;
use std::path::Path;
use tracing::{debug, info};

pub fn parse_config(text: &str) -> Result<DrawingConfig> {
    let config: DrawingConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<DrawingConfig> {
    let path = path.as_ref();
    let config = parse_config(&std::fs::read_to_string(path)?)?;
    debug!(path = %path.display(), "drawing config loaded");
    Ok(config)
}

pub fn save_config(config: &DrawingConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, toml::to_string_pretty(config)?)?;
    info!(path = %path.display(), "drawing config saved");
    Ok(())
}

/// 画布必须能容纳留白和三个区域
fn validate(config: &DrawingConfig) -> Result<()> {
    let positive = [
        ("canvas_width", config.canvas_width),
        ("canvas_height", config.canvas_height),
        ("safety_factor", config.safety_factor),
        ("min_extent", config.min_extent),
        ("line_spacing", config.line_spacing),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(FileError::InvalidFormat(format!(
                "`{name}` must be positive, got {value}"
            )));
        }
    }
    if config.margin < 0.0 || 2.0 * config.margin >= config.canvas_width.min(config.canvas_height)
    {
        return Err(FileError::InvalidFormat(format!(
            "margin {} does not fit a {}x{} canvas",
            config.margin, config.canvas_width, config.canvas_height
        )));
    }
    Ok(())
}
