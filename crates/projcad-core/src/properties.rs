//! 图元视觉属性
//!
//! 工程制图的线宽约定：表达实形的主轮廓用粗线，另一视图的轮廓用中粗线，
//! 投影线、作图线和基准线用细线。

use serde::{Deserialize, Serialize};

/// 线宽等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightClass {
    /// 粗实线：主轮廓
    Outline,
    /// 中粗线：另一视图的轮廓
    Medium,
    /// 细线：投影线、作图线
    Construction,
}

impl WeightClass {
    /// 名义线宽（像素，96dpi 画布）
    pub fn nominal_pixels(&self) -> f64 {
        match self {
            WeightClass::Outline => 4.0,
            WeightClass::Medium => 3.0,
            WeightClass::Construction => 1.0,
        }
    }

    /// 名义线宽（毫米），供矢量导出器使用
    pub fn nominal_mm(&self) -> f64 {
        self.nominal_pixels() * 25.4 / 96.0
    }

    /// 是否为细线
    pub fn is_thin(&self) -> bool {
        matches!(self, WeightClass::Construction)
    }
}

impl Default for WeightClass {
    fn default() -> Self {
        WeightClass::Construction
    }
}

/// 顶点标注的撇号约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LabelStyle {
    /// 俯视图不加撇（A），主视图加一撇（A'）
    #[default]
    Standard,
    /// 俯视图一撇（A'），主视图两撇（A''）
    DoublePrimed,
}

impl LabelStyle {
    /// 俯视图中的顶点名称
    pub fn top_label(&self, name: &str) -> String {
        match self {
            LabelStyle::Standard => name.to_string(),
            LabelStyle::DoublePrimed => format!("{name}'"),
        }
    }

    /// 主视图中的顶点名称
    pub fn front_label(&self, name: &str) -> String {
        match self {
            LabelStyle::Standard => format!("{name}'"),
            LabelStyle::DoublePrimed => format!("{name}''"),
        }
    }
}

/// 第 `index` 个顶点的名称：A, B, ..., Z, A1, B1, ...
pub fn vertex_name(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{letter}{round}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_ordering() {
        assert!(WeightClass::Outline.nominal_pixels() > WeightClass::Medium.nominal_pixels());
        assert!(WeightClass::Medium.nominal_pixels() > WeightClass::Construction.nominal_pixels());
        assert!(WeightClass::Construction.is_thin());
        assert!((WeightClass::Outline.nominal_mm() - 1.0583).abs() < 1e-3);
    }

    #[test]
    fn test_label_styles() {
        assert_eq!(LabelStyle::Standard.top_label("A"), "A");
        assert_eq!(LabelStyle::Standard.front_label("A"), "A'");
        assert_eq!(LabelStyle::DoublePrimed.top_label("B"), "B'");
        assert_eq!(LabelStyle::DoublePrimed.front_label("B"), "B''");
    }

    #[test]
    fn test_vertex_names() {
        assert_eq!(vertex_name(0), "A");
        assert_eq!(vertex_name(4), "E");
        assert_eq!(vertex_name(26), "A1");
    }
}
