//! 单位系统
//!
//! 内部统一使用毫米和度存储，只在边界（请求解析、信息面板文字）处转换。

use serde::{Deserialize, Serialize};

/// 长度单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    /// 毫米 (默认)
    #[default]
    Millimeter,
    /// 厘米
    Centimeter,
    /// 米
    Meter,
    /// 英寸
    Inch,
    /// 英尺 (12 英寸)
    Foot,
}

impl Unit {
    /// 获取单位到毫米的转换因子
    pub fn to_mm_factor(&self) -> f64 {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 10.0,
            Unit::Meter => 1000.0,
            Unit::Inch => 25.4,
            Unit::Foot => 304.8,
        }
    }

    /// 获取单位符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Foot => "ft",
        }
    }

    /// 从符号解析单位
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Some(Unit::Millimeter),
            "cm" | "centimeter" | "centimeters" => Some(Unit::Centimeter),
            "m" | "meter" | "meters" => Some(Unit::Meter),
            "in" | "inch" | "inches" | "\"" => Some(Unit::Inch),
            "ft" | "foot" | "feet" | "'" => Some(Unit::Foot),
            _ => None,
        }
    }
}

/// 单位转换
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    value * from.to_mm_factor() / to.to_mm_factor()
}

/// 角度单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AngleUnit {
    /// 度
    #[default]
    Degrees,
    /// 弧度
    Radians,
}

impl AngleUnit {
    /// 转换为度
    pub fn to_degrees(&self, value: f64) -> f64 {
        match self {
            AngleUnit::Degrees => value,
            AngleUnit::Radians => value.to_degrees(),
        }
    }

    /// 从符号解析
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deg" | "degree" | "degrees" | "°" => Some(AngleUnit::Degrees),
            "rad" | "radian" | "radians" => Some(AngleUnit::Radians),
            _ => None,
        }
    }
}

/// 带单位后缀的数值（如 `8cm`、`30deg`），已换算为毫米或度
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// 无单位数值
    Plain(f64),
    /// 长度（毫米）
    Length(f64),
    /// 角度（度）
    Angle(f64),
}

impl Measure {
    /// 换算后的数值
    pub fn value(&self) -> f64 {
        match self {
            Measure::Plain(v) | Measure::Length(v) | Measure::Angle(v) => *v,
        }
    }

    /// 解析一个数值，可带长度或角度单位后缀
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let split = text
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let (number, suffix) = text.split_at(split);
        let value: f64 = number.parse().ok()?;
        let suffix = suffix.trim();

        if suffix.is_empty() {
            return Some(Measure::Plain(value));
        }
        if let Some(unit) = Unit::from_symbol(suffix) {
            return Some(Measure::Length(convert(value, unit, Unit::Millimeter)));
        }
        AngleUnit::from_symbol(suffix).map(|unit| Measure::Angle(unit.to_degrees(value)))
    }
}

/// 格式化长度值（十进制）
pub fn format_linear(value_mm: f64, unit: Unit, precision: usize) -> String {
    let value = convert(value_mm, Unit::Millimeter, unit);
    format!("{:.prec$} {}", value, unit.symbol(), prec = precision)
}

/// 格式化角度（输入为度）
pub fn format_angle(degrees: f64, precision: usize) -> String {
    format!("{:.prec$}°", degrees, prec = precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert!((convert(1.0, Unit::Inch, Unit::Millimeter) - 25.4).abs() < 0.001);
        assert!((convert(1000.0, Unit::Millimeter, Unit::Meter) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_measure_parse() {
        assert_eq!(Measure::parse("80"), Some(Measure::Plain(80.0)));
        assert_eq!(Measure::parse("8cm"), Some(Measure::Length(80.0)));
        assert_eq!(Measure::parse("30 deg"), Some(Measure::Angle(30.0)));
        assert_eq!(Measure::parse("-1.5mm"), Some(Measure::Length(-1.5)));

        let rad = Measure::parse("0.5rad").unwrap();
        assert!((rad.value() - 28.6479).abs() < 1e-3);

        assert_eq!(Measure::parse("abc"), None);
        assert_eq!(Measure::parse("12parsecs"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_linear(25.4, Unit::Millimeter, 2), "25.40 mm");
        assert_eq!(format_linear(25.4, Unit::Inch, 1), "1.0 in");
        assert_eq!(format_angle(45.0, 1), "45.0°");
    }
}
