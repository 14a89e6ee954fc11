//! 参数模型
//!
//! `CanonicalRequest` 是外部解析器（表单、结构化语法）交给核心的唯一输入。
//! [`CanonicalRequest::interpret`] 把松散的属性表校验成强类型的
//! [`EntitySpec`]，缺省属性取文档规定的默认值。
//!
//! 识别的属性键（大小写不敏感）：
//!
//! | 类型 | 属性 |
//! |---|---|
//! | point | `distance_in_front_of_vp`, `height_above_hp` |
//! | line | `true_length`, `angle_to_hp`, `angle_to_vp`, `construction` |
//! | lamina | `shape`, `side_or_diameter`, `width`, `height`, `surface_angle_to_hp`, `edge_angle_to_vp` |
//! | solid | `solid_type`, `sizes` |
//!
//! 未识别的键被忽略。

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 各类型的默认值
pub mod defaults {
    pub const POINT_IN_FRONT_OF_VP: f64 = 30.0;
    pub const POINT_ABOVE_HP: f64 = 30.0;

    pub const LINE_TRUE_LENGTH: f64 = 80.0;
    pub const LINE_ANGLE_TO_HP: f64 = 30.0;
    pub const LINE_ANGLE_TO_VP: f64 = 45.0;

    pub const LAMINA_SIDE: f64 = 30.0;
    pub const LAMINA_SURFACE_ANGLE: f64 = 60.0;
    pub const LAMINA_EDGE_ANGLE: f64 = 0.0;
    /// 矩形缺省高度与宽度之比
    pub const RECTANGLE_ASPECT: f64 = 1.5;

    pub const CUBE_EDGE: f64 = 50.0;
    pub const CUBOID: [f64; 3] = [80.0, 50.0, 60.0];
    pub const CYLINDER: [f64; 2] = [50.0, 80.0];
    pub const CONE: [f64; 2] = [50.0, 80.0];
    pub const PYRAMID: [f64; 2] = [60.0, 80.0];
    pub const PYRAMID_SIDES: usize = 4;
    pub const PRISM_SIDES: usize = 4;
    /// 正多边形边数上限
    pub const MAX_SIDES: usize = 64;
    pub const PRISM: [f64; 2] = [50.0, 80.0];
    /// 只给出边长时，棱柱高度取边长的倍数
    pub const PRISM_HEIGHT_FROM_SIDE: f64 = 1.2;
}

/// 请求的实体类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    Point,
    Line,
    Lamina,
    Solid,
    /// 未识别的类型，原样保留名称，走诊断路径
    Other(String),
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Point => "point",
            EntityKind::Line => "line",
            EntityKind::Lamina => "lamina",
            EntityKind::Solid => "solid",
            EntityKind::Other(name) => name,
        }
    }
}

impl From<&str> for EntityKind {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "point" => EntityKind::Point,
            "line" => EntityKind::Line,
            "lamina" => EntityKind::Lamina,
            "solid" => EntityKind::Solid,
            _ => EntityKind::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self {
        EntityKind::from(s.as_str())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    List(Vec<f64>),
    Text(String),
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(v: Vec<f64>) -> Self {
        AttributeValue::List(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// 规范化请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRequest {
    pub entity_kind: EntityKind,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl CanonicalRequest {
    /// 创建不带属性的请求
    pub fn new(entity_kind: impl Into<EntityKind>) -> Self {
        Self {
            entity_kind: entity_kind.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// 设置属性（键统一为小写）
    pub fn with(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.set(key, value);
        self
    }

    /// 设置属性（键统一为小写）
    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.to_lowercase(), value.into());
    }

    /// 大小写不敏感地查找属性
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    fn number(&self, key: &str) -> Result<Option<f64>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Number(v)) => finite(key, *v).map(Some),
            Some(AttributeValue::List(values)) if values.len() == 1 => {
                finite(key, values[0]).map(Some)
            }
            Some(_) => Err(ValidationError::WrongType {
                key: key.to_string(),
                expected: "a number",
            }),
        }
    }

    fn numbers(&self, key: &str) -> Result<Vec<f64>, ValidationError> {
        let values = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(AttributeValue::Number(v)) => vec![*v],
            Some(AttributeValue::List(values)) => values.clone(),
            Some(AttributeValue::Text(_)) => {
                return Err(ValidationError::WrongType {
                    key: key.to_string(),
                    expected: "a list of numbers",
                })
            }
        };
        values.into_iter().map(|v| finite(key, v)).collect()
    }

    fn text(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Text(s)) => Ok(Some(s.trim().to_lowercase())),
            Some(_) => Err(ValidationError::WrongType {
                key: key.to_string(),
                expected: "text",
            }),
        }
    }

    fn length(&self, key: &str, default: f64) -> Result<f64, ValidationError> {
        let value = self.number(key)?.unwrap_or(default);
        positive(key, value)
    }

    fn distance(&self, key: &str, default: f64) -> Result<f64, ValidationError> {
        let value = self.number(key)?.unwrap_or(default);
        if value < 0.0 {
            return Err(ValidationError::Negative {
                key: key.to_string(),
                value,
            });
        }
        Ok(value)
    }

    fn angle(&self, key: &str, default: f64) -> Result<f64, ValidationError> {
        let value = self.number(key)?.unwrap_or(default);
        if !(0.0..=90.0).contains(&value) {
            return Err(ValidationError::AngleOutOfRange {
                key: key.to_string(),
                value,
                min: 0.0,
                max: 90.0,
            });
        }
        Ok(value)
    }

    /// 校验并解释请求
    ///
    /// 数值越界立即失败；不支持的类型、形状返回 [`Interpretation::Unsupported`]。
    pub fn interpret(&self) -> Result<Interpretation, ValidationError> {
        let spec = match &self.entity_kind {
            EntityKind::Point => EntitySpec::Point(PointSpec {
                distance_in_front_of_vp: self
                    .distance("distance_in_front_of_vp", defaults::POINT_IN_FRONT_OF_VP)?,
                height_above_hp: self.distance("height_above_hp", defaults::POINT_ABOVE_HP)?,
            }),
            EntityKind::Line => EntitySpec::Line(self.interpret_line()?),
            EntityKind::Lamina => match self.interpret_lamina()? {
                Some(lamina) => EntitySpec::Lamina(lamina),
                None => {
                    let name = self.text("shape")?.unwrap_or_default();
                    return Ok(Interpretation::Unsupported(UnsupportedVariant::new(
                        VariantCategory::LaminaShape,
                        name,
                    )));
                }
            },
            EntityKind::Solid => match self.interpret_solid()? {
                Some(solid) => EntitySpec::Solid(solid),
                None => {
                    let name = self.text("solid_type")?.unwrap_or_default();
                    return Ok(Interpretation::Unsupported(UnsupportedVariant::new(
                        VariantCategory::SolidType,
                        name,
                    )));
                }
            },
            EntityKind::Other(name) => {
                return Ok(Interpretation::Unsupported(UnsupportedVariant::new(
                    VariantCategory::EntityKind,
                    name.clone(),
                )))
            }
        };
        Ok(Interpretation::Supported(spec))
    }

    fn interpret_line(&self) -> Result<LineSpec, ValidationError> {
        let true_length = self.length("true_length", defaults::LINE_TRUE_LENGTH)?;
        let angle_to_hp = self.angle("angle_to_hp", defaults::LINE_ANGLE_TO_HP)?;
        let angle_to_vp = self.angle("angle_to_vp", defaults::LINE_ANGLE_TO_VP)?;
        let construction = match self.text("construction")?.as_deref() {
            None | Some("plan_rotation") => LineConstruction::PlanRotation,
            Some("exact") => LineConstruction::Exact,
            Some(_) => {
                return Err(ValidationError::WrongType {
                    key: "construction".to_string(),
                    expected: "`plan_rotation` or `exact`",
                })
            }
        };
        if construction == LineConstruction::Exact && angle_to_hp + angle_to_vp > 90.0 {
            return Err(ValidationError::InclinationsIncompatible {
                angle_to_hp,
                angle_to_vp,
            });
        }
        Ok(LineSpec {
            true_length,
            angle_to_hp,
            angle_to_vp,
            construction,
        })
    }

    fn interpret_lamina(&self) -> Result<Option<LaminaSpec>, ValidationError> {
        let shape_name = self.text("shape")?.unwrap_or_else(|| "triangle".to_string());
        let side = || self.length("side_or_diameter", defaults::LAMINA_SIDE);
        let shape = match shape_name.as_str() {
            "triangle" => LaminaShape::Polygon { sides: 3, side: side()? },
            "square" => {
                let side = side()?;
                LaminaShape::Rectangle {
                    width: side,
                    height: side,
                }
            }
            "pentagon" => LaminaShape::Polygon { sides: 5, side: side()? },
            "hexagon" => LaminaShape::Polygon { sides: 6, side: side()? },
            "rectangle" => {
                let width = match self.number("width")? {
                    Some(w) => positive("width", w)?,
                    None => side()?,
                };
                let height = self.length("height", width * defaults::RECTANGLE_ASPECT)?;
                LaminaShape::Rectangle { width, height }
            }
            "circle" => LaminaShape::Circle { diameter: side()? },
            _ => return Ok(None),
        };
        Ok(Some(LaminaSpec {
            shape,
            surface_angle_to_hp: self
                .angle("surface_angle_to_hp", defaults::LAMINA_SURFACE_ANGLE)?,
            edge_angle_to_vp: self.angle("edge_angle_to_vp", defaults::LAMINA_EDGE_ANGLE)?,
        }))
    }

    fn interpret_solid(&self) -> Result<Option<SolidSpec>, ValidationError> {
        let solid_type = self.text("solid_type")?.unwrap_or_else(|| "prism".to_string());
        let sizes = self.numbers("sizes")?;
        let len = |i: usize| positive("sizes", sizes[i]);

        let spec = match solid_type.as_str() {
            "cube" => SolidSpec::Cube {
                edge: if sizes.is_empty() { defaults::CUBE_EDGE } else { len(0)? },
            },
            "cuboid" => {
                let [width, depth, height] = if sizes.len() >= 3 {
                    [len(0)?, len(1)?, len(2)?]
                } else {
                    defaults::CUBOID
                };
                SolidSpec::Cuboid { width, depth, height }
            }
            "cylinder" => {
                let [diameter, height] = if sizes.len() >= 2 {
                    [len(0)?, len(1)?]
                } else {
                    defaults::CYLINDER
                };
                SolidSpec::Cylinder { diameter, height }
            }
            "cone" => {
                let [diameter, height] = if sizes.len() >= 2 {
                    [len(0)?, len(1)?]
                } else {
                    defaults::CONE
                };
                SolidSpec::Cone { diameter, height }
            }
            "pyramid" => {
                let [base_side, height] = if sizes.len() >= 2 {
                    [len(0)?, len(1)?]
                } else {
                    defaults::PYRAMID
                };
                let sides = match sizes.get(2) {
                    Some(n) => side_count(*n)?,
                    None => defaults::PYRAMID_SIDES,
                };
                SolidSpec::Pyramid {
                    sides,
                    base_side,
                    height,
                }
            }
            "prism" => {
                let (sides, side, height) = match sizes.len() {
                    0 => (defaults::PRISM_SIDES, defaults::PRISM[0], defaults::PRISM[1]),
                    1 => {
                        let side = len(0)?;
                        (
                            defaults::PRISM_SIDES,
                            side,
                            side * defaults::PRISM_HEIGHT_FROM_SIDE,
                        )
                    }
                    2 => (defaults::PRISM_SIDES, len(0)?, len(1)?),
                    _ => (side_count(sizes[0])?, len(1)?, len(2)?),
                };
                SolidSpec::Prism {
                    sides,
                    side,
                    height,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(spec))
    }
}

fn finite(key: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            key: key.to_string(),
            value,
        })
    }
}

fn positive(key: &str, value: f64) -> Result<f64, ValidationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive {
            key: key.to_string(),
            value,
        })
    }
}

fn side_count(value: f64) -> Result<usize, ValidationError> {
    if value.fract() != 0.0 || !(3.0..=defaults::MAX_SIDES as f64).contains(&value) {
        return Err(ValidationError::InvalidSideCount(value));
    }
    Ok(value as usize)
}

/// 解释结果
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Supported(EntitySpec),
    Unsupported(UnsupportedVariant),
}

/// 不支持的变体所属类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantCategory {
    EntityKind,
    LaminaShape,
    SolidType,
}

/// 不支持的类型/形状，可恢复：生成诊断产物
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedVariant {
    pub category: VariantCategory,
    pub name: String,
}

impl UnsupportedVariant {
    pub fn new(category: VariantCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl fmt::Display for UnsupportedVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            VariantCategory::EntityKind => write!(
                f,
                "Question type `{}` is not supported. Use point, line, lamina or solid.",
                self.name
            ),
            VariantCategory::LaminaShape => write!(
                f,
                "Shape `{}` not recognized for lamina. Supported: triangle, square, rectangle, \
                 pentagon, hexagon, circle.",
                self.name
            ),
            VariantCategory::SolidType => write!(
                f,
                "Solid type `{}` not yet implemented. Supported: cube, cuboid, cylinder, cone, \
                 pyramid, prism.",
                self.name
            ),
        }
    }
}

/// 强类型的实体参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntitySpec {
    Point(PointSpec),
    Line(LineSpec),
    Lamina(LaminaSpec),
    Solid(SolidSpec),
}

impl EntitySpec {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntitySpec::Point(_) => EntityKind::Point,
            EntitySpec::Line(_) => EntityKind::Line,
            EntitySpec::Lamina(_) => EntityKind::Lamina,
            EntitySpec::Solid(_) => EntityKind::Solid,
        }
    }

    /// 简短的主题描述，用作图纸标题
    pub fn subject(&self) -> String {
        match self {
            EntitySpec::Point(_) => "Point A".to_string(),
            EntitySpec::Line(_) => "Line AB".to_string(),
            EntitySpec::Lamina(lamina) => format!("{} lamina", lamina.shape.name()),
            EntitySpec::Solid(solid) => solid.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSpec {
    pub distance_in_front_of_vp: f64,
    pub height_above_hp: f64,
}

/// 直线的三维构造方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineConstruction {
    /// 固定的平面旋转角，只满足对 HP 的倾角（默认）
    #[default]
    PlanRotation,
    /// 求解同时满足对 HP、VP 倾角的方向
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub true_length: f64,
    pub angle_to_hp: f64,
    pub angle_to_vp: f64,
    pub construction: LineConstruction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LaminaShape {
    /// 正多边形（三角形、正方形、五边形、六边形）
    Polygon { sides: usize, side: f64 },
    Rectangle { width: f64, height: f64 },
    Circle { diameter: f64 },
}

impl LaminaShape {
    pub fn name(&self) -> &'static str {
        match *self {
            LaminaShape::Polygon { sides: 3, .. } => "Triangular",
            LaminaShape::Polygon { sides: 5, .. } => "Pentagonal",
            LaminaShape::Polygon { sides: 6, .. } => "Hexagonal",
            LaminaShape::Polygon { .. } => "Polygonal",
            LaminaShape::Rectangle { width, height } if width == height => "Square",
            LaminaShape::Rectangle { .. } => "Rectangular",
            LaminaShape::Circle { .. } => "Circular",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaminaSpec {
    pub shape: LaminaShape,
    pub surface_angle_to_hp: f64,
    pub edge_angle_to_vp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SolidSpec {
    Cube { edge: f64 },
    Cuboid { width: f64, depth: f64, height: f64 },
    Cylinder { diameter: f64, height: f64 },
    Cone { diameter: f64, height: f64 },
    Pyramid { sides: usize, base_side: f64, height: f64 },
    Prism { sides: usize, side: f64, height: f64 },
}

impl SolidSpec {
    pub fn name(&self) -> &'static str {
        match self {
            SolidSpec::Cube { .. } => "Cube",
            SolidSpec::Cuboid { .. } => "Cuboid",
            SolidSpec::Cylinder { .. } => "Cylinder",
            SolidSpec::Cone { .. } => "Cone",
            SolidSpec::Pyramid { .. } => "Pyramid",
            SolidSpec::Prism { .. } => "Prism",
        }
    }

    pub fn height(&self) -> f64 {
        match *self {
            SolidSpec::Cube { edge } => edge,
            SolidSpec::Cuboid { height, .. }
            | SolidSpec::Cylinder { height, .. }
            | SolidSpec::Cone { height, .. }
            | SolidSpec::Pyramid { height, .. }
            | SolidSpec::Prism { height, .. } => height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported(request: &CanonicalRequest) -> EntitySpec {
        match request.interpret().unwrap() {
            Interpretation::Supported(spec) => spec,
            other => panic!("expected supported spec, got {other:?}"),
        }
    }

    #[test]
    fn test_point_defaults() {
        let spec = supported(&CanonicalRequest::new("point"));
        assert_eq!(
            spec,
            EntitySpec::Point(PointSpec {
                distance_in_front_of_vp: 30.0,
                height_above_hp: 30.0,
            })
        );
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut request = CanonicalRequest::new("Point");
        request
            .attributes
            .insert("Distance_In_Front_Of_VP".to_string(), AttributeValue::Number(20.0));
        let EntitySpec::Point(point) = supported(&request) else {
            panic!("expected point");
        };
        assert_eq!(point.distance_in_front_of_vp, 20.0);
    }

    #[test]
    fn test_negative_length_rejected() {
        let request = CanonicalRequest::new("line").with("true_length", -5.0);
        assert!(matches!(
            request.interpret(),
            Err(ValidationError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_angle_out_of_range_rejected() {
        let request = CanonicalRequest::new("line").with("angle_to_hp", 120.0);
        assert!(matches!(
            request.interpret(),
            Err(ValidationError::AngleOutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let request = CanonicalRequest::new("point").with("height_above_hp", f64::NAN);
        assert!(matches!(
            request.interpret(),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_text_where_number_expected() {
        let request = CanonicalRequest::new("line").with("true_length", "long");
        assert!(matches!(
            request.interpret(),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn test_exact_construction_checks_inclinations() {
        let request = CanonicalRequest::new("line")
            .with("angle_to_hp", 50.0)
            .with("angle_to_vp", 45.0)
            .with("construction", "exact");
        assert!(matches!(
            request.interpret(),
            Err(ValidationError::InclinationsIncompatible { .. })
        ));

        // 启发式构造不检查倾角之和
        let request = CanonicalRequest::new("line")
            .with("angle_to_hp", 50.0)
            .with("angle_to_vp", 45.0);
        assert!(request.interpret().is_ok());
    }

    #[test]
    fn test_rectangle_defaults_height_from_width() {
        let request = CanonicalRequest::new("lamina")
            .with("shape", "Rectangle")
            .with("width", 40.0);
        let EntitySpec::Lamina(lamina) = supported(&request) else {
            panic!("expected lamina");
        };
        assert_eq!(
            lamina.shape,
            LaminaShape::Rectangle {
                width: 40.0,
                height: 60.0
            }
        );
    }

    #[test]
    fn test_unknown_shape_is_unsupported() {
        let request = CanonicalRequest::new("lamina").with("shape", "rhombus");
        let Interpretation::Unsupported(variant) = request.interpret().unwrap() else {
            panic!("expected unsupported");
        };
        assert_eq!(variant.category, VariantCategory::LaminaShape);
        assert_eq!(variant.name, "rhombus");
        assert!(variant.to_string().contains("rhombus"));
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let request = CanonicalRequest::new("helix");
        assert_eq!(request.entity_kind, EntityKind::Other("helix".to_string()));
        assert!(matches!(
            request.interpret(),
            Ok(Interpretation::Unsupported(UnsupportedVariant {
                category: VariantCategory::EntityKind,
                ..
            }))
        ));
    }

    #[test]
    fn test_prism_size_fallbacks() {
        let cases: [(Vec<f64>, (usize, f64, f64)); 4] = [
            (vec![5.0, 30.0, 80.0], (5, 30.0, 80.0)),
            (vec![30.0, 70.0], (4, 30.0, 70.0)),
            (vec![50.0], (4, 50.0, 60.0)),
            (vec![], (4, 50.0, 80.0)),
        ];
        for (sizes, (n, s, h)) in cases {
            let request = CanonicalRequest::new("solid")
                .with("solid_type", "prism")
                .with("sizes", sizes);
            assert_eq!(
                supported(&request),
                EntitySpec::Solid(SolidSpec::Prism {
                    sides: n,
                    side: s,
                    height: h
                })
            );
        }
    }

    #[test]
    fn test_prism_side_count_validated() {
        let request = CanonicalRequest::new("solid")
            .with("solid_type", "prism")
            .with("sizes", vec![2.5, 30.0, 80.0]);
        assert_eq!(
            request.interpret(),
            Err(ValidationError::InvalidSideCount(2.5))
        );
    }

    #[test]
    fn test_huge_side_count_rejected() {
        for sides in [1e19, 65.0, f64::INFINITY] {
            let request = CanonicalRequest::new("solid")
                .with("solid_type", "prism")
                .with("sizes", vec![sides, 30.0, 80.0]);
            assert!(request.interpret().is_err(), "{sides}");
        }
        let request = CanonicalRequest::new("solid")
            .with("solid_type", "pyramid")
            .with("sizes", vec![60.0, 80.0, 1e19]);
        assert_eq!(
            request.interpret(),
            Err(ValidationError::InvalidSideCount(1e19))
        );

        let request = CanonicalRequest::new("solid")
            .with("solid_type", "prism")
            .with("sizes", vec![64.0, 5.0, 80.0]);
        assert!(matches!(
            request.interpret(),
            Ok(Interpretation::Supported(_))
        ));
    }

    #[test]
    fn test_short_cuboid_sizes_use_defaults() {
        let request = CanonicalRequest::new("solid")
            .with("solid_type", "cuboid")
            .with("sizes", vec![10.0]);
        assert_eq!(
            supported(&request),
            EntitySpec::Solid(SolidSpec::Cuboid {
                width: 80.0,
                depth: 50.0,
                height: 60.0
            })
        );
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{"entity_kind":"solid","attributes":{"solid_type":"prism","sizes":[5,30,80]}}"#;
        let request: CanonicalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.entity_kind, EntityKind::Solid);
        assert_eq!(
            request.get("sizes"),
            Some(&AttributeValue::List(vec![5.0, 30.0, 80.0]))
        );
    }
}
