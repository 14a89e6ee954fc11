//! 尺寸信息计算
//!
//! 只产生说明性数值，不回写几何。直线的视图倾角同时由像素坐标和逻辑坐标
//! 求出，两者应在舍入误差内一致。

use crate::builder::line_endpoints;
use crate::error::ValidationError;
use crate::geometry::Construction;
use crate::layout::{DrawingConfig, Placement};
use crate::math::{BoundingBox2, Point2};
use crate::projector::ViewKind;
use crate::properties::vertex_name;
use crate::request::{EntitySpec, LaminaShape, LineConstruction, SolidSpec};
use crate::units::{format_angle, format_linear};
use serde::{Deserialize, Serialize};

/// 余弦绝对值低于此值视为零
const COSINE_EPSILON: f64 = 1e-12;

/// 倾斜 `angle_deg` 的线段在投影面上的视长 `|L·cos θ|`
pub fn apparent_length(true_length: f64, angle_deg: f64) -> f64 {
    (true_length * angle_deg.to_radians().cos()).abs()
}

/// 由视长反求实长 `a / |cos θ|`
///
/// 余弦为零（90°、270°……）时无法反求。
pub fn true_from_apparent(apparent: f64, angle_deg: f64) -> Result<f64, ValidationError> {
    let cos = angle_deg.to_radians().cos();
    if cos.abs() < COSINE_EPSILON {
        return Err(ValidationError::ZeroCosine { angle_deg });
    }
    Ok(apparent / cos.abs())
}

fn inclination(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 {
        return 90.0;
    }
    dy.abs().atan2(dx.abs()).to_degrees()
}

/// 像素坐标下线段与水平线的夹角（度，0..=90）
///
/// 像素 y 轴向下，取反后计算。
pub fn apparent_angle_px(p1: &Point2, p2: &Point2) -> f64 {
    inclination(p2.x - p1.x, p1.y - p2.y)
}

/// 逻辑坐标（mm，纵轴向上）下线段与水平线的夹角（度，0..=90）
pub fn apparent_angle_logical(p1: &Point2, p2: &Point2) -> f64 {
    inclination(p2.x - p1.x, p2.y - p1.y)
}

/// 直线的数值信息
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineInfo {
    pub true_length: f64,
    /// 俯视图视长 `L·cos α`
    pub apparent_top: f64,
    /// 主视图视长 `L·cos β`
    pub apparent_front: f64,
    pub angle_front_px: f64,
    pub angle_front_logical: f64,
    pub angle_top_px: f64,
    pub angle_top_logical: f64,
}

/// 信息区内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoReport {
    pub title: String,
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineInfo>,
}

struct Formatter<'a> {
    config: &'a DrawingConfig,
}

impl Formatter<'_> {
    fn length(&self, mm: f64) -> String {
        format_linear(mm, self.config.display_unit, self.config.precision)
    }

    fn angle(&self, deg: f64) -> String {
        format_angle(deg, 1)
    }
}

/// 生成信息区内容
pub fn report(
    spec: &EntitySpec,
    construction: &Construction,
    placement: &Placement,
    config: &DrawingConfig,
) -> InfoReport {
    let fmt = Formatter { config };
    let mut report = InfoReport {
        title: construction.subject.clone(),
        ..Default::default()
    };

    match spec {
        EntitySpec::Point(p) => {
            let name = vertex_name(0);
            let style = config.label_style;
            report.lines = vec![
                format!(
                    "Point {name} is {} in front of VP and {} above HP",
                    fmt.length(p.distance_in_front_of_vp),
                    fmt.length(p.height_above_hp)
                ),
                format!(
                    "Front view {} lies {} above XY",
                    style.front_label(&name),
                    fmt.length(p.height_above_hp)
                ),
                format!(
                    "Top view {} lies {} below XY",
                    style.top_label(&name),
                    fmt.length(p.distance_in_front_of_vp)
                ),
            ];
        }
        EntitySpec::Line(line) => {
            let (a, b) = line_endpoints(line);
            let angles = |view: ViewKind| {
                let pa = placement.place(view, &view.project(&a));
                let pb = placement.place(view, &view.project(&b));
                (
                    apparent_angle_px(&pa.pixel, &pb.pixel),
                    apparent_angle_logical(&pa.logical, &pb.logical),
                )
            };
            let (angle_front_px, angle_front_logical) = angles(ViewKind::Front);
            let (angle_top_px, angle_top_logical) = angles(ViewKind::Top);
            let info = LineInfo {
                true_length: line.true_length,
                apparent_top: apparent_length(line.true_length, line.angle_to_hp),
                apparent_front: apparent_length(line.true_length, line.angle_to_vp),
                angle_front_px,
                angle_front_logical,
                angle_top_px,
                angle_top_logical,
            };
            report.lines = vec![
                format!("True length L = {}", fmt.length(info.true_length)),
                format!(
                    "Apparent (top) = {} (L·cos α), α = {}",
                    fmt.length(info.apparent_top),
                    fmt.angle(line.angle_to_hp)
                ),
                format!(
                    "Apparent (front) = {} (L·cos β), β = {}",
                    fmt.length(info.apparent_front),
                    fmt.angle(line.angle_to_vp)
                ),
                format!(
                    "Apparent angle in front view (with XY) = {}",
                    fmt.angle(info.angle_front_px)
                ),
                format!(
                    "Apparent angle in top view (with XY) = {}",
                    fmt.angle(info.angle_top_px)
                ),
                match line.construction {
                    LineConstruction::PlanRotation => {
                        "Construction: fixed plan rotation (approximate)".to_string()
                    }
                    LineConstruction::Exact => {
                        "Construction: exact for both inclinations".to_string()
                    }
                },
            ];
            report.line = Some(info);
        }
        EntitySpec::Lamina(lamina) => {
            let size = match lamina.shape {
                LaminaShape::Polygon { side, .. } => format!("side = {}", fmt.length(side)),
                LaminaShape::Rectangle { width, height } => {
                    format!("{} × {}", fmt.length(width), fmt.length(height))
                }
                LaminaShape::Circle { diameter } => format!("diameter = {}", fmt.length(diameter)),
            };
            let front = BoundingBox2::from_points(
                construction
                    .front
                    .points()
                    .iter()
                    .map(|p| ViewKind::Front.plane_coords(p)),
            );
            report.lines = vec![
                format!("{} lamina, {}", lamina.shape.name(), size),
                format!(
                    "Surface inclined {} to HP, edge {} to VP",
                    fmt.angle(lamina.surface_angle_to_hp),
                    fmt.angle(lamina.edge_angle_to_vp)
                ),
                "Top view shows the true shape".to_string(),
                format!("Front view height = {}", fmt.length(front.height())),
            ];
        }
        EntitySpec::Solid(solid) => {
            let dims = match *solid {
                SolidSpec::Cube { edge } => format!("Cube, edge {}", fmt.length(edge)),
                SolidSpec::Cuboid {
                    width,
                    depth,
                    height,
                } => format!(
                    "Cuboid {} × {} base, height {}",
                    fmt.length(width),
                    fmt.length(depth),
                    fmt.length(height)
                ),
                SolidSpec::Cylinder { diameter, height } => format!(
                    "Cylinder D = {}, height = {}",
                    fmt.length(diameter),
                    fmt.length(height)
                ),
                SolidSpec::Cone { diameter, height } => format!(
                    "Cone D = {}, height = {}",
                    fmt.length(diameter),
                    fmt.length(height)
                ),
                SolidSpec::Pyramid {
                    sides,
                    base_side,
                    height,
                } => format!(
                    "Pyramid n = {}, base side = {}, height = {}",
                    sides,
                    fmt.length(base_side),
                    fmt.length(height)
                ),
                SolidSpec::Prism {
                    sides,
                    side,
                    height,
                } => format!(
                    "Regular prism n = {}, side = {}, height = {}",
                    sides,
                    fmt.length(side),
                    fmt.length(height)
                ),
            };
            report.lines.push(dims);
            if let Some(dev) = &construction.development {
                report.lines.push(format!(
                    "Lateral development: {} faces of {} × {}",
                    dev.faces.len(),
                    fmt.length(dev.face_width),
                    fmt.length(dev.face_height)
                ));
                report.lines.push(format!(
                    "Lateral surface area = {:.prec$} mm²",
                    dev.lateral_area(),
                    prec = config.precision
                ));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::layout::Sheet;
    use crate::math::approx_eq_tol;
    use crate::properties::LabelStyle;
    use crate::request::LineSpec;

    #[test]
    fn test_apparent_length() {
        assert!(approx_eq_tol(apparent_length(80.0, 30.0), 69.282, 1e-3));
        assert!(approx_eq_tol(apparent_length(80.0, 45.0), 56.569, 1e-3));
        assert!(approx_eq_tol(apparent_length(80.0, 120.0), 40.0, 1e-9));
    }

    #[test]
    fn test_true_from_apparent_round_trip() {
        for angle in [0.0, 15.0, 30.0, 45.0, 60.0, 89.0, 135.0, 200.0] {
            for length in [1.0, 80.0, 1234.5] {
                let apparent = apparent_length(length, angle);
                let restored = true_from_apparent(apparent, angle).unwrap();
                assert!(
                    approx_eq_tol(restored, length, 1e-6),
                    "angle {angle}, length {length}"
                );
            }
        }
    }

    #[test]
    fn test_true_from_apparent_zero_cosine() {
        for angle in [90.0, 270.0, -90.0] {
            assert_eq!(
                true_from_apparent(10.0, angle),
                Err(ValidationError::ZeroCosine { angle_deg: angle })
            );
        }
    }

    #[test]
    fn test_angle_helpers() {
        let a = Point2::new(0.0, 0.0);
        // 像素 y 向下：(10, -10) 在右上方
        assert!(approx_eq_tol(apparent_angle_px(&a, &Point2::new(10.0, -10.0)), 45.0, 1e-9));
        assert!(approx_eq_tol(apparent_angle_logical(&a, &Point2::new(10.0, 10.0)), 45.0, 1e-9));
        assert_eq!(apparent_angle_px(&a, &Point2::new(0.0, 5.0)), 90.0);
    }

    #[test]
    fn test_line_report_angles_agree() {
        let config = DrawingConfig::default();
        let sheet = Sheet::new(&config);
        for construction_mode in [LineConstruction::PlanRotation, LineConstruction::Exact] {
            let spec = EntitySpec::Line(LineSpec {
                true_length: 80.0,
                angle_to_hp: 30.0,
                angle_to_vp: 45.0,
                construction: construction_mode,
            });
            let construction = build(&spec);
            let placement = sheet.placement(construction.extent());
            let report = report(&spec, &construction, &placement, &config);
            let info = report.line.expect("line info");

            assert!(approx_eq_tol(info.apparent_top, 69.28, 0.01));
            assert!(approx_eq_tol(info.apparent_front, 56.57, 0.01));
            assert!(approx_eq_tol(info.angle_front_px, info.angle_front_logical, 1e-9));
            assert!(approx_eq_tol(info.angle_top_px, info.angle_top_logical, 1e-9));
            assert!(report.lines[1].contains("69.28 mm"));
        }
    }

    #[test]
    fn test_prism_report_mentions_development() {
        let config = DrawingConfig::default();
        let spec = EntitySpec::Solid(SolidSpec::Prism {
            sides: 5,
            side: 30.0,
            height: 80.0,
        });
        let construction = build(&spec);
        let placement = Sheet::new(&config).placement(construction.extent());
        let report = report(&spec, &construction, &placement, &config);
        assert!(report.lines.iter().any(|l| l.contains("5 faces")));
        assert!(report.lines.iter().any(|l| l.contains("12000.00")));
    }

    #[test]
    fn test_point_report_uses_label_style() {
        let spec = EntitySpec::Point(crate::request::PointSpec {
            distance_in_front_of_vp: 20.0,
            height_above_hp: 30.0,
        });
        let construction = build(&spec);
        for (style, front, top) in [
            (LabelStyle::Standard, "Front view A' ", "Top view A "),
            (LabelStyle::DoublePrimed, "Front view A'' ", "Top view A' "),
        ] {
            let config = DrawingConfig {
                label_style: style,
                ..Default::default()
            };
            let placement = Sheet::new(&config).placement(construction.extent());
            let report = report(&spec, &construction, &placement, &config);
            assert!(report.lines[1].starts_with(front), "{}", report.lines[1]);
            assert!(report.lines[2].starts_with(top), "{}", report.lines[2]);
        }
    }
}
