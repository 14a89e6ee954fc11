//! 图元生成
//!
//! 把构造、布局和信息区内容转成与输出格式无关的有序图元。每个坐标同时带
//! 逻辑值（mm）和像素值，外部渲染器/导出器直接逐个消费。
//!
//! 线宽约定：表达实形的视图（薄板的俯视图，其余类型的主视图）用粗实线，
//! 另一视图用中粗线，投影线、XY 线和信息区边框用细线。

use crate::geometry::{Construction, Feature, MarkerKind};
use crate::info::InfoReport;
use crate::layout::{PlacedBox, PlacedPoint, Placement, Sheet, ViewFrame};
use crate::math::{BoundingBox2, Point2};
use crate::projector::{DevelopmentPanel, ViewKind};
use crate::properties::WeightClass;
use crate::request::UnsupportedVariant;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 绘图图元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Primitive {
    Segment {
        p1: PlacedPoint,
        p2: PlacedPoint,
        weight: WeightClass,
    },
    /// 椭圆弧，角度为度，`0..360` 为整椭圆
    EllipticalArc {
        bbox: PlacedBox,
        start_deg: f64,
        end_deg: f64,
        weight: WeightClass,
    },
    Label {
        pos: PlacedPoint,
        text: String,
    },
}

impl Primitive {
    pub fn weight(&self) -> Option<WeightClass> {
        match self {
            Primitive::Segment { weight, .. } | Primitive::EllipticalArc { weight, .. } => {
                Some(*weight)
            }
            Primitive::Label { .. } => None,
        }
    }

    pub fn is_segment(&self) -> bool {
        matches!(self, Primitive::Segment { .. })
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Primitive::Label { .. })
    }

    fn full_ellipse(bbox: PlacedBox, weight: WeightClass) -> Self {
        Primitive::EllipticalArc {
            bbox,
            start_deg: 0.0,
            end_deg: 360.0,
            weight,
        }
    }
}

/// 一个投影视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPlaneView {
    pub view_kind: ViewKind,
    pub primitives: Vec<Primitive>,
    pub scale: f64,
    /// 逻辑原点（视图框中心）的像素位置
    pub origin: Point2,
    /// 视图框（像素）
    pub frame: BoundingBox2,
}

/// 展开图及其图元，与两视图之间没有投影线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentView {
    pub panel: DevelopmentPanel,
    pub primitives: Vec<Primitive>,
    /// 展开图自身的比例，展开区放不下时小于视图比例
    pub scale: f64,
    pub origin: Point2,
    pub frame: BoundingBox2,
}

/// 完整图纸
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub subject: String,
    pub scale: f64,
    /// XY 线
    pub reference_line: Primitive,
    /// 主视图、俯视图，顺序固定
    pub views: Vec<ProjectionPlaneView>,
    /// 投影线，`p1` 在主视图、`p2` 在俯视图
    pub projectors: Vec<Primitive>,
    pub development: Option<DevelopmentView>,
    /// 视图标题、信息区文字和边框（逻辑坐标取主视图平面）
    pub annotations: Vec<Primitive>,
    pub info: InfoReport,
}

impl Drawing {
    pub fn view(&self, kind: ViewKind) -> Option<&ProjectionPlaneView> {
        self.views.iter().find(|v| v.view_kind == kind)
    }

    /// 所有图元的总数
    pub fn primitive_count(&self) -> usize {
        1 + self.views.iter().map(|v| v.primitives.len()).sum::<usize>()
            + self.projectors.len()
            + self.annotations.len()
            + self.development.as_ref().map_or(0, |d| d.primitives.len())
    }
}

/// 仅含一条说明文字的诊断结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub variant: UnsupportedVariant,
    pub message: Primitive,
}

impl Diagnostic {
    /// 诊断文字放在信息区第一行（单位比例）
    pub fn new(variant: UnsupportedVariant, sheet: &Sheet) -> Self {
        let frame = ViewFrame::new(Point2::origin(), 1.0, sheet.info_box);
        let message = Primitive::Label {
            pos: frame.place_pixel(sheet.info_line(0)),
            text: variant.to_string(),
        };
        Self { variant, message }
    }

    pub fn text(&self) -> &str {
        match &self.message {
            Primitive::Label { text, .. } => text,
            _ => "",
        }
    }
}

/// 一次生成的结果：完整图纸或诊断，二者必居其一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "artifact", rename_all = "snake_case")]
pub enum Artifact {
    Drawing(Drawing),
    Diagnostic(Diagnostic),
}

impl Artifact {
    pub fn as_drawing(&self) -> Option<&Drawing> {
        match self {
            Artifact::Drawing(d) => Some(d),
            Artifact::Diagnostic(_) => None,
        }
    }

    pub fn as_diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Artifact::Diagnostic(d) => Some(d),
            Artifact::Drawing(_) => None,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Artifact::Diagnostic(_))
    }
}

/// 生成完整图纸
pub fn emit(
    construction: &Construction,
    sheet: &Sheet,
    placement: &Placement,
    info: InfoReport,
) -> Drawing {
    let views: Vec<ProjectionPlaneView> = ViewKind::ALL
        .iter()
        .map(|&kind| emit_view(construction, sheet, placement, kind))
        .collect();

    let projectors: Vec<Primitive> = construction
        .links
        .iter()
        .map(|link| Primitive::Segment {
            p1: placement.place(ViewKind::Front, &link.front),
            p2: placement.place(ViewKind::Top, &link.top),
            weight: WeightClass::Construction,
        })
        .collect();

    let development = construction
        .development
        .as_ref()
        .map(|panel| emit_development(panel, sheet, placement.scale));

    let drawing = Drawing {
        subject: construction.subject.clone(),
        scale: placement.scale,
        reference_line: reference_line(sheet, &placement.front),
        views,
        projectors,
        development,
        annotations: annotations(sheet, &placement.front, &info),
        info,
    };
    debug!(
        subject = %drawing.subject,
        primitives = drawing.primitive_count(),
        "drawing emitted"
    );
    drawing
}

fn view_weight(construction: &Construction, kind: ViewKind) -> WeightClass {
    if kind == construction.principal_view {
        WeightClass::Outline
    } else {
        WeightClass::Medium
    }
}

fn emit_view(
    construction: &Construction,
    sheet: &Sheet,
    placement: &Placement,
    kind: ViewKind,
) -> ProjectionPlaneView {
    let frame = placement.frame(kind);
    let weight = view_weight(construction, kind);
    let config = &sheet.config;
    let slot = match kind {
        ViewKind::Front => 0,
        ViewKind::Top => 1,
    };
    let mut primitives = Vec::new();

    for feature in &construction.sketch(kind).features {
        match feature {
            Feature::Outline(outline) => {
                for (a, b) in outline.edges() {
                    primitives.push(Primitive::Segment {
                        p1: frame.place_point(kind, a),
                        p2: frame.place_point(kind, b),
                        weight,
                    });
                }
            }
            Feature::Ellipse {
                center,
                radius_u,
                radius_v,
            } => {
                let bbox = frame.place_ellipse(kind.plane_coords(center), *radius_u, *radius_v);
                primitives.push(Primitive::full_ellipse(bbox, weight));
            }
            Feature::Marker { at, kind: marker } => {
                let radius = match marker {
                    MarkerKind::Point => config.point_marker_radius[slot],
                    MarkerKind::Endpoint => config.endpoint_marker_radius[slot],
                };
                let bbox = frame.place_marker(kind.plane_coords(at), radius);
                primitives.push(Primitive::full_ellipse(bbox, weight));
            }
        }
    }

    let [dx, dy] = config.label_offset;
    for link in &construction.links {
        let Some(name) = &link.name else { continue };
        let (at, text) = match kind {
            ViewKind::Front => (&link.front, config.label_style.front_label(name)),
            ViewKind::Top => (&link.top, config.label_style.top_label(name)),
        };
        let anchor = frame.place_point(kind, at).pixel;
        primitives.push(Primitive::Label {
            pos: frame.place_pixel(Point2::new(anchor.x + dx, anchor.y + dy)),
            text,
        });
    }

    ProjectionPlaneView {
        view_kind: kind,
        primitives,
        scale: frame.scale,
        origin: frame.origin,
        frame: frame.frame,
    }
}

fn reference_line(sheet: &Sheet, front: &ViewFrame) -> Primitive {
    let c = &sheet.config;
    Primitive::Segment {
        p1: front.place_pixel(Point2::new(c.margin, sheet.xy_y)),
        p2: front.place_pixel(Point2::new(c.canvas_width - c.margin, sheet.xy_y)),
        weight: WeightClass::Construction,
    }
}

/// 矩形的四条边
fn rectangle_segments(
    frame: &ViewFrame,
    min: Point2,
    max: Point2,
    weight: WeightClass,
) -> Vec<Primitive> {
    let corners = [
        min,
        Point2::new(max.x, min.y),
        max,
        Point2::new(min.x, max.y),
    ];
    (0..4)
        .map(|i| Primitive::Segment {
            p1: frame.place(corners[i]),
            p2: frame.place(corners[(i + 1) % 4]),
            weight,
        })
        .collect()
}

fn emit_development(
    panel: &DevelopmentPanel,
    sheet: &Sheet,
    view_scale: f64,
) -> DevelopmentView {
    let width = panel.total_width();
    let height = panel.face_height;
    let frame = sheet.development_frame(view_scale, width, height);

    let mut primitives = rectangle_segments(
        &frame,
        Point2::origin(),
        Point2::new(width, height),
        WeightClass::Outline,
    );
    for x in panel.fold_positions() {
        primitives.push(Primitive::Segment {
            p1: frame.place(Point2::new(x, 0.0)),
            p2: frame.place(Point2::new(x, height)),
            weight: WeightClass::Medium,
        });
    }
    let caption = frame.to_pixel(&Point2::origin());
    primitives.push(Primitive::Label {
        pos: frame.place_pixel(Point2::new(caption.x, caption.y + 8.0)),
        text: format!("Lateral development ({} faces)", panel.faces.len()),
    });

    DevelopmentView {
        panel: panel.clone(),
        primitives,
        scale: frame.scale,
        origin: frame.origin,
        frame: frame.frame,
    }
}

fn annotations(sheet: &Sheet, front: &ViewFrame, info: &InfoReport) -> Vec<Primitive> {
    let c = &sheet.config;
    let label = |pixel: Point2, text: String| Primitive::Label {
        pos: front.place_pixel(pixel),
        text,
    };

    let mut out = vec![
        label(
            Point2::new(c.margin + 6.0, sheet.xy_y - 30.0),
            "Front view (above XY) - first angle".to_string(),
        ),
        label(
            Point2::new(c.margin + 6.0, sheet.xy_y + 8.0),
            "Top view (below XY)".to_string(),
        ),
    ];

    // 信息区边框与文字
    let info_box = sheet.info_box;
    out.extend(rectangle_segments(
        front,
        front.to_logical(&Point2::new(info_box.min.x, info_box.max.y)),
        front.to_logical(&Point2::new(info_box.max.x, info_box.min.y)),
        WeightClass::Construction,
    ));
    let text = std::iter::once(info.title.clone()).chain(info.lines.iter().cloned());
    for (i, line) in text.enumerate() {
        out.push(label(sheet.info_line(i), line));
    }
    out
}
