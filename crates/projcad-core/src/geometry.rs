//! 构造几何
//!
//! 几何构造器的输出：每个视图一组落在对应投影面上的三维特征，外加两视图
//! 之间的投影连线和可选的展开图。
//!
//! - 主视图特征落在 VP 上（`y = 0`）
//! - 俯视图特征落在 HP 上（`z = 0`）

use crate::math::{max_abs_component, Point2, Point3};
use crate::projector::{DevelopmentPanel, ViewKind};
use serde::{Deserialize, Serialize};

/// 有序的三维点列
///
/// 闭合轮廓用于薄板和立体底面，开放轮廓用于直线和棱边。点的顺序决定两视图
/// 间按下标配对的投影关系。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeOutline {
    pub points: Vec<Point3>,
    pub closed: bool,
}

impl ShapeOutline {
    pub fn closed(points: Vec<Point3>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn open(points: Vec<Point3>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// 依次相连的边（闭合轮廓包含首尾相连的一条）
    pub fn edges(&self) -> impl Iterator<Item = (&Point3, &Point3)> {
        let n = self.points.len();
        let count = match (self.closed, n) {
            (_, 0 | 1) => 0,
            (true, 2) => 1,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }
}

/// 点标记的尺寸类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// 独立的点
    Point,
    /// 直线端点
    Endpoint,
}

/// 视图内的一个特征
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    Outline(ShapeOutline),
    /// 与视图坐标轴对齐的椭圆，圆是它的特例
    Ellipse {
        center: Point3,
        radius_u: f64,
        radius_v: f64,
    },
    /// 固定像素半径的圆形标记
    Marker { at: Point3, kind: MarkerKind },
}

impl Feature {
    /// 特征所含的三维点（椭圆取四个象限点）
    pub fn points(&self, view: ViewKind) -> Vec<Point3> {
        match self {
            Feature::Outline(outline) => outline.points.clone(),
            Feature::Ellipse {
                center,
                radius_u,
                radius_v,
            } => {
                let c = view.plane_coords(center);
                [
                    Point2::new(c.x - radius_u, c.y),
                    Point2::new(c.x + radius_u, c.y),
                    Point2::new(c.x, c.y - radius_v),
                    Point2::new(c.x, c.y + radius_v),
                ]
                .iter()
                .map(|p| view.lift(p))
                .collect()
            }
            Feature::Marker { at, .. } => vec![*at],
        }
    }
}

/// 一个视图中的全部特征
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSketch {
    pub kind: ViewKind,
    pub features: Vec<Feature>,
}

impl ViewSketch {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// 视图内所有特征点
    pub fn points(&self) -> Vec<Point3> {
        self.features
            .iter()
            .flat_map(|f| f.points(self.kind))
            .collect()
    }
}

/// 两视图间的对应点，用细实线相连
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectorLink {
    /// 顶点名（无名连线不标注）
    pub name: Option<String>,
    pub front: Point3,
    pub top: Point3,
}

impl ProjectorLink {
    pub fn named(name: impl Into<String>, front: Point3, top: Point3) -> Self {
        Self {
            name: Some(name.into()),
            front,
            top,
        }
    }

    pub fn unnamed(front: Point3, top: Point3) -> Self {
        Self {
            name: None,
            front,
            top,
        }
    }
}

/// 一次请求的完整构造
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construction {
    pub subject: String,
    pub front: ViewSketch,
    pub top: ViewSketch,
    pub links: Vec<ProjectorLink>,
    pub development: Option<DevelopmentPanel>,
    /// 用粗实线绘制的视图，另一视图用中粗线
    pub principal_view: ViewKind,
}

impl Construction {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            front: ViewSketch::new(ViewKind::Front),
            top: ViewSketch::new(ViewKind::Top),
            links: Vec::new(),
            development: None,
            principal_view: ViewKind::Front,
        }
    }

    pub fn sketch(&self, kind: ViewKind) -> &ViewSketch {
        match kind {
            ViewKind::Front => &self.front,
            ViewKind::Top => &self.top,
        }
    }

    /// 整个构造在各坐标轴上的最大绝对值（mm），用于统一比例
    ///
    /// 展开图不参与：它画在视图框之外。
    pub fn extent(&self) -> f64 {
        let points: Vec<Point3> = self
            .front
            .points()
            .into_iter()
            .chain(self.top.points())
            .chain(self.links.iter().flat_map(|l| [l.front, l.top]))
            .collect();
        max_abs_component(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_outline_edges() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
        ];
        assert_eq!(ShapeOutline::closed(pts.clone()).edges().count(), 3);
        assert_eq!(ShapeOutline::open(pts).edges().count(), 2);
        assert_eq!(ShapeOutline::closed(vec![]).edges().count(), 0);
    }

    #[test]
    fn test_extent_covers_ellipses() {
        let mut c = Construction::new("test");
        c.top.push(Feature::Ellipse {
            center: Point3::origin(),
            radius_u: 25.0,
            radius_v: 25.0,
        });
        c.front.push(Feature::Marker {
            at: Point3::new(0.0, 0.0, -12.0),
            kind: MarkerKind::Point,
        });
        assert!(approx_eq(c.extent(), 25.0));
    }

    #[test]
    fn test_empty_construction_has_zero_extent() {
        assert!(approx_eq(Construction::new("empty").extent(), 0.0));
    }
}
