//! 第一角投影
//!
//! 主视图取 `(x, z)` 平面，俯视图取 `(x, −y)` 平面：距 VP 越远，俯视图中的
//! 点离 XY 线越远。侧面展开图也在这里计算。

use crate::math::{Point2, Point3};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// 投影视图类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// 主视图（投影到 VP，位于 XY 线上方）
    Front,
    /// 俯视图（投影到 HP，位于 XY 线下方）
    Top,
}

impl ViewKind {
    pub const ALL: [ViewKind; 2] = [ViewKind::Front, ViewKind::Top];

    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Front => "Front",
            ViewKind::Top => "Top",
        }
    }

    /// 沿投射方向把点落到投影面上
    pub fn project(&self, point: &Point3) -> Point3 {
        match self {
            ViewKind::Front => Point3::new(point.x, 0.0, point.z),
            ViewKind::Top => Point3::new(point.x, point.y, 0.0),
        }
    }

    /// 投影面内的二维逻辑坐标（mm），纵轴向上
    pub fn plane_coords(&self, point: &Point3) -> Point2 {
        match self {
            ViewKind::Front => Point2::new(point.x, point.z),
            ViewKind::Top => Point2::new(point.x, -point.y),
        }
    }

    /// `plane_coords` 的逆：把逻辑坐标放回投影面上的三维点
    pub fn lift(&self, coords: &Point2) -> Point3 {
        match self {
            ViewKind::Front => Point3::new(coords.x, 0.0, coords.y),
            ViewKind::Top => Point3::new(coords.x, -coords.y, 0.0),
        }
    }
}

/// 正多边形外接圆半径 `R = s / (2·sin(π/n))`
pub fn circumradius(sides: usize, side: f64) -> f64 {
    side / (2.0 * (PI / sides as f64).sin())
}

/// 以原点为中心的正多边形顶点，第一个顶点在正上方，逆时针排列
///
/// `sides` 小于 3 时按 3 处理。
pub fn regular_polygon(sides: usize, side: f64) -> Vec<Point2> {
    let n = sides.max(3);
    let r = circumradius(n, side);
    (0..n)
        .map(|i| {
            let angle = FRAC_PI_2 + 2.0 * PI * i as f64 / n as f64;
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

/// 绕原点旋转平面点（角度为度，逆时针为正）
pub fn rotate_plane(points: &[Point2], degrees: f64) -> Vec<Point2> {
    let rotation = Transform2D::rotation(degrees.to_radians());
    points.iter().map(|p| rotation.transform_point(p)).collect()
}

/// 展开图中的一个侧面（逻辑 mm，左下角为原点）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentFace {
    pub min: Point2,
    pub max: Point2,
}

impl DevelopmentFace {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// 侧表面展开：`n` 个全等矩形首尾相接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentPanel {
    pub faces: Vec<DevelopmentFace>,
    pub face_width: f64,
    pub face_height: f64,
}

impl DevelopmentPanel {
    /// 展开图总宽（周长）
    pub fn total_width(&self) -> f64 {
        self.face_width * self.faces.len() as f64
    }

    /// 侧面积
    pub fn lateral_area(&self) -> f64 {
        self.total_width() * self.face_height
    }

    /// 相邻侧面之间的折线横坐标
    pub fn fold_positions(&self) -> Vec<f64> {
        self.faces.iter().skip(1).map(|f| f.min.x).collect()
    }
}

/// 计算直棱柱（含立方体）的侧面展开
pub fn develop_prism(sides: usize, side: f64, height: f64) -> DevelopmentPanel {
    let faces = (0..sides)
        .map(|i| {
            let x0 = i as f64 * side;
            DevelopmentFace {
                min: Point2::new(x0, 0.0),
                max: Point2::new(x0 + side, height),
            }
        })
        .collect();
    DevelopmentPanel {
        faces,
        face_width: side,
        face_height: height,
    }
}
