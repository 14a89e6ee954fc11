//! 2D变换操作
//!
//! 平面内旋转（薄板的边与 VP 夹角）以及视图逻辑坐标到像素坐标的映射都用
//! 这里的仿射变换表达。

use crate::math::{Matrix3, Point2};
use serde::{Deserialize, Serialize};

/// 2D仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3,
}

impl Transform2D {
    /// 创建单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64) -> Self {
        #[rustfmt::skip]
        let matrix = Matrix3::new(
            1.0, 0.0, dx,
            0.0, 1.0, dy,
            0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// 创建旋转变换（绕原点，逆时针为正）
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        #[rustfmt::skip]
        let matrix = Matrix3::new(
            cos, -sin, 0.0,
            sin, cos, 0.0,
            0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// 创建缩放变换（绕原点）
    pub fn scale(sx: f64, sy: f64) -> Self {
        #[rustfmt::skip]
        let matrix = Matrix3::new(
            sx, 0.0, 0.0,
            0.0, sy, 0.0,
            0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// 视图映射：逻辑点 `(u, v)` → `origin + (u·scale, −v·scale)`
    ///
    /// 像素坐标系 y 轴向下，因此纵向取反。
    pub fn view_mapping(origin: Point2, scale: f64) -> Self {
        Self::translation(origin.x, origin.y).then(&Self::scale(scale, -scale))
    }

    /// 组合两个变换（self 在后，other 在前）
    pub fn then(&self, other: &Transform2D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// 变换一个点
    pub fn transform_point(&self, point: &Point2) -> Point2 {
        let v = self.matrix * nalgebra::Vector3::new(point.x, point.y, 1.0);
        Point2::new(v.x, v.y)
    }

    /// 获取逆变换，不可逆时为 `None`
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|m| Self { matrix: m })
    }}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
