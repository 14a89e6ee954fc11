//! 图纸布局与比例
//!
//! 图纸按第一角投影排布：
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │  Front box           │  Info box            │
//! ├──────── XY ──────────┼──────────────────────┤
//! │  Top box             │  Development         │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! 两个视图框共用一个比例，由整个构造的最大绝对坐标一次求出，逻辑点
//! `(u, v)` 映射到 `框中心 + (u·s, −v·s)`。

use crate::math::{BoundingBox2, Point2, Point3};
use crate::projector::ViewKind;
use crate::properties::LabelStyle;
use crate::transform::Transform2D;
use crate::units::Unit;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 图纸配置
///
/// 所有尺寸单位为像素（96dpi 画布），比例相关量单位为 mm。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// 画布四周留白
    pub margin: f64,
    /// 视图框与 XY 线之间的间隙
    pub xy_clearance: f64,
    /// 求比例时视图框内扣除的边距
    pub box_padding: f64,
    /// 视图区与信息区之间的间隙
    pub info_gap: f64,
    /// 比例安全系数
    pub safety_factor: f64,
    /// 参与比例计算的最小范围（mm），小构造不会被放得过大
    pub min_extent: f64,
    /// 点标记半径（主视图, 俯视图）
    pub point_marker_radius: [f64; 2],
    /// 直线端点标记半径（主视图, 俯视图）
    pub endpoint_marker_radius: [f64; 2],
    /// 标注相对顶点的像素偏移
    pub label_offset: [f64; 2],
    /// 信息区文字行距
    pub line_spacing: f64,
    /// 展开图相对信息区左边的偏移
    pub development_offset: f64,
    pub label_style: LabelStyle,
    /// 信息区长度显示单位
    pub display_unit: Unit,
    /// 信息区数值小数位数
    pub precision: usize,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1400.0,
            canvas_height: 900.0,
            margin: 36.0,
            xy_clearance: 20.0,
            box_padding: 20.0,
            info_gap: 10.0,
            safety_factor: 2.2,
            min_extent: 100.0,
            point_marker_radius: [6.0, 5.0],
            endpoint_marker_radius: [5.0, 4.0],
            label_offset: [10.0, -10.0],
            line_spacing: 18.0,
            development_offset: 20.0,
            label_style: LabelStyle::Standard,
            display_unit: Unit::Millimeter,
            precision: 2,
        }
    }
}

/// 由配置推导出的图纸区域（像素坐标，y 轴向下）
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub config: DrawingConfig,
    /// XY 线的纵坐标
    pub xy_y: f64,
    pub front_box: BoundingBox2,
    pub top_box: BoundingBox2,
    pub info_box: BoundingBox2,
}

impl Sheet {
    pub fn new(config: &DrawingConfig) -> Self {
        let c = config;
        let xy_y = c.canvas_height / 2.0;
        let half = c.canvas_width / 2.0;
        Self {
            config: config.clone(),
            xy_y,
            front_box: BoundingBox2::from_ltrb(
                c.margin,
                c.margin,
                half - c.margin,
                xy_y - c.xy_clearance,
            ),
            top_box: BoundingBox2::from_ltrb(
                c.margin,
                xy_y + c.xy_clearance,
                half - c.margin,
                c.canvas_height - c.margin,
            ),
            info_box: BoundingBox2::from_ltrb(
                half + c.info_gap,
                c.margin,
                c.canvas_width - c.margin,
                c.canvas_height - c.margin,
            ),
        }
    }

    pub fn view_box(&self, kind: ViewKind) -> BoundingBox2 {
        match kind {
            ViewKind::Front => self.front_box,
            ViewKind::Top => self.top_box,
        }
    }

    /// 两视图共用的 mm→像素 比例
    ///
    /// 范围为零时（`min_extent` 也为零）退化为 1.0。
    pub fn scale_for(&self, extent: f64) -> f64 {
        let span = extent.max(self.config.min_extent) * self.config.safety_factor;
        if span <= 0.0 || !span.is_finite() {
            debug!(extent, "degenerate extent, falling back to unit scale");
            return 1.0;
        }
        let pad = self.config.box_padding;
        let room = [self.front_box, self.top_box]
            .iter()
            .map(|b| (b.width() - pad).min(b.height() - pad))
            .fold(f64::MAX, f64::min);
        room / span
    }

    /// 按构造范围求出比例并生成两个视图框的映射
    pub fn placement(&self, extent: f64) -> Placement {
        let scale = self.scale_for(extent);
        debug!(extent, scale, "shared view scale");
        Placement {
            scale,
            front: self.view_frame(ViewKind::Front, scale),
            top: self.view_frame(ViewKind::Top, scale),
        }
    }

    /// 某个视图框的坐标映射
    pub fn view_frame(&self, kind: ViewKind, scale: f64) -> ViewFrame {
        let frame = self.view_box(kind);
        ViewFrame::new(frame.center(), scale, frame)
    }

    /// 展开图可占用的区域：信息区内、与俯视图同高，四周留出 `development_offset`
    pub fn development_region(&self) -> BoundingBox2 {
        let offset = self.config.development_offset;
        BoundingBox2::from_ltrb(
            self.info_box.min.x + offset,
            self.top_box.min.y,
            self.info_box.max.x - offset,
            self.info_box.max.y - offset,
        )
    }

    /// 展开图的坐标映射：逻辑原点（左下角）放在展开区左侧
    ///
    /// 优先沿用视图比例；放不下时缩小到恰好填满展开区。
    pub fn development_frame(&self, view_scale: f64, width: f64, height: f64) -> ViewFrame {
        let region = self.development_region();
        let mut scale = view_scale;
        if width > 0.0 && height > 0.0 {
            let fit = (region.width() / width).min(region.height() / height);
            if fit < scale {
                debug!(view_scale, fit, "development shrunk to fit its region");
                scale = fit;
            }
        }
        let (left, top) = (region.min.x, region.min.y);
        let frame = BoundingBox2::from_ltrb(left, top, left + width * scale, top + height * scale);
        ViewFrame::new(Point2::new(left, top + height * scale), scale, frame)
    }

    /// 信息区第 `line` 行文字的位置
    pub fn info_line(&self, line: usize) -> Point2 {
        Point2::new(
            self.info_box.min.x + 8.0,
            self.info_box.min.y + 8.0 + line as f64 * self.config.line_spacing,
        )
    }
}

/// 一次生成中两个视图的映射，比例相同
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub front: ViewFrame,
    pub top: ViewFrame,
}

impl Placement {
    pub fn frame(&self, kind: ViewKind) -> &ViewFrame {
        match kind {
            ViewKind::Front => &self.front,
            ViewKind::Top => &self.top,
        }
    }

    /// 投影面上的三维点在对应视图中的位置
    pub fn place(&self, kind: ViewKind, point: &Point3) -> PlacedPoint {
        self.frame(kind).place_point(kind, point)
    }
}

/// 同时携带逻辑坐标（mm，视图平面）和像素坐标的点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedPoint {
    pub logical: Point2,
    pub pixel: Point2,
}

/// 同时携带逻辑和像素范围的包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedBox {
    pub logical: BoundingBox2,
    pub pixel: BoundingBox2,
}

/// 逻辑平面到像素的映射
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewFrame {
    /// 逻辑原点的像素位置
    pub origin: Point2,
    pub scale: f64,
    /// 区域边框（像素）
    pub frame: BoundingBox2,
    transform: Transform2D,
    inverse: Transform2D,
}

impl ViewFrame {
    pub fn new(origin: Point2, scale: f64, frame: BoundingBox2) -> Self {
        let transform = Transform2D::view_mapping(origin, scale);
        Self {
            origin,
            scale,
            frame,
            transform,
            // 比例为正时总可逆
            inverse: transform.inverse().unwrap_or_default(),
        }
    }

    pub fn to_pixel(&self, logical: &Point2) -> Point2 {
        self.transform.transform_point(logical)
    }

    pub fn to_logical(&self, pixel: &Point2) -> Point2 {
        self.inverse.transform_point(pixel)
    }

    pub fn place(&self, logical: Point2) -> PlacedPoint {
        PlacedPoint {
            logical,
            pixel: self.to_pixel(&logical),
        }
    }

    /// 按像素位置放置（逻辑坐标反算）
    pub fn place_pixel(&self, pixel: Point2) -> PlacedPoint {
        PlacedPoint {
            logical: self.to_logical(&pixel),
            pixel,
        }
    }

    /// 把投影面上的三维点放到该视图中
    pub fn place_point(&self, kind: ViewKind, point: &Point3) -> PlacedPoint {
        self.place(kind.plane_coords(point))
    }

    /// 以逻辑中心和逻辑半轴放置轴对齐椭圆的外接框
    pub fn place_ellipse(&self, center: Point2, radius_u: f64, radius_v: f64) -> PlacedBox {
        let logical = BoundingBox2::around(center, radius_u, radius_v);
        let pixel = BoundingBox2::from_points([
            self.to_pixel(&logical.min),
            self.to_pixel(&logical.max),
        ]);
        PlacedBox { logical, pixel }
    }

    /// 以逻辑中心和固定像素半径放置圆形标记
    pub fn place_marker(&self, center: Point2, radius_px: f64) -> PlacedBox {
        let c = self.to_pixel(&center);
        let pixel = BoundingBox2::around(c, radius_px, radius_px);
        let r = radius_px / self.scale;
        PlacedBox {
            logical: BoundingBox2::around(center, r, r),
            pixel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol};

    #[test]
    fn test_default_sheet_regions() {
        let sheet = Sheet::new(&DrawingConfig::default());
        assert!(approx_eq(sheet.xy_y, 450.0));
        assert_eq!(sheet.front_box, BoundingBox2::from_ltrb(36.0, 36.0, 664.0, 430.0));
        assert_eq!(sheet.top_box, BoundingBox2::from_ltrb(36.0, 470.0, 664.0, 864.0));
        assert_eq!(sheet.info_box, BoundingBox2::from_ltrb(710.0, 36.0, 1364.0, 864.0));
    }

    #[test]
    fn test_scale_uses_min_extent_floor() {
        let sheet = Sheet::new(&DrawingConfig::default());
        let expected = 374.0 / 220.0;
        assert!(approx_eq_tol(sheet.scale_for(10.0), expected, 1e-12));
        assert!(approx_eq_tol(sheet.scale_for(100.0), expected, 1e-12));
        assert!(approx_eq_tol(sheet.scale_for(200.0), expected / 2.0, 1e-12));
    }

    #[test]
    fn test_zero_extent_falls_back_to_unit_scale() {
        let config = DrawingConfig {
            min_extent: 0.0,
            ..Default::default()
        };
        assert_eq!(Sheet::new(&config).scale_for(0.0), 1.0);
    }

    #[test]
    fn test_view_frame_centres_origin() {
        let sheet = Sheet::new(&DrawingConfig::default());
        let frame = sheet.view_frame(ViewKind::Top, 2.0);
        let origin = frame.to_pixel(&Point2::origin());
        assert!(approx_eq(origin.x, 350.0));
        assert!(approx_eq(origin.y, 667.0));

        let p = frame.place(Point2::new(10.0, -20.0));
        assert!(approx_eq(p.pixel.x, 370.0));
        assert!(approx_eq(p.pixel.y, 707.0));
        let back = frame.to_logical(&p.pixel);
        assert!(approx_eq(back.x, 10.0));
        assert!(approx_eq(back.y, -20.0));
    }

    #[test]
    fn test_placement_shares_scale() {
        let sheet = Sheet::new(&DrawingConfig::default());
        let placement = sheet.placement(250.0);
        assert_eq!(placement.front.scale, placement.top.scale);
        assert!(approx_eq(placement.scale, sheet.scale_for(250.0)));

        // 同一 x 在两个视图中的像素横坐标相同
        let f = placement.place(ViewKind::Front, &Point3::new(12.0, 0.0, 40.0));
        let t = placement.place(ViewKind::Top, &Point3::new(12.0, 25.0, 0.0));
        assert!(approx_eq(f.pixel.x, t.pixel.x));
        assert!(f.pixel.y < sheet.xy_y && t.pixel.y > sheet.xy_y);
    }

    #[test]
    fn test_marker_has_fixed_pixel_radius() {
        let sheet = Sheet::new(&DrawingConfig::default());
        for scale in [0.5, 3.0] {
            let frame = sheet.view_frame(ViewKind::Front, scale);
            let marker = frame.place_marker(Point2::new(0.0, 30.0), 6.0);
            assert!(approx_eq(marker.pixel.width(), 12.0));
            assert!(approx_eq(marker.logical.width(), 12.0 / scale));
        }
    }

    #[test]
    fn test_development_frame_anchors_bottom_left() {
        let sheet = Sheet::new(&DrawingConfig::default());
        let frame = sheet.development_frame(2.0, 150.0, 80.0);
        let top_left = frame.to_pixel(&Point2::new(0.0, 80.0));
        assert!(approx_eq(top_left.x, 730.0));
        assert!(approx_eq(top_left.y, 470.0));
        assert!(approx_eq(frame.frame.width(), 300.0));
    }

    #[test]
    fn test_wide_development_shrinks_into_region() {
        let sheet = Sheet::new(&DrawingConfig::default());
        let region = sheet.development_region();
        // 八棱柱展开：8 × 50 = 400 mm 宽
        let frame = sheet.development_frame(2.5, 400.0, 80.0);
        assert!(frame.scale < 2.5);
        assert!(approx_eq(frame.frame.width(), region.width()));
        assert!(frame.frame.max.x <= sheet.info_box.max.x);
        assert!(frame.frame.max.y <= sheet.info_box.max.y);
        assert!(frame.frame.max.x <= sheet.config.canvas_width);

        let tall = sheet.development_frame(2.5, 50.0, 1000.0);
        assert!(approx_eq(tall.frame.height(), region.height()));
    }
}
