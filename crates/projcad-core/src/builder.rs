//! 几何构造器
//!
//! 根据校验后的参数为每种实体合成一个最简构造。点和直线先在三维空间中定位，
//! 再由投影器落到两个投影面上；薄板和立体按固定的主视/俯视模板生成。

use crate::geometry::{Construction, Feature, MarkerKind, ProjectorLink, ShapeOutline};
use crate::math::{Point2, Point3};
use crate::projector::{develop_prism, regular_polygon, rotate_plane, ViewKind};
use crate::properties::vertex_name;
use crate::request::{
    EntitySpec, LaminaShape, LaminaSpec, LineConstruction, LineSpec, PointSpec, SolidSpec,
};
use tracing::debug;

/// 直线的平面旋转角（度），只用于避免两视图共线
pub const PLAN_ROTATION_DEG: f64 = 25.0;

/// 直线端点 A 沿 x 方向的偏移（占实长的比例），使线段大致居中
pub const LINE_OFFSET_RATIO: f64 = 0.1;

/// 圆柱主视图中端面椭圆的短半轴与半径之比
pub const RIM_ELLIPSE_RATIO: f64 = 1.0 / 3.0;

/// 棱锥顶点名
pub const APEX_NAME: &str = "O";

/// 为校验后的参数生成构造
pub fn build(spec: &EntitySpec) -> Construction {
    let construction = match spec {
        EntitySpec::Point(point) => build_point(point),
        EntitySpec::Line(line) => build_line(line),
        EntitySpec::Lamina(lamina) => build_lamina(lamina),
        EntitySpec::Solid(solid) => build_solid(solid),
    };
    debug!(
        subject = %construction.subject,
        front_features = construction.front.features.len(),
        top_features = construction.top.features.len(),
        links = construction.links.len(),
        "construction built"
    );
    construction
}

fn build_point(spec: &PointSpec) -> Construction {
    let p = Point3::new(0.0, spec.distance_in_front_of_vp, spec.height_above_hp);
    let mut c = Construction::new("Point A");
    let front = ViewKind::Front.project(&p);
    let top = ViewKind::Top.project(&p);
    c.front.push(Feature::Marker {
        at: front,
        kind: MarkerKind::Point,
    });
    c.top.push(Feature::Marker {
        at: top,
        kind: MarkerKind::Point,
    });
    c.links.push(ProjectorLink::named(vertex_name(0), front, top));
    c
}

/// 直线两端点的三维坐标
pub fn line_endpoints(spec: &LineSpec) -> (Point3, Point3) {
    let l = spec.true_length;
    let (sin_hp, cos_hp) = spec.angle_to_hp.to_radians().sin_cos();
    let dz = l * sin_hp;
    let (dx, dy) = match spec.construction {
        LineConstruction::PlanRotation => {
            let plan = l * cos_hp;
            let (sin_r, cos_r) = PLAN_ROTATION_DEG.to_radians().sin_cos();
            (plan * cos_r, plan * sin_r)
        }
        LineConstruction::Exact => {
            let dy = l * spec.angle_to_vp.to_radians().sin();
            // 校验已保证两倾角之和不超过 90°，这里只吸收舍入误差
            let dx = (l * l - dz * dz - dy * dy).max(0.0).sqrt();
            (dx, dy)
        }
    };
    let a = Point3::new(-LINE_OFFSET_RATIO * l, 0.0, 0.0);
    let b = Point3::new(a.x + dx, a.y + dy, a.z + dz);
    (a, b)
}

fn build_line(spec: &LineSpec) -> Construction {
    let (a, b) = line_endpoints(spec);
    let mut c = Construction::new("Line AB");
    for view in ViewKind::ALL {
        let (pa, pb) = (view.project(&a), view.project(&b));
        let sketch = match view {
            ViewKind::Front => &mut c.front,
            ViewKind::Top => &mut c.top,
        };
        sketch.push(Feature::Outline(ShapeOutline::open(vec![pa, pb])));
        for at in [pa, pb] {
            sketch.push(Feature::Marker {
                at,
                kind: MarkerKind::Endpoint,
            });
        }
    }
    for (i, p) in [a, b].iter().enumerate() {
        c.links.push(ProjectorLink::named(
            vertex_name(i),
            ViewKind::Front.project(p),
            ViewKind::Top.project(p),
        ));
    }
    c
}

/// 以原点为中心、左上角起顺时针的矩形角点
fn rectangle_corners(width: f64, height: f64) -> Vec<Point2> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        Point2::new(-hw, hh),
        Point2::new(hw, hh),
        Point2::new(hw, -hh),
        Point2::new(-hw, -hh),
    ]
}

fn build_lamina(spec: &LaminaSpec) -> Construction {
    let mut c = Construction::new(format!("{} lamina", spec.shape.name()));
    // 薄板的实形在俯视图中
    c.principal_view = ViewKind::Top;
    let foreshortening = spec.surface_angle_to_hp.to_radians().cos();

    let true_shape = match spec.shape {
        LaminaShape::Polygon { sides, side } => regular_polygon(sides, side),
        LaminaShape::Rectangle { width, height } => rectangle_corners(width, height),
        LaminaShape::Circle { diameter } => {
            let r = diameter / 2.0;
            c.top.push(Feature::Ellipse {
                center: Point3::origin(),
                radius_u: r,
                radius_v: r,
            });
            c.front.push(Feature::Ellipse {
                center: Point3::origin(),
                radius_u: r,
                radius_v: r * foreshortening,
            });
            c.links
                .push(ProjectorLink::unnamed(Point3::origin(), Point3::origin()));
            return c;
        }
    };

    // 俯视图为旋转后的实形，主视图横坐标不变、纵向按 cos 缩短
    let plan = rotate_plane(&true_shape, spec.edge_angle_to_vp);
    let top: Vec<Point3> = plan.iter().map(|p| ViewKind::Top.lift(p)).collect();
    let front: Vec<Point3> = plan
        .iter()
        .map(|p| ViewKind::Front.lift(&Point2::new(p.x, p.y * foreshortening)))
        .collect();

    c.links = front
        .iter()
        .zip(&top)
        .enumerate()
        .map(|(i, (f, t))| ProjectorLink::named(vertex_name(i), *f, *t))
        .collect();
    c.top.push(Feature::Outline(ShapeOutline::closed(top)));
    c.front.push(Feature::Outline(ShapeOutline::closed(front)));
    c
}

/// 主视图中的矩形轮廓（底边在 `−h/2`）
fn front_rectangle(min_x: f64, max_x: f64, height: f64) -> Feature {
    let hh = height / 2.0;
    Feature::Outline(ShapeOutline::closed(vec![
        Point3::new(min_x, 0.0, -hh),
        Point3::new(max_x, 0.0, -hh),
        Point3::new(max_x, 0.0, hh),
        Point3::new(min_x, 0.0, hh),
    ]))
}

/// 主视图中的等腰三角形轮廓
fn front_triangle(min_x: f64, max_x: f64, height: f64) -> Feature {
    let hh = height / 2.0;
    Feature::Outline(ShapeOutline::closed(vec![
        Point3::new(min_x, 0.0, -hh),
        Point3::new(max_x, 0.0, -hh),
        Point3::new((min_x + max_x) / 2.0, 0.0, hh),
    ]))
}

/// 俯视图底面轮廓，并把每个底面顶点连到主视图底边上的对应点
fn push_plan(c: &mut Construction, plan: &[Point2], height: f64) {
    let top: Vec<Point3> = plan.iter().map(|p| ViewKind::Top.lift(p)).collect();
    for (i, (p, t)) in plan.iter().zip(&top).enumerate() {
        let f = Point3::new(p.x, 0.0, -height / 2.0);
        c.links.push(ProjectorLink::named(vertex_name(i), f, *t));
    }
    c.top.push(Feature::Outline(ShapeOutline::closed(top)));
}

/// 圆形底面：俯视图为实圆，投影线取左右轮廓素线
fn push_round_plan(c: &mut Construction, radius: f64, height: f64) {
    c.top.push(Feature::Ellipse {
        center: Point3::origin(),
        radius_u: radius,
        radius_v: radius,
    });
    for x in [-radius, radius] {
        c.links.push(ProjectorLink::unnamed(
            Point3::new(x, 0.0, -height / 2.0),
            Point3::new(x, 0.0, 0.0),
        ));
    }
}

/// 立体底面：正方形底面轴对齐，其余为顶点朝上的正多边形
fn base_polygon(sides: usize, side: f64) -> Vec<Point2> {
    match sides {
        4 => rectangle_corners(side, side),
        _ => regular_polygon(sides, side),
    }
}

fn plan_width(plan: &[Point2]) -> (f64, f64) {
    plan.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
        (lo.min(p.x), hi.max(p.x))
    })
}

fn build_solid(spec: &SolidSpec) -> Construction {
    let mut c = Construction::new(spec.name());
    let height = spec.height();

    match *spec {
        SolidSpec::Cube { edge } => {
            let plan = base_polygon(4, edge);
            push_plan(&mut c, &plan, height);
            c.front.push(front_rectangle(-edge / 2.0, edge / 2.0, height));
            c.development = Some(develop_prism(4, edge, edge));
        }
        SolidSpec::Cuboid { width, depth, .. } => {
            let plan = rectangle_corners(width, depth);
            push_plan(&mut c, &plan, height);
            c.front.push(front_rectangle(-width / 2.0, width / 2.0, height));
        }
        SolidSpec::Prism { sides, side, .. } => {
            let plan = base_polygon(sides, side);
            let (min_x, max_x) = plan_width(&plan);
            push_plan(&mut c, &plan, height);
            c.front.push(front_rectangle(min_x, max_x, height));
            c.development = Some(develop_prism(sides, side, height));
        }
        SolidSpec::Pyramid {
            sides, base_side, ..
        } => {
            let plan = base_polygon(sides, base_side);
            let (min_x, max_x) = plan_width(&plan);
            push_plan(&mut c, &plan, height);
            // 俯视图中的侧棱
            let apex_top = Point3::origin();
            for p in &plan {
                c.top.push(Feature::Outline(ShapeOutline::open(vec![
                    apex_top,
                    ViewKind::Top.lift(p),
                ])));
            }
            c.front.push(front_triangle(min_x, max_x, height));
            c.links.push(ProjectorLink::named(
                APEX_NAME,
                Point3::new(0.0, 0.0, height / 2.0),
                apex_top,
            ));
        }
        SolidSpec::Cylinder { diameter, .. } => {
            let r = diameter / 2.0;
            push_round_plan(&mut c, r, height);
            c.front.push(front_rectangle(-r, r, height));
            for z in [-height / 2.0, height / 2.0] {
                c.front.push(Feature::Ellipse {
                    center: Point3::new(0.0, 0.0, z),
                    radius_u: r,
                    radius_v: r * RIM_ELLIPSE_RATIO,
                });
            }
        }
        SolidSpec::Cone { diameter, .. } => {
            let r = diameter / 2.0;
            push_round_plan(&mut c, r, height);
            c.front.push(front_triangle(-r, r, height));
            c.links.push(ProjectorLink::unnamed(
                Point3::new(0.0, 0.0, height / 2.0),
                Point3::origin(),
            ));
        }
    }
    c
}
