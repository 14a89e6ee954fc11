//! 渲染器接口
//!
//! 外部渲染器/导出器实现 [`DrawingSink`]，由 [`Drawing::render_to`] 按固定
//! 顺序逐个回调：主视图、俯视图、投影线、XY 线与注释、展开图。

use crate::emitter::{Artifact, Diagnostic, Drawing, Primitive};
use crate::layout::{PlacedBox, PlacedPoint};
use crate::projector::ViewKind;
use crate::properties::WeightClass;

/// 图元所属的区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    View(ViewKind),
    Projectors,
    Sheet,
    Development,
    Diagnostic,
}

/// 图元消费者
pub trait DrawingSink {
    /// 进入一个区域
    fn begin_region(&mut self, _region: Region) {}

    /// 离开一个区域
    fn end_region(&mut self, _region: Region) {}

    fn segment(&mut self, p1: &PlacedPoint, p2: &PlacedPoint, weight: WeightClass);

    fn elliptical_arc(
        &mut self,
        bbox: &PlacedBox,
        start_deg: f64,
        end_deg: f64,
        weight: WeightClass,
    );

    fn label(&mut self, pos: &PlacedPoint, text: &str);
}

impl Primitive {
    pub fn render_to<S: DrawingSink + ?Sized>(&self, sink: &mut S) {
        match self {
            Primitive::Segment { p1, p2, weight } => sink.segment(p1, p2, *weight),
            Primitive::EllipticalArc {
                bbox,
                start_deg,
                end_deg,
                weight,
            } => sink.elliptical_arc(bbox, *start_deg, *end_deg, *weight),
            Primitive::Label { pos, text } => sink.label(pos, text),
        }
    }
}

fn render_region<'a, S: DrawingSink + ?Sized>(
    sink: &mut S,
    region: Region,
    primitives: impl IntoIterator<Item = &'a Primitive>,
) {
    sink.begin_region(region);
    for primitive in primitives {
        primitive.render_to(sink);
    }
    sink.end_region(region);
}

impl Drawing {
    pub fn render_to<S: DrawingSink + ?Sized>(&self, sink: &mut S) {
        for view in &self.views {
            render_region(sink, Region::View(view.view_kind), &view.primitives);
        }
        render_region(sink, Region::Projectors, &self.projectors);
        render_region(
            sink,
            Region::Sheet,
            std::iter::once(&self.reference_line).chain(&self.annotations),
        );
        if let Some(dev) = &self.development {
            render_region(sink, Region::Development, &dev.primitives);
        }
    }
}

impl Diagnostic {
    pub fn render_to<S: DrawingSink + ?Sized>(&self, sink: &mut S) {
        render_region(sink, Region::Diagnostic, std::iter::once(&self.message));
    }
}

impl Artifact {
    pub fn render_to<S: DrawingSink + ?Sized>(&self, sink: &mut S) {
        match self {
            Artifact::Drawing(d) => d.render_to(sink),
            Artifact::Diagnostic(d) => d.render_to(sink),
        }
    }
}

/// 按区域统计图元数量的简单消费者
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrimitiveTally {
    pub segments: usize,
    pub arcs: usize,
    pub labels: usize,
    /// 依次进入的区域
    pub regions: Vec<Region>,
}

impl PrimitiveTally {
    pub fn total(&self) -> usize {
        self.segments + self.arcs + self.labels
    }
}

impl DrawingSink for PrimitiveTally {
    fn begin_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    fn segment(&mut self, _p1: &PlacedPoint, _p2: &PlacedPoint, _weight: WeightClass) {
        self.segments += 1;
    }

    fn elliptical_arc(&mut self, _bbox: &PlacedBox, _start: f64, _end: f64, _weight: WeightClass) {
        self.arcs += 1;
    }

    fn label(&mut self, _pos: &PlacedPoint, _text: &str) {
        self.labels += 1;
    }
}
