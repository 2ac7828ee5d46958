//! Path visualization hooks.

use std::cell::RefCell;
use std::rc::Rc;

use zp_core::{Coord, Pos, ZoneName};

use crate::path::DirectionPath;

/// Stroke colour of the segment from the path end to an in-range target.
pub const TARGET_LINE_COLOR: &str = "#5ec8ff";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualStyle {
    pub stroke:       String,
    pub stroke_width: f32,
    pub opacity:      f32,
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self { stroke: "#ffffff".into(), stroke_width: 0.1, opacity: 0.5 }
    }
}

/// Host-side drawing surface.
pub trait PathVisualizer {
    fn poly(&mut self, zone: &ZoneName, points: &[Coord], style: &VisualStyle);
}

/// A recorded `poly` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub zone:   ZoneName,
    pub points: Vec<Coord>,
    pub style:  VisualStyle,
}

impl PathVisualizer for Vec<Polyline> {
    fn poly(&mut self, zone: &ZoneName, points: &[Coord], style: &VisualStyle) {
        self.push(Polyline { zone: zone.clone(), points: points.to_vec(), style: style.clone() });
    }
}

/// A surface shared with the host, which reads it back after the tick.
impl<V: PathVisualizer + ?Sized> PathVisualizer for Rc<RefCell<V>> {
    fn poly(&mut self, zone: &ZoneName, points: &[Coord], style: &VisualStyle) {
        self.borrow_mut().poly(zone, points, style);
    }
}

/// Draw `path` from `start`; when it stops short of a same-zone target but
/// within `range`, also draw the last leg to the target.
pub fn draw_path(
    visualizer: &mut dyn PathVisualizer,
    start: &Pos,
    path: &DirectionPath,
    target: &Pos,
    range: u8,
    style: &VisualStyle,
) {
    let points = path.points(start.coord);
    if !points.is_empty() {
        visualizer.poly(&start.zone, &points, style);
    }
    if start.zone != target.zone {
        return;
    }
    let end = points.last().copied().unwrap_or(start.coord);
    let gap = end.range_to(target.coord);
    if gap > 0 && gap <= range {
        let leg = VisualStyle { stroke: TARGET_LINE_COLOR.into(), ..style.clone() };
        visualizer.poly(&start.zone, &[end, target.coord], &leg);
    }
}
