use crate::common::config::GapSettings;
use crate::sys::geometry::{Point, Rect, Round, sticks};

/// Which edges of a tile coincide with the usable area of its monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchingEdges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl TouchingEdges {
    pub fn of(tile: Rect, usable: Rect) -> Self {
        let (tile_min, tile_max) = (tile.min(), tile.max());
        let (area_min, area_max) = (usable.min(), usable.max());
        Self {
            left: sticks(tile_min.x, area_min.x),
            right: sticks(tile_max.x, area_max.x),
            top: sticks(tile_min.y, area_min.y),
            bottom: sticks(tile_max.y, area_max.y),
        }
    }
}

/// Shrinks a tile by the outer gap on edges touching the screen and by half the
/// inner gap elsewhere, so neighbouring tiles end up one full inner gap apart.
pub fn compute_gapped_frame(tile: Rect, edges: TouchingEdges, gaps: &GapSettings) -> Rect {
    let half_h = gaps.inner.horizontal / 2.0;
    let half_v = gaps.inner.vertical / 2.0;
    let top_left = Point::new(
        if edges.left { gaps.outer.left } else { half_h },
        if edges.top { gaps.outer.top } else { half_v },
    );
    let bottom_right = Point::new(
        if edges.right { gaps.outer.right } else { half_h },
        if edges.bottom { gaps.outer.bottom } else { half_v },
    );
    tile.inset(top_left, bottom_right)
}

/// Applies gaps and the special-workspace scale, then rounds to whole pixels.
pub fn finish_frame(
    tile: Rect,
    usable: Rect,
    gaps: &GapSettings,
    scale: Option<f64>,
) -> Rect {
    let mut frame = compute_gapped_frame(tile, TouchingEdges::of(tile, usable), gaps);
    if let Some(scale) = scale {
        frame = frame.scale_centered(scale);
    }
    frame.round()
}
