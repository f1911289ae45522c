//! Drop zone hit testing

use crate::grid::Placement;
use crate::layout::{Bounds, Point, SplitDirection};

/// Where a dragged tab lands relative to a pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    /// Into the pane as another tab
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl DropZone {
    /// Split direction and side of the new leaf for an edge zone
    pub fn split(self) -> Option<(SplitDirection, Placement)> {
        match self {
            DropZone::Center => None,
            DropZone::Left => Some((SplitDirection::Row, Placement::Before)),
            DropZone::Right => Some((SplitDirection::Row, Placement::After)),
            DropZone::Top => Some((SplitDirection::Col, Placement::Before)),
            DropZone::Bottom => Some((SplitDirection::Col, Placement::After)),
        }
    }

    pub fn is_edge(self) -> bool {
        self != DropZone::Center
    }
}

/// Zone of `bounds` under `pointer`
///
/// The centred band covering `center_ratio` of the width and of the height
/// resolves to [`DropZone::Center`]. Outside it the nearest edge wins,
/// measured as a fraction of the pane's width or height. Points outside the
/// pane are clamped onto it and a degenerate pane is all centre.
pub fn compute_drop_zone(pointer: Point, bounds: Bounds, center_ratio: f64) -> DropZone {
    if bounds.is_degenerate() {
        return DropZone::Center;
    }

    let rx = ((pointer.x - bounds.x) / bounds.width).clamp(0.0, 1.0);
    let ry = ((pointer.y - bounds.y) / bounds.height).clamp(0.0, 1.0);

    let ratio = if center_ratio.is_finite() {
        center_ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let margin = (1.0 - ratio) / 2.0;
    let inner = margin..=(1.0 - margin);
    if inner.contains(&rx) && inner.contains(&ry) {
        return DropZone::Center;
    }

    let horizontal = if rx <= 1.0 - rx {
        (rx, DropZone::Left)
    } else {
        (1.0 - rx, DropZone::Right)
    };
    let vertical = if ry <= 1.0 - ry {
        (ry, DropZone::Top)
    } else {
        (1.0 - ry, DropZone::Bottom)
    };
    if horizontal.0 <= vertical.0 {
        horizontal.1
    } else {
        vertical.1
    }
}

/// Like [`compute_drop_zone`] but `None` when the pointer is outside the pane
pub fn zone_at(pointer: Point, bounds: Bounds, center_ratio: f64) -> Option<DropZone> {
    bounds
        .contains(pointer)
        .then(|| compute_drop_zone(pointer, bounds, center_ratio))
}
