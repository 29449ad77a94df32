//! Closest-corner collision detection for resolving drag targets.

use crate::dnd::DropTarget;

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Construct from origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Corners in top-left, top-right, bottom-left, bottom-right order.
    #[must_use]
    pub fn corners(&self) -> [(f64, f64); 4] {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        [
            (self.x, self.y),
            (right, self.y),
            (self.x, bottom),
            (right, bottom),
        ]
    }

    /// Returns true when the point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Same size, moved so its top-left corner sits at `(x, y)`.
    #[must_use]
    pub const fn moved_to(&self, x: f64, y: f64) -> Self {
        Self::new(x, y, self.width, self.height)
    }
}

/// A registered drop zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droppable {
    /// Identifier reported when this zone wins.
    pub target: DropTarget,
    /// Zone bounds.
    pub rect: Rect,
}

/// Mean distance between the corresponding corners of two rectangles.
#[must_use]
pub fn corner_distance(a: &Rect, b: &Rect) -> f64 {
    let total: f64 = a
        .corners()
        .iter()
        .zip(b.corners().iter())
        .map(|(&(ax, ay), &(bx, by))| (ax - bx).hypot(ay - by))
        .sum();
    total / 4.0
}

/// Pick the droppable whose corners are closest to the dragged rectangle's corners.
///
/// Ties keep the earlier candidate. Returns `None` when there are no candidates.
#[must_use]
pub fn closest_corners(active: &Rect, droppables: &[Droppable]) -> Option<DropTarget> {
    droppables
        .iter()
        .map(|droppable| (corner_distance(active, &droppable.rect), droppable.target))
        .fold(None, |best: Option<(f64, DropTarget)>, candidate| match best {
            Some(current) if current.0 <= candidate.0 => Some(current),
            _ => Some(candidate),
        })
        .map(|(_, target)| target)
}
