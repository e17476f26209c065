use sash_core::{ContainerId, NodeId, Orientation, Rect, Vec2};

// ──────────────────────────────────────────────
// Node: arena slot of the split tree
// ──────────────────────────────────────────────

/// Shape of a node: a leaf wrapping one tab container, or a split owning
/// exactly two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(ContainerId),
    Split {
        orientation: Orientation,
        sizes: (u32, u32),
        left: NodeId,
        right: NodeId,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn leaf(parent: Option<NodeId>, container: ContainerId) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf(container),
        }
    }

    pub(crate) fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Split { left, right, .. } => Some((left, right)),
            NodeKind::Leaf(_) => None,
        }
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

/// Fraction of the extent given to the left/top child.
pub(crate) fn sizes_ratio(sizes: (u32, u32)) -> f32 {
    let total = sizes.0 as f32 + sizes.1 as f32;
    if total <= 0.0 {
        0.5
    } else {
        sizes.0 as f32 / total
    }
}

/// Split a rect into two sub-rects based on orientation and child sizes.
pub(crate) fn split_rect(rect: Rect, orientation: Orientation, sizes: (u32, u32)) -> (Rect, Rect) {
    let ratio = sizes_ratio(sizes);
    match orientation {
        Orientation::Horizontal => {
            let left_width = rect.width * ratio;
            let right_width = rect.width - left_width;
            (
                Rect::new(rect.x, rect.y, left_width, rect.height),
                Rect::new(rect.x + left_width, rect.y, right_width, rect.height),
            )
        }
        Orientation::Vertical => {
            let top_height = rect.height * ratio;
            let bottom_height = rect.height - top_height;
            (
                Rect::new(rect.x, rect.y, rect.width, top_height),
                Rect::new(rect.x, rect.y + top_height, rect.width, bottom_height),
            )
        }
    }
}

/// Distance from `position` to the handle between the two children of a
/// split occupying `rect`, or `None` when the position is outside the
/// handle's perpendicular extent.
pub(crate) fn handle_distance(
    rect: Rect,
    orientation: Orientation,
    sizes: (u32, u32),
    position: Vec2,
) -> Option<f32> {
    let ratio = sizes_ratio(sizes);
    match orientation {
        Orientation::Horizontal => {
            if position.y < rect.y || position.y > rect.y + rect.height {
                return None;
            }
            Some((position.x - (rect.x + rect.width * ratio)).abs())
        }
        Orientation::Vertical => {
            if position.x < rect.x || position.x > rect.x + rect.width {
                return None;
            }
            Some((position.y - (rect.y + rect.height * ratio)).abs())
        }
    }
}

/// Child sizes that put the handle of a split occupying `rect` at
/// `position`, keeping each side at least `min_fraction` of the extent.
pub(crate) fn sizes_for_handle(
    rect: Rect,
    orientation: Orientation,
    position: Vec2,
    min_fraction: f32,
) -> (u32, u32) {
    let extent = rect.extent(orientation).max(0.0);
    if extent < 1.0 {
        return (0, 0);
    }
    let offset = match orientation {
        Orientation::Horizontal => position.x - rect.x,
        Orientation::Vertical => position.y - rect.y,
    };
    let ratio = (offset / extent).clamp(min_fraction, 1.0 - min_fraction);
    let total = extent.round() as u32;
    let first = (extent * ratio).round() as u32;
    (first.min(total), total - first.min(total))
}
