// Split editor area layout engine.
// Arena binary tree whose leaves hold tab containers, with split/collapse,
// splitter geometry and layout descriptor get/set.

mod container;
mod descriptor;
mod node;

use std::collections::{HashMap, HashSet};

use sash_core::{
    ContainerId, DocumentHost, DocumentId, HostError, NodeId, Orientation, Rect, Size, Vec2,
};

pub use container::{Tab, TabContainer};
pub use descriptor::LayoutDescriptor;
pub use node::NodeKind;

use node::{handle_distance, sizes_for_handle, split_rect, Node};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("no node {0} in the split tree")]
    UnknownNode(NodeId),
    #[error("{0} is already split")]
    NotALeaf(NodeId),
    #[error("layout node has only one child")]
    MissingChild,
    #[error("layout node has both children and document states")]
    AmbiguousNode,
    #[error("layout node has neither children nor document states")]
    EmptyNode,
    #[error("current index {index} out of range for {len} documents")]
    CurrentIndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("host returned {0} but cannot resolve it")]
    DanglingDocument(DocumentId),
    #[error("{0} appears more than once in the layout")]
    DuplicateDocument(DocumentId),
}

// ──────────────────────────────────────────────
// SplitArea
// ──────────────────────────────────────────────

/// Minimum fraction of a split's extent each side keeps during a handle drag.
pub const DEFAULT_MIN_FRACTION: f32 = 0.1;

/// Handle hit-test threshold in pixels.
const HANDLE_HIT_THRESHOLD: f32 = 6.0;

#[derive(Debug)]
pub struct SplitArea {
    nodes: HashMap<NodeId, Node>,
    containers: HashMap<ContainerId, TabContainer>,
    root: NodeId,
    /// Container receiving newly opened documents.
    active: ContainerId,
    next_id: u64,
    extent: Size,
    min_fraction: f32,
    /// Split node whose handle is being dragged.
    pub(crate) active_resize: Option<NodeId>,
}

impl SplitArea {
    /// A single empty leaf with a zero extent.
    pub fn new() -> Self {
        Self::with_extent(Size::default())
    }

    pub fn with_extent(extent: Size) -> Self {
        Self::starting_at(1, extent, DEFAULT_MIN_FRACTION)
    }

    fn starting_at(next_id: u64, extent: Size, min_fraction: f32) -> Self {
        let mut area = Self {
            nodes: HashMap::new(),
            containers: HashMap::new(),
            root: NodeId(0),
            active: ContainerId(0),
            next_id,
            extent,
            min_fraction,
            active_resize: None,
        };
        let container = area.new_container();
        let root = area.insert_leaf(None, container);
        area.root = root;
        area.active = container;
        area
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn new_container(&mut self) -> ContainerId {
        let id = ContainerId(self.alloc_id());
        self.containers.insert(id, TabContainer::new(id));
        id
    }

    fn insert_leaf(&mut self, parent: Option<NodeId>, container: ContainerId) -> NodeId {
        let id = NodeId(self.alloc_id());
        self.nodes.insert(id, Node::leaf(parent, container));
        id
    }

    // ── Accessors ──────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn active_container(&self) -> ContainerId {
        self.active
    }

    /// Make `container` the one receiving new documents. False if unknown.
    pub fn set_active_container(&mut self, container: ContainerId) -> bool {
        if self.containers.contains_key(&container) {
            self.active = container;
            true
        } else {
            false
        }
    }

    pub fn extent(&self) -> Size {
        self.extent
    }

    pub fn set_extent(&mut self, extent: Size) {
        self.extent = extent;
    }

    pub fn set_min_fraction(&mut self, fraction: f32) {
        self.min_fraction = fraction.clamp(0.0, 0.45);
    }

    pub fn container(&self, id: ContainerId) -> Option<&TabContainer> {
        self.containers.get(&id)
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut TabContainer> {
        self.containers.get_mut(&id)
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Option<(NodeId, NodeId)> {
        self.nodes.get(&node).and_then(Node::children)
    }

    pub fn container_of(&self, node: NodeId) -> Option<ContainerId> {
        match self.kind(node)? {
            NodeKind::Leaf(container) => Some(container),
            NodeKind::Split { .. } => None,
        }
    }

    /// The leaf node wrapping `container`.
    pub fn leaf_of(&self, container: ContainerId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.kind == NodeKind::Leaf(container))
            .map(|(id, _)| *id)
    }

    // ── Tree queries ───────────────────────────

    pub fn is_leaf(&self, node: NodeId) -> bool {
        matches!(self.kind(node), Some(NodeKind::Leaf(_)))
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node) && self.parent(node).is_none()
    }

    /// A leaf whose container holds no documents.
    pub fn is_empty(&self, node: NodeId) -> bool {
        self.container_of(node)
            .and_then(|c| self.containers.get(&c))
            .is_some_and(TabContainer::is_empty)
    }

    /// The other child of this node's parent.
    pub fn sibling(&self, node: NodeId) -> Option<NodeId> {
        let (left, right) = self.children(self.parent(node)?)?;
        if left == node {
            Some(right)
        } else {
            Some(left)
        }
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent(id);
        }
        out
    }

    /// Root can never collapse. Otherwise an empty leaf, or any node whose
    /// sibling is a leaf, can. A non-empty leaf next to a split must wait
    /// for the deeper side to collapse first.
    pub fn is_collapsible(&self, node: NodeId) -> bool {
        if !self.nodes.contains_key(&node) || self.is_root(node) {
            return false;
        }
        if self.is_empty(node) {
            return true;
        }
        self.sibling(node).is_some_and(|s| self.is_leaf(s))
    }

    /// Leaf nodes in pre-order (left to right).
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<NodeId>) {
        match self.kind(node) {
            Some(NodeKind::Leaf(_)) => out.push(node),
            Some(NodeKind::Split { left, right, .. }) => {
                self.collect_leaves(left, out);
                self.collect_leaves(right, out);
            }
            None => {}
        }
    }

    /// Containers in pre-order (left to right).
    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.subtree_containers(self.root)
    }

    fn subtree_containers(&self, node: NodeId) -> Vec<ContainerId> {
        let mut leaves = Vec::new();
        self.collect_leaves(node, &mut leaves);
        leaves.into_iter().filter_map(|n| self.container_of(n)).collect()
    }

    /// Every open document, container by container, in tab order.
    pub fn documents(&self) -> Vec<DocumentId> {
        self.container_ids()
            .into_iter()
            .filter_map(|c| self.containers.get(&c))
            .flat_map(|c| c.documents().collect::<Vec<_>>())
            .collect()
    }

    pub fn find_document(&self, document: DocumentId) -> Option<(ContainerId, usize)> {
        self.containers
            .values()
            .find_map(|c| c.index_of(document).map(|i| (c.id(), i)))
    }

    // ── Structural edits ───────────────────────

    /// Turn a leaf into a split. The left child keeps the original
    /// container, the right child gets a new empty one which becomes
    /// active. Returns the new container.
    pub fn split(&mut self, node: NodeId, orientation: Orientation) -> Result<ContainerId, LayoutError> {
        let container = match self.kind(node) {
            Some(NodeKind::Leaf(container)) => container,
            Some(NodeKind::Split { .. }) => return Err(LayoutError::NotALeaf(node)),
            None => return Err(LayoutError::UnknownNode(node)),
        };

        let extent = self
            .node_rect(node)
            .map_or(0.0, |r| r.extent(orientation))
            .max(0.0);
        let half = (extent as u32) / 2;

        let left = self.insert_leaf(Some(node), container);
        let new_container = self.new_container();
        let right = self.insert_leaf(Some(node), new_container);
        if let Some(n) = self.nodes.get_mut(&node) {
            n.kind = NodeKind::Split {
                orientation,
                sizes: (half, half),
                left,
                right,
            };
        }
        self.active = new_container;
        log::debug!("split {node} {orientation:?}: {container} | {new_container}");
        Ok(new_container)
    }

    /// Fold `node` and its sibling back into their parent. Returns false
    /// (and changes nothing) when the node is not collapsible.
    pub fn collapse(&mut self, node: NodeId) -> bool {
        if !self.is_collapsible(node) {
            return false;
        }
        let (Some(parent), Some(sibling)) = (self.parent(node), self.sibling(node)) else {
            return false;
        };

        let node_is_leaf = self.is_leaf(node);
        let sibling_is_leaf = self.is_leaf(sibling);
        if node_is_leaf && !sibling_is_leaf {
            // Only reachable when node is empty.
            self.adopt(parent, sibling, node);
        } else if !node_is_leaf && sibling_is_leaf && self.is_empty(sibling) {
            self.adopt(parent, node, sibling);
        } else {
            self.merge_children(parent, node, sibling);
        }
        true
    }

    /// Parent takes over `keep`'s split shape; `discard` (an empty leaf)
    /// is dropped.
    fn adopt(&mut self, parent: NodeId, keep: NodeId, discard: NodeId) {
        let Some(kept) = self.nodes.remove(&keep) else {
            return;
        };
        if let Some((left, right)) = kept.children() {
            for child in [left, right] {
                if let Some(n) = self.nodes.get_mut(&child) {
                    n.parent = Some(parent);
                }
            }
        }
        let dropped = self.detach_subtree(discard);
        if let Some(n) = self.nodes.get_mut(&parent) {
            n.kind = kept.kind;
        }
        if dropped.iter().any(|c| c.id() == self.active) {
            if let Some(first) = self.subtree_containers(parent).first() {
                self.active = *first;
            }
        }
        log::debug!("collapse into {parent}: adopted shape of {keep}");
    }

    /// Merge every document under `parent` into one new container that
    /// becomes the parent's leaf content and the active container.
    fn merge_children(&mut self, parent: NodeId, node: NodeId, sibling: NodeId) {
        let current = self
            .current_document_under(node)
            .or_else(|| self.current_document_under(sibling));
        let Some((left, right)) = self.children(parent) else {
            return;
        };

        let mut tabs = Vec::new();
        for child in [left, right] {
            for mut container in self.detach_subtree(child) {
                tabs.extend(container.take_tabs());
            }
        }

        let merged = self.new_container();
        if let Some(target) = self.containers.get_mut(&merged) {
            for tab in tabs {
                target.add_document(tab, None);
            }
            if let Some(doc) = current {
                target.activate(doc);
            }
        }
        if let Some(n) = self.nodes.get_mut(&parent) {
            n.kind = NodeKind::Leaf(merged);
        }
        self.active = merged;
        log::debug!("collapse into {parent}: merged into {merged}");
    }

    /// Current document of the subtree: the active container's if it lives
    /// there, otherwise the first container that has one.
    fn current_document_under(&self, node: NodeId) -> Option<DocumentId> {
        let containers = self.subtree_containers(node);
        if containers.contains(&self.active) {
            if let Some(doc) = self.containers.get(&self.active).and_then(|c| c.current_document()) {
                return Some(doc);
            }
        }
        containers
            .iter()
            .filter_map(|c| self.containers.get(c))
            .find_map(TabContainer::current_document)
    }

    /// Remove a subtree's nodes and return its containers in pre-order.
    fn detach_subtree(&mut self, node: NodeId) -> Vec<TabContainer> {
        let mut out = Vec::new();
        self.detach_into(node, &mut out);
        out
    }

    fn detach_into(&mut self, node: NodeId, out: &mut Vec<TabContainer>) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        match removed.kind {
            NodeKind::Leaf(container) => {
                if let Some(c) = self.containers.remove(&container) {
                    out.push(c);
                }
            }
            NodeKind::Split { left, right, .. } => {
                self.detach_into(left, out);
                self.detach_into(right, out);
            }
        }
    }

    /// Set the child sizes of a split node. False on leaves.
    pub fn set_sizes(&mut self, node: NodeId, new_sizes: (u32, u32)) -> bool {
        match self.nodes.get_mut(&node).map(|n| &mut n.kind) {
            Some(NodeKind::Split { sizes, .. }) => {
                *sizes = new_sizes;
                true
            }
            _ => false,
        }
    }

    // ── Geometry ───────────────────────────────

    fn window_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.extent.width, self.extent.height)
    }

    /// Rect a node occupies within the area's extent.
    pub fn node_rect(&self, node: NodeId) -> Option<Rect> {
        if !self.nodes.contains_key(&node) {
            return None;
        }
        let mut path = self.ancestors(node);
        path.reverse();
        path.push(node);

        let mut rect = self.window_rect();
        for pair in path.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let NodeKind::Split {
                orientation,
                sizes,
                left,
                ..
            } = self.kind(parent)?
            else {
                return None;
            };
            let (left_rect, right_rect) = split_rect(rect, orientation, sizes);
            rect = if child == left { left_rect } else { right_rect };
        }
        Some(rect)
    }

    /// Rect of every container, in pre-order.
    pub fn container_rects(&self) -> Vec<(ContainerId, Rect)> {
        let mut out = Vec::new();
        self.compute_rects(self.root, self.window_rect(), &mut out);
        out
    }

    fn compute_rects(&self, node: NodeId, rect: Rect, out: &mut Vec<(ContainerId, Rect)>) {
        match self.kind(node) {
            Some(NodeKind::Leaf(container)) => out.push((container, rect)),
            Some(NodeKind::Split {
                orientation,
                sizes,
                left,
                right,
            }) => {
                let (left_rect, right_rect) = split_rect(rect, orientation, sizes);
                self.compute_rects(left, left_rect, out);
                self.compute_rects(right, right_rect, out);
            }
            None => {}
        }
    }

    /// Container under a point, if any.
    pub fn container_at(&self, position: Vec2) -> Option<ContainerId> {
        self.container_rects()
            .into_iter()
            .find(|(_, r)| r.contains(position))
            .map(|(id, _)| id)
    }

    // ── Splitter handle drag ───────────────────

    /// Start dragging the split handle nearest to `position`. Returns
    /// false when no handle is within the hit threshold.
    pub fn begin_resize(&mut self, position: Vec2) -> bool {
        let mut best: Option<(f32, NodeId)> = None;
        self.find_handle_at(self.root, self.window_rect(), position, &mut best);
        match best {
            Some((dist, node)) if dist <= HANDLE_HIT_THRESHOLD => {
                self.active_resize = Some(node);
                true
            }
            _ => false,
        }
    }

    fn find_handle_at(&self, node: NodeId, rect: Rect, position: Vec2, best: &mut Option<(f32, NodeId)>) {
        let Some(NodeKind::Split {
            orientation,
            sizes,
            left,
            right,
        }) = self.kind(node)
        else {
            return;
        };

        if let Some(dist) = handle_distance(rect, orientation, sizes, position) {
            if best.map_or(true, |(d, _)| dist < d) {
                *best = Some((dist, node));
            }
        }

        let (left_rect, right_rect) = split_rect(rect, orientation, sizes);
        self.find_handle_at(left, left_rect, position, best);
        self.find_handle_at(right, right_rect, position, best);
    }

    /// Move the handle grabbed by `begin_resize` to `position`.
    pub fn resize_to(&mut self, position: Vec2) {
        let Some(node) = self.active_resize else {
            return;
        };
        let (Some(rect), Some(NodeKind::Split { orientation, .. })) = (self.node_rect(node), self.kind(node)) else {
            self.active_resize = None;
            return;
        };
        let sizes = sizes_for_handle(rect, orientation, position, self.min_fraction);
        self.set_sizes(node, sizes);
    }

    pub fn end_resize(&mut self) {
        self.active_resize = None;
    }

    pub fn is_resizing(&self) -> bool {
        self.active_resize.is_some()
    }

    // ── Layout descriptors ─────────────────────

    /// Snapshot the whole tree.
    pub fn get_layout(&self, host: &dyn DocumentHost) -> LayoutDescriptor {
        self.layout_of(self.root, host).unwrap_or_default()
    }

    /// Snapshot the subtree rooted at `node`.
    pub fn layout_of(&self, node: NodeId, host: &dyn DocumentHost) -> Option<LayoutDescriptor> {
        match self.kind(node)? {
            NodeKind::Split {
                orientation,
                sizes,
                left,
                right,
            } => Some(LayoutDescriptor::split(
                orientation,
                sizes,
                self.layout_of(left, host)?,
                self.layout_of(right, host)?,
            )),
            NodeKind::Leaf(container) => {
                let (states, current) = self.containers.get(&container)?.serialize_states(host);
                Some(LayoutDescriptor::leaf(states, current).with_active(container == self.active))
            }
        }
    }

    /// Replace the tree with one rebuilt from `descriptor`, reopening its
    /// documents through `host`.
    ///
    /// The descriptor is validated up front and the new tree is built on
    /// the side: on failure every document opened so far is closed again
    /// and `self` is left exactly as it was. When the host hands back a
    /// document that is already open, its tab moves to the restored leaf.
    /// Open documents the descriptor does not mention move to the front of
    /// the new tree's leftmost container.
    pub fn set_layout(&mut self, descriptor: &LayoutDescriptor, host: &mut dyn DocumentHost) -> Result<(), LayoutError> {
        descriptor.validate()?;

        let mut restored = Self::starting_at(self.next_id, self.extent, self.min_fraction);
        let existing: HashSet<DocumentId> = self.documents().into_iter().collect();
        let mut ctx = RestoreCtx {
            host,
            existing,
            opened: Vec::new(),
            reused: HashSet::new(),
            marked_active: None,
        };

        let root = restored.root;
        if let Err(err) = restored.apply_layout(root, descriptor, &mut ctx) {
            log::warn!("layout restore aborted: {err}");
            for doc in ctx.opened.into_iter().rev() {
                ctx.host.close(doc);
            }
            return Err(err);
        }
        let marked_active = ctx.marked_active;
        let reused = ctx.reused;

        let mut carried = Vec::new();
        for id in self.container_ids() {
            if let Some(container) = self.containers.get_mut(&id) {
                carried.extend(
                    container
                        .take_tabs()
                        .into_iter()
                        .filter(|tab| !reused.contains(&tab.document)),
                );
            }
        }
        if !carried.is_empty() {
            let first = restored.container_ids().first().copied();
            if let Some(target) = first.and_then(|c| restored.containers.get_mut(&c)) {
                for (i, tab) in carried.into_iter().enumerate() {
                    target.add_document(tab, Some(i));
                }
            }
        }

        if let Some(container) = marked_active {
            restored.active = container;
        }
        log::debug!(
            "restored layout with {} containers, active {}",
            restored.containers.len(),
            restored.active
        );
        *self = restored;
        Ok(())
    }

    fn apply_layout(
        &mut self,
        node: NodeId,
        descriptor: &LayoutDescriptor,
        ctx: &mut RestoreCtx<'_>,
    ) -> Result<(), LayoutError> {
        if let (Some(left_desc), Some(right_desc)) = (&descriptor.left_child, &descriptor.right_child) {
            self.split(node, descriptor.orientation)?;
            let (left, right) = self.children(node).ok_or(LayoutError::UnknownNode(node))?;
            self.apply_layout(left, left_desc, ctx)?;
            self.apply_layout(right, right_desc, ctx)?;
            self.set_sizes(node, descriptor.sizes);
            return Ok(());
        }

        let container = self.container_of(node).ok_or(LayoutError::UnknownNode(node))?;
        // Documents reopen into the active container.
        self.active = container;
        for state in descriptor.document_states.iter().flatten() {
            let doc = ctx.host.open(state)?;
            if ctx.opened.contains(&doc) || ctx.reused.contains(&doc) {
                return Err(LayoutError::DuplicateDocument(doc));
            }
            if ctx.existing.contains(&doc) {
                // Already open in the old tree: its tab moves here.
                ctx.reused.insert(doc);
            } else {
                ctx.opened.push(doc);
            }
            let tab = match ctx.host.document(doc) {
                Some(document) => Tab::for_document(doc, document),
                None => return Err(LayoutError::DanglingDocument(doc)),
            };
            if let Some(target) = self.containers.get_mut(&self.active) {
                target.add_document(tab, None);
            }
        }
        if let (Some(index), Some(target)) = (descriptor.current_index, self.containers.get_mut(&container)) {
            target.set_current_index(index);
        }
        if descriptor.active {
            ctx.marked_active = Some(container);
        }
        Ok(())
    }
}

impl Default for SplitArea {
    fn default() -> Self {
        Self::new()
    }
}

struct RestoreCtx<'a> {
    host: &'a mut dyn DocumentHost,
    existing: HashSet<DocumentId>,
    /// Opened by this restore; closed again on failure.
    opened: Vec<DocumentId>,
    /// Handed back by the host while already open in the old tree.
    reused: HashSet<DocumentId>,
    marked_active: Option<ContainerId>,
}
