use std::fmt::Write as _;
use std::path::PathBuf;

use sash_core::{ContainerId, DocumentHost, DocumentId, NodeId, Orientation, Size, Vec2};
use sash_layout::{LayoutDescriptor, LayoutError, NodeKind, SplitArea, Tab, TabContainer};

use crate::drag::DragSession;
use crate::settings::AreaSettings;

#[derive(Debug, thiserror::Error)]
pub enum AreaError {
    #[error("{0} is already open in the area")]
    AlreadyOpen(DocumentId),
    #[error("host has no document {0}")]
    UnknownDocument(DocumentId),
    #[error("no {0} in the area")]
    UnknownContainer(ContainerId),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// The editor area: a split tree of tab containers plus the bookkeeping
/// of which host documents are open and which one is active.
pub struct EditorArea<H: DocumentHost> {
    pub(crate) host: H,
    pub(crate) layout: SplitArea,
    /// Open documents in the order they were added.
    pub(crate) documents: Vec<DocumentId>,
    pub(crate) active_document: Option<DocumentId>,
    pub(crate) drag: DragSession,
    pub(crate) settings: AreaSettings,
}

impl<H: DocumentHost> EditorArea<H> {
    pub fn new(host: H) -> Self {
        Self::with_settings(host, AreaSettings::default())
    }

    pub fn with_settings(host: H, settings: AreaSettings) -> Self {
        let mut layout = SplitArea::new();
        layout.set_min_fraction(settings.min_split_fraction);
        Self {
            host,
            layout,
            documents: Vec::new(),
            active_document: None,
            drag: DragSession::default(),
            settings,
        }
    }

    // ── Accessors ──────────────────────────────

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Read-only view of the split tree. Structural edits go through the
    /// area so document bookkeeping stays in sync.
    pub fn layout(&self) -> &SplitArea {
        &self.layout
    }

    pub fn settings(&self) -> &AreaSettings {
        &self.settings
    }

    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    pub fn active_document(&self) -> Option<DocumentId> {
        self.active_document
    }

    pub fn active_container(&self) -> ContainerId {
        self.layout.active_container()
    }

    pub fn container(&self, id: ContainerId) -> Option<&TabContainer> {
        self.layout.container(id)
    }

    pub fn container_of_document(&self, document: DocumentId) -> Option<ContainerId> {
        self.layout.find_document(document).map(|(c, _)| c)
    }

    pub fn set_extent(&mut self, extent: Size) {
        self.layout.set_extent(extent);
    }

    // ── Splitter handles ───────────────────────

    /// Grab the split handle under `pos`. Ignored while a tab drag is running.
    pub fn begin_resize(&mut self, pos: Vec2) -> bool {
        if !self.drag.is_idle() {
            return false;
        }
        self.layout.begin_resize(pos)
    }

    /// Move the grabbed handle, keeping each side at least
    /// `min_split_fraction` of the split.
    pub fn resize_to(&mut self, pos: Vec2) {
        self.layout.resize_to(pos);
    }

    pub fn end_resize(&mut self) {
        self.layout.end_resize();
    }

    pub fn is_resizing(&self) -> bool {
        self.layout.is_resizing()
    }

    // ── Documents ──────────────────────────────

    /// Open `document` as a new tab at the end of the active container.
    pub fn add_document(&mut self, document: DocumentId) -> Result<ContainerId, AreaError> {
        if self.documents.contains(&document) {
            return Err(AreaError::AlreadyOpen(document));
        }
        let tab = match self.host.document(document) {
            Some(doc) => Tab::for_document(document, doc),
            None => return Err(AreaError::UnknownDocument(document)),
        };
        let active = self.layout.active_container();
        let container = self
            .layout
            .container_mut(active)
            .ok_or(AreaError::UnknownContainer(active))?;
        container.add_document(tab, None);
        self.documents.push(document);
        log::debug!("opened {document} in {active}");
        Ok(active)
    }

    /// Close `document`'s tab and release it to the host. False if the
    /// document is not open here.
    pub fn remove_document(&mut self, document: DocumentId) -> bool {
        let Some(container) = self.container_of_document(document) else {
            return false;
        };
        if let Some(c) = self.layout.container_mut(container) {
            c.remove_document(document);
        }
        self.forget(document, container);
        true
    }

    /// Make `document` the active one: current in its container, its
    /// container active, and keyboard focus on it.
    pub fn activate(&mut self, document: DocumentId) -> bool {
        let Some(container) = self.container_of_document(document) else {
            return false;
        };
        if let Some(c) = self.layout.container_mut(container) {
            c.activate(document);
        }
        self.layout.set_active_container(container);
        self.active_document = Some(document);
        self.host.focus(document);
        true
    }

    /// Close the tab at `index` of `container`. An emptied container
    /// collapses into its sibling when it can.
    pub fn close_tab(&mut self, container: ContainerId, index: usize) -> bool {
        let Some(c) = self.layout.container_mut(container) else {
            return false;
        };
        let Some(document) = c.document_at(index) else {
            return false;
        };
        c.remove_document(document);
        let emptied = c.is_empty();

        let mut survivor = container;
        if emptied {
            if let Some(node) = self.layout.leaf_of(container) {
                if self.layout.collapse(node) {
                    survivor = self.layout.active_container();
                }
            }
        }
        self.forget(document, survivor);
        true
    }

    /// Drop `document` from the bookkeeping, close it in the host and pick
    /// the next active document from `container`.
    fn forget(&mut self, document: DocumentId, container: ContainerId) {
        self.documents.retain(|d| *d != document);
        self.host.close(document);
        if self.documents.is_empty() {
            self.active_document = None;
        } else if self.active_document == Some(document) {
            self.active_document = self.layout.container(container).and_then(|c| c.current_document());
        }
        log::debug!("closed {document}");
    }

    /// Refresh a tab's label and tooltip after the document changed name
    /// or dirty state.
    pub fn update_document(&mut self, document: DocumentId) -> bool {
        let Some(container) = self.container_of_document(document) else {
            return false;
        };
        let Some(doc) = self.host.document(document) else {
            return false;
        };
        let label = TabContainer::label_for(doc);
        let tooltip = doc.tooltip().to_string();
        self.layout
            .container_mut(container)
            .is_some_and(|c| c.update_tab(document, label, tooltip))
    }

    /// Close every open document and reduce the tree to one empty leaf.
    pub fn close_all(&mut self) {
        for document in std::mem::take(&mut self.documents) {
            if let Some((container, _)) = self.layout.find_document(document) {
                if let Some(c) = self.layout.container_mut(container) {
                    c.remove_document(document);
                }
            }
            self.host.close(document);
        }
        self.active_document = None;
        self.drag.reset();
        // An empty leaf opens nothing, so this only resets the shape.
        if let Err(err) = self.layout.set_layout(&LayoutDescriptor::default(), &mut self.host) {
            log::warn!("failed to reset layout: {err}");
        }
    }

    // ── Tab navigation ─────────────────────────

    /// Activate the tab after the current one in the active container,
    /// wrapping around.
    pub fn next_tab(&mut self) -> Option<DocumentId> {
        let active = self.layout.active_container();
        let document = self.layout.container_mut(active)?.next_tab()?;
        self.activate(document);
        Some(document)
    }

    pub fn previous_tab(&mut self) -> Option<DocumentId> {
        let active = self.layout.active_container();
        let document = self.layout.container_mut(active)?.previous_tab()?;
        self.activate(document);
        Some(document)
    }

    pub fn activate_tab(&mut self, index: usize) -> Option<DocumentId> {
        let active = self.layout.active_container();
        let document = self.layout.container(active)?.document_at(index)?;
        self.activate(document);
        Some(document)
    }

    // ── Structure ──────────────────────────────

    /// Split the leaf holding `container`; returns the new empty container.
    pub fn split_container(
        &mut self,
        container: ContainerId,
        orientation: Orientation,
    ) -> Result<ContainerId, AreaError> {
        let node = self
            .layout
            .leaf_of(container)
            .ok_or(AreaError::UnknownContainer(container))?;
        Ok(self.layout.split(node, orientation)?)
    }

    pub fn collapse_container(&mut self, container: ContainerId) -> bool {
        self.layout
            .leaf_of(container)
            .is_some_and(|node| self.layout.collapse(node))
    }

    // ── Layout ─────────────────────────────────

    pub fn get_layout(&self) -> LayoutDescriptor {
        self.layout.get_layout(&self.host)
    }

    /// Rebuild the tree from `descriptor`. On failure the area is unchanged.
    pub fn set_layout(&mut self, descriptor: &LayoutDescriptor) -> Result<(), LayoutError> {
        self.layout.set_layout(descriptor, &mut self.host)?;
        self.drag.reset();

        let restored = self.layout.documents();
        // Keep the prior opening order, then append what was reopened.
        self.documents.retain(|d| restored.contains(d));
        for doc in restored {
            if !self.documents.contains(&doc) {
                self.documents.push(doc);
            }
        }
        let active = self.layout.active_container();
        self.active_document = self.layout.container(active).and_then(|c| c.current_document());
        Ok(())
    }

    // ── External files ─────────────────────────

    /// Forward dropped files with an accepted extension to the host.
    /// Returns the paths that were accepted.
    pub fn drop_files(&mut self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut accepted = Vec::new();
        for path in paths {
            if self.settings.accepts_file(path) {
                self.host.file_dropped(path);
                accepted.push(path.clone());
            } else {
                log::debug!("ignored dropped file {}", path.display());
            }
        }
        accepted
    }

    // ── Debug output ───────────────────────────

    /// Indented text rendering of the tree with tab labels.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(self.layout.root(), 0, &mut out);
        out
    }

    fn write_outline(&self, node: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.layout.kind(node) {
            Some(NodeKind::Split {
                orientation,
                sizes,
                left,
                right,
            }) => {
                let _ = writeln!(
                    out,
                    "{indent}split {} [{}, {}]",
                    orientation.symbol(),
                    sizes.0,
                    sizes.1
                );
                self.write_outline(left, depth + 1, out);
                self.write_outline(right, depth + 1, out);
            }
            Some(NodeKind::Leaf(container)) => {
                let marker = if container == self.layout.active_container() {
                    " (active)"
                } else {
                    ""
                };
                let _ = writeln!(out, "{indent}{container}{marker}");
                if let Some(c) = self.layout.container(container) {
                    for (i, tab) in c.tabs().iter().enumerate() {
                        let current = if c.current_index() == Some(i) { " *current" } else { "" };
                        let _ = writeln!(out, "{indent}  {}{current}", tab.label);
                    }
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_host::MemoryHost;

    fn area_with(names: &[&str]) -> (EditorArea<MemoryHost>, Vec<DocumentId>) {
        let mut area = EditorArea::new(MemoryHost::new());
        let mut ids = Vec::new();
        for name in names {
            let id = area.host_mut().create(name);
            area.add_document(id).unwrap();
            ids.push(id);
        }
        (area, ids)
    }

    #[test]
    fn add_document_appends_to_active_container() {
        let (area, ids) = area_with(&["a.py", "b.py"]);
        let active = area.active_container();
        let docs: Vec<_> = area.container(active).unwrap().documents().collect();
        assert_eq!(docs, ids);
        assert_eq!(area.documents(), ids.as_slice());
        assert_eq!(area.active_document(), None);
    }

    #[test]
    fn add_document_rejects_duplicates_and_unknowns() {
        let (mut area, ids) = area_with(&["a.py"]);
        assert!(matches!(area.add_document(ids[0]), Err(AreaError::AlreadyOpen(_))));
        assert!(matches!(
            area.add_document(DocumentId(999)),
            Err(AreaError::UnknownDocument(_))
        ));
    }

    #[test]
    fn activate_focuses_and_marks_container() {
        let (mut area, ids) = area_with(&["a.py", "b.py"]);
        let right = area.split_container(area.active_container(), Orientation::Horizontal).unwrap();
        area.layout.set_active_container(right);
        let c = area.host_mut().create("c.py");
        area.add_document(c).unwrap();

        assert!(area.activate(ids[0]));
        assert_eq!(area.active_document(), Some(ids[0]));
        assert_ne!(area.active_container(), right);
        assert_eq!(area.host().focused(), Some(ids[0]));

        assert!(area.activate(c));
        assert_eq!(area.active_container(), right);
        assert!(!area.activate(DocumentId(999)));
    }

    #[test]
    fn remove_last_document_clears_active() {
        let (mut area, ids) = area_with(&["a.py"]);
        area.activate(ids[0]);
        assert!(area.remove_document(ids[0]));
        assert_eq!(area.active_document(), None);
        assert!(area.documents().is_empty());
        assert_eq!(area.host().closed(), &[ids[0]]);
        assert!(!area.remove_document(ids[0]));
    }

    #[test]
    fn remove_active_document_moves_to_neighbour() {
        let (mut area, ids) = area_with(&["a.py", "b.py", "c.py"]);
        area.activate(ids[1]);
        area.remove_document(ids[1]);
        assert_eq!(area.active_document(), Some(ids[2]));
    }

    #[test]
    fn close_tab_collapses_emptied_container() {
        let (mut area, ids) = area_with(&["a.py"]);
        let left = area.active_container();
        let right = area.split_container(left, Orientation::Vertical).unwrap();
        area.layout.set_active_container(right);
        let b = area.host_mut().create("b.py");
        area.add_document(b).unwrap();
        area.activate(b);

        assert!(area.close_tab(right, 0));
        assert!(area.layout().is_leaf(area.layout().root()));
        let root_container = area.layout().container_of(area.layout().root()).unwrap();
        let docs: Vec<_> = area.container(root_container).unwrap().documents().collect();
        assert_eq!(docs, vec![ids[0]]);
        assert_eq!(area.active_document(), Some(ids[0]));
        assert_eq!(area.host().closed(), &[b]);
    }

    #[test]
    fn close_tab_out_of_range_is_ignored() {
        let (mut area, _) = area_with(&["a.py"]);
        let active = area.active_container();
        assert!(!area.close_tab(active, 3));
        assert!(!area.close_tab(ContainerId(999), 0));
        assert_eq!(area.documents().len(), 1);
    }

    #[test]
    fn update_document_relabels_dirty_tab() {
        let (mut area, ids) = area_with(&["a.py"]);
        area.host_mut().get_mut(ids[0]).unwrap().dirty = true;
        assert!(area.update_document(ids[0]));
        let active = area.active_container();
        assert_eq!(area.container(active).unwrap().tabs()[0].label, "*a.py");
    }

    #[test]
    fn tab_navigation_wraps() {
        let (mut area, ids) = area_with(&["a.py", "b.py", "c.py"]);
        area.activate(ids[2]);
        assert_eq!(area.next_tab(), Some(ids[0]));
        assert_eq!(area.previous_tab(), Some(ids[2]));
        assert_eq!(area.activate_tab(1), Some(ids[1]));
        assert_eq!(area.active_document(), Some(ids[1]));
        assert_eq!(area.activate_tab(7), None);
    }

    #[test]
    fn close_all_resets_tree() {
        let (mut area, ids) = area_with(&["a.py", "b.py"]);
        area.split_container(area.active_container(), Orientation::Horizontal).unwrap();
        area.close_all();
        assert!(area.documents().is_empty());
        assert!(area.layout().is_leaf(area.layout().root()));
        assert_eq!(area.host().closed(), ids.as_slice());
    }

    #[test]
    fn set_layout_rebuilds_document_list() {
        let (mut area, ids) = area_with(&["a.py", "b.py"]);
        let left = area.active_container();
        area.split_container(left, Orientation::Horizontal).unwrap();
        // Splitting activates the new empty container; go back to the left.
        area.activate(ids[1]);
        assert_eq!(area.active_container(), left);
        let layout = area.get_layout();

        let mut fresh = EditorArea::new(MemoryHost::new());
        fresh.set_layout(&layout).unwrap();
        assert_eq!(fresh.documents().len(), 2);
        let names: Vec<_> = fresh
            .documents()
            .iter()
            .map(|d| fresh.host().name_of(*d).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.py", "b.py"]);
        let current = fresh.active_document().unwrap();
        assert_eq!(fresh.host().name_of(current), Some("b.py"));
    }

    #[test]
    fn set_layout_with_own_layout_is_identity() {
        let (mut area, ids) = area_with(&["a.py"]);
        let left = area.active_container();
        area.split_container(left, Orientation::Horizontal).unwrap();
        let b = area.host_mut().create("b.py");
        area.add_document(b).unwrap();
        area.activate(b);

        let before = area.get_layout();
        area.set_layout(&before).unwrap();
        assert_eq!(area.get_layout(), before);
        assert_eq!(area.documents(), &[ids[0], b]);
        assert_eq!(area.host().len(), 2);
        assert!(area.host().closed().is_empty());
        assert_eq!(area.active_document(), Some(b));
    }

    #[test]
    fn splitter_drag_respects_min_split_fraction() {
        let settings = AreaSettings {
            min_split_fraction: 0.25,
            ..AreaSettings::default()
        };
        let mut area = EditorArea::with_settings(MemoryHost::new(), settings);
        area.set_extent(Size::new(800.0, 600.0));
        let root = area.layout().root();
        area.split_container(area.active_container(), Orientation::Horizontal).unwrap();

        assert!(!area.begin_resize(Vec2::new(100.0, 300.0)));
        assert!(area.begin_resize(Vec2::new(401.0, 300.0)));
        assert!(area.is_resizing());
        area.resize_to(Vec2::new(600.0, 300.0));
        assert!(matches!(area.layout().kind(root), Some(NodeKind::Split { sizes: (600, 200), .. })));
        area.resize_to(Vec2::new(0.0, 300.0));
        area.end_resize();
        assert!(!area.is_resizing());
        assert!(matches!(area.layout().kind(root), Some(NodeKind::Split { sizes: (200, 600), .. })));
    }

    #[test]
    fn splitter_drag_waits_for_tab_drag() {
        let (mut area, _) = area_with(&["a.py"]);
        area.set_extent(Size::new(800.0, 600.0));
        let left = area.active_container();
        area.split_container(left, Orientation::Horizontal).unwrap();
        assert!(area.press_tab(left, 0, Vec2::new(10.0, 10.0)));
        assert!(!area.begin_resize(Vec2::new(400.0, 300.0)));
        area.abort_drag();
        assert!(area.begin_resize(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn outline_uses_orientation_symbols() {
        let (mut area, _) = area_with(&["a.py"]);
        area.split_container(area.active_container(), Orientation::Vertical).unwrap();
        assert!(area.outline().starts_with("split v [0, 0]"));
    }

    #[test]
    fn failed_set_layout_keeps_area() {
        let (mut area, ids) = area_with(&["a.py"]);
        let bad = LayoutDescriptor {
            left_child: Some(Box::new(LayoutDescriptor::default())),
            ..LayoutDescriptor::default()
        };
        assert!(area.set_layout(&bad).is_err());
        assert_eq!(area.documents(), ids.as_slice());
    }

    #[test]
    fn drop_files_filters_extensions() {
        let settings = AreaSettings {
            file_drop_extensions: vec![".py".into(), ".txt".into()],
            ..AreaSettings::default()
        };
        let mut area = EditorArea::with_settings(MemoryHost::new(), settings);
        let paths = vec![
            PathBuf::from("/tmp/a.py"),
            PathBuf::from("/tmp/b.png"),
            PathBuf::from("/tmp/notes.txt"),
        ];
        let accepted = area.drop_files(&paths);
        assert_eq!(accepted, vec![paths[0].clone(), paths[2].clone()]);
        assert_eq!(area.host().dropped_files(), accepted.as_slice());
    }

    #[test]
    fn outline_marks_active_and_current() {
        let (mut area, ids) = area_with(&["a.py"]);
        area.activate(ids[0]);
        let text = area.outline();
        assert!(text.contains("(active)"));
        assert!(text.contains("a.py *current"));
    }
}
