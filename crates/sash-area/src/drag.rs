use sash_core::{ContainerId, DocumentHost, DocumentId, DragImage, Vec2};

use crate::area::EditorArea;

// ──────────────────────────────────────────────
// Tab drag & drop state machine
// ──────────────────────────────────────────────

/// The tab a drag started from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSource {
    pub container: ContainerId,
    pub index: usize,
    pub document: DocumentId,
    pub image: Option<DragImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    /// Button is down on a tab but the pointer has not moved far enough.
    Pressed { source: DragSource, press_pos: Vec2 },
    Dragging { source: DragSource },
}

/// Emitted once when a press turns into a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub document: DocumentId,
    pub image: Option<DragImage>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// The document now lives at `index` of `container`. `collapsed` is set
    /// when the emptied source container was folded away.
    Dropped {
        document: DocumentId,
        container: ContainerId,
        index: usize,
        collapsed: bool,
    },
    Aborted,
}

impl DragSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragSession::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }

    pub fn source(&self) -> Option<DragSource> {
        match *self {
            DragSession::Idle => None,
            DragSession::Pressed { source, .. } | DragSession::Dragging { source } => Some(source),
        }
    }

    pub(crate) fn press(&mut self, source: DragSource, press_pos: Vec2) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = DragSession::Pressed { source, press_pos };
        true
    }

    /// Promote a press to a drag once the pointer has travelled
    /// `threshold` (Manhattan distance) from the press position.
    pub(crate) fn motion(&mut self, pos: Vec2, threshold: f32) -> Option<DragStart> {
        let DragSession::Pressed { source, press_pos } = *self else {
            return None;
        };
        if pos.manhattan_distance(press_pos) < threshold {
            return None;
        }
        *self = DragSession::Dragging { source };
        Some(DragStart {
            document: source.document,
            image: source.image,
        })
    }

    /// End the session, returning the source if a drag was in progress.
    pub(crate) fn finish(&mut self) -> Option<DragSource> {
        match std::mem::take(self) {
            DragSession::Dragging { source } => Some(source),
            _ => None,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = DragSession::Idle;
    }
}

impl<H: DocumentHost> EditorArea<H> {
    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    /// Pointer pressed on tab `index` of `container`. Presses while a session
    /// is running, or outside any tab, are ignored.
    pub fn press_tab(&mut self, container: ContainerId, index: usize, pos: Vec2) -> bool {
        if !self.drag.is_idle() {
            log::debug!("ignoring tab press during an active drag");
            return false;
        }
        let Some(document) = self.layout.container(container).and_then(|c| c.document_at(index)) else {
            return false;
        };
        let source = DragSource {
            container,
            index,
            document,
            image: self.host.drag_image(document),
        };
        self.drag.press(source, pos)
    }

    pub fn pointer_moved(&mut self, pos: Vec2) -> Option<DragStart> {
        let start = self.drag.motion(pos, self.settings.drag_threshold)?;
        log::debug!("drag started for {}", start.document);
        Some(start)
    }

    /// Release without a drop target, or a cancelled drag.
    pub fn abort_drag(&mut self) -> DragOutcome {
        self.drag.reset();
        DragOutcome::Aborted
    }

    /// Drop the dragged tab on `target`, before tab `tab_index` when the
    /// pointer is over a tab. Without a tab index the document goes back
    /// to its original position in its own container, or to the end of
    /// another one.
    pub fn drop_tab(&mut self, target: ContainerId, tab_index: Option<usize>) -> DragOutcome {
        let Some(source) = self.drag.finish() else {
            return DragOutcome::Aborted;
        };
        if self.layout.container(target).is_none() {
            log::warn!("drop on unknown {target}");
            return DragOutcome::Aborted;
        }
        let Some(tab) = self
            .layout
            .container_mut(source.container)
            .and_then(|c| c.remove_document(source.document))
        else {
            log::warn!("drag source {} is gone", source.document);
            return DragOutcome::Aborted;
        };

        let insert_at = match tab_index {
            Some(index) => Some(index),
            None if target == source.container => Some(source.index),
            None => None,
        };
        if let Some(c) = self.layout.container_mut(target) {
            c.add_document(tab, insert_at);
            c.activate(source.document);
        }
        self.layout.set_active_container(target);

        let mut collapsed = false;
        if target != source.container
            && self.layout.container(source.container).is_some_and(|c| c.is_empty())
        {
            if let Some(node) = self.layout.leaf_of(source.container) {
                collapsed = self.layout.collapse(node);
            }
        }
        // A collapse may have merged the target away.
        self.layout.set_active_container(target);
        self.active_document = Some(source.document);

        match self.layout.find_document(source.document) {
            Some((container, index)) => {
                log::debug!("dropped {} into {container} at {index}", source.document);
                DragOutcome::Dropped {
                    document: source.document,
                    container,
                    index,
                    collapsed,
                }
            }
            None => DragOutcome::Aborted,
        }
    }
}
