use sash_core::{ContainerId, Document, DocumentHost, DocumentId, ReopenDescriptor};

// ──────────────────────────────────────────────
// Tab
// ──────────────────────────────────────────────

/// One open document in a container, with the text its tab shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub document: DocumentId,
    pub label: String,
    pub tooltip: String,
}

impl Tab {
    pub fn new(document: DocumentId, label: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            document,
            label: label.into(),
            tooltip: tooltip.into(),
        }
    }

    pub fn for_document(id: DocumentId, document: &dyn Document) -> Self {
        Self::new(id, TabContainer::label_for(document), document.tooltip())
    }
}

// ──────────────────────────────────────────────
// TabContainer
// ──────────────────────────────────────────────

/// Ordered tabs with one current tab. `current` is `Some` exactly when
/// there is at least one tab.
#[derive(Debug, Clone)]
pub struct TabContainer {
    id: ContainerId,
    tabs: Vec<Tab>,
    current: Option<usize>,
}

impl TabContainer {
    pub fn new(id: ContainerId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            current: None,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Tab text for a document: its name, prefixed with `*` when dirty.
    pub fn label_for(document: &dyn Document) -> String {
        if document.dirty() {
            format!("*{}", document.name())
        } else {
            document.name().to_string()
        }
    }

    /// Insert a tab at `index` (clamped), or append it. Returns the index used.
    /// The current document stays current; an empty container makes the
    /// new tab current.
    pub fn add_document(&mut self, tab: Tab, index: Option<usize>) -> usize {
        let index = index.map_or(self.tabs.len(), |i| i.min(self.tabs.len()));
        self.tabs.insert(index, tab);
        self.current = match self.current {
            None => Some(index),
            Some(c) if index <= c => Some(c + 1),
            Some(c) => Some(c),
        };
        index
    }

    /// Remove a document's tab. When it was current, the tab that slides
    /// into its place becomes current (or the new last tab).
    pub fn remove_document(&mut self, document: DocumentId) -> Option<Tab> {
        let index = self.index_of(document)?;
        let tab = self.tabs.remove(index);
        self.current = match self.current {
            _ if self.tabs.is_empty() => None,
            Some(c) if c > index => Some(c - 1),
            Some(c) if c == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        Some(tab)
    }

    pub fn activate(&mut self, document: DocumentId) -> bool {
        match self.index_of(document) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Make the tab after the current one current, wrapping to the first.
    pub fn next_tab(&mut self) -> Option<DocumentId> {
        let current = self.current?;
        let next = if current + 1 < self.tabs.len() { current + 1 } else { 0 };
        self.current = Some(next);
        self.current_document()
    }

    /// Make the tab before the current one current, wrapping to the last.
    pub fn previous_tab(&mut self) -> Option<DocumentId> {
        let current = self.current?;
        let previous = if current > 0 { current - 1 } else { self.tabs.len() - 1 };
        self.current = Some(previous);
        self.current_document()
    }

    /// Replace a tab's label and tooltip. Returns false if the document is
    /// not in this container.
    pub fn update_tab(&mut self, document: DocumentId, label: String, tooltip: String) -> bool {
        match self.tabs.iter_mut().find(|t| t.document == document) {
            Some(tab) => {
                tab.label = label;
                tab.tooltip = tooltip;
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, document: DocumentId) -> Option<usize> {
        self.tabs.iter().position(|t| t.document == document)
    }

    pub fn contains(&self, document: DocumentId) -> bool {
        self.index_of(document).is_some()
    }

    pub fn count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_document(&self) -> Option<DocumentId> {
        self.current.and_then(|i| self.document_at(i))
    }

    pub fn document_at(&self, index: usize) -> Option<DocumentId> {
        self.tabs.get(index).map(|t| t.document)
    }

    pub fn documents(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.tabs.iter().map(|t| t.document)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Reopen descriptors of every document that has one, in tab order,
    /// plus the current document's position within that list.
    ///
    /// Documents without a descriptor are skipped, so a container holding
    /// only such documents serializes exactly like an empty one.
    pub fn serialize_states(&self, host: &dyn DocumentHost) -> (Vec<ReopenDescriptor>, Option<usize>) {
        let current = self.current_document();
        let mut states = Vec::new();
        let mut current_index = None;
        for tab in &self.tabs {
            let Some(descriptor) = host
                .document(tab.document)
                .and_then(|d| d.reopen_descriptor())
            else {
                continue;
            };
            if Some(tab.document) == current {
                current_index = Some(states.len());
            }
            states.push(descriptor);
        }
        (states, current_index)
    }

    pub(crate) fn take_tabs(&mut self) -> Vec<Tab> {
        self.current = None;
        std::mem::take(&mut self.tabs)
    }
}
