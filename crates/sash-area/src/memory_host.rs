use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sash_core::{
    Document, DocumentHost, DocumentId, DragImage, HostError, ReopenDescriptor, WidgetId,
};

/// Plain in-memory document: a name, a dirty flag and, when it can be
/// reopened, the descriptor it was opened from.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    pub name: String,
    pub dirty: bool,
    pub tooltip: String,
    pub descriptor: Option<ReopenDescriptor>,
    pub widget: WidgetId,
}

impl Document for MemoryDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn dirty(&self) -> bool {
        self.dirty
    }

    fn tooltip(&self) -> &str {
        &self.tooltip
    }

    fn reopen_descriptor(&self) -> Option<ReopenDescriptor> {
        self.descriptor.clone()
    }

    fn owns_widget(&self, widget: WidgetId) -> bool {
        self.widget == widget
    }
}

/// A document host that keeps everything in memory. Reopen targets are
/// treated as paths; the document is named after the file name. Opening a
/// descriptor that is already open returns the open document.
#[derive(Debug, Default)]
pub struct MemoryHost {
    documents: BTreeMap<DocumentId, MemoryDocument>,
    next_id: u64,
    focused: Option<DocumentId>,
    closed: Vec<DocumentId>,
    dropped_files: Vec<PathBuf>,
}

fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, path: &str, descriptor: Option<ReopenDescriptor>) -> DocumentId {
        self.next_id += 1;
        let id = DocumentId(self.next_id);
        self.documents.insert(
            id,
            MemoryDocument {
                name: display_name(path),
                dirty: false,
                tooltip: path.to_string(),
                descriptor,
                widget: WidgetId(self.next_id),
            },
        );
        id
    }

    /// A reopenable document for `path`.
    pub fn create(&mut self, path: &str) -> DocumentId {
        self.insert(path, Some(ReopenDescriptor::new(path)))
    }

    /// A document with no reopen descriptor, left out of saved layouts.
    pub fn create_transient(&mut self, name: &str) -> DocumentId {
        self.insert(name, None)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut MemoryDocument> {
        self.documents.get_mut(&id)
    }

    pub fn name_of(&self, id: DocumentId) -> Option<&str> {
        self.documents.get(&id).map(|d| d.name.as_str())
    }

    pub fn widget_of(&self, id: DocumentId) -> Option<WidgetId> {
        self.documents.get(&id).map(|d| d.widget)
    }

    pub fn focused(&self) -> Option<DocumentId> {
        self.focused
    }

    pub fn closed(&self) -> &[DocumentId] {
        &self.closed
    }

    pub fn dropped_files(&self) -> &[PathBuf] {
        &self.dropped_files
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentHost for MemoryHost {
    fn document(&self, id: DocumentId) -> Option<&dyn Document> {
        self.documents.get(&id).map(|d| d as &dyn Document)
    }

    fn open(&mut self, descriptor: &ReopenDescriptor) -> Result<DocumentId, HostError> {
        let already_open = self
            .documents
            .iter()
            .find(|(_, d)| d.descriptor.as_ref() == Some(descriptor))
            .map(|(id, _)| *id);
        if let Some(id) = already_open {
            return Ok(id);
        }
        match descriptor.target().as_str() {
            Some(path) => Ok(self.insert(path, Some(descriptor.clone()))),
            None => Err(HostError::Reopen(
                descriptor.target().clone(),
                "target is not a path".to_string(),
            )),
        }
    }

    fn close(&mut self, id: DocumentId) {
        if self.documents.remove(&id).is_some() {
            self.closed.push(id);
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    fn focus(&mut self, id: DocumentId) {
        if self.documents.contains_key(&id) {
            self.focused = Some(id);
        }
    }

    fn drag_image(&self, id: DocumentId) -> Option<DragImage> {
        self.documents.contains_key(&id).then_some(DragImage(id.0))
    }

    fn file_dropped(&mut self, path: &Path) {
        self.dropped_files.push(path.to_path_buf());
    }
}
