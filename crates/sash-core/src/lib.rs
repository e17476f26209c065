use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Extent of the rect along the axis an orientation splits.
    pub fn extent(&self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Sum of the absolute axis distances to `other`.
    pub fn manhattan_distance(&self, other: Vec2) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

/// Handle of a host-owned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// Handle of a tab container inside a split area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u64);

/// Handle of a node in the split tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle of a host widget that can receive keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub u64);

/// Host image handle shown under the pointer while a tab is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragImage(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

// ──────────────────────────────────────────────
// Layout types
// ──────────────────────────────────────────────

/// Splitter orientation. Horizontal places the children side by side,
/// vertical stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "h")]
    Horizontal,
    #[serde(rename = "v")]
    Vertical,
}

impl Orientation {
    /// The short symbol used in persisted layouts.
    pub fn symbol(self) -> &'static str {
        match self {
            Orientation::Horizontal => "h",
            Orientation::Vertical => "v",
        }
    }
}

/// Serializable recipe the host uses to recreate a document:
/// a target plus keyword arguments, stored as `[target, {kwargs}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReopenDescriptor(pub Value, pub Map<String, Value>);

impl ReopenDescriptor {
    pub fn new(target: impl Into<Value>) -> Self {
        Self(target.into(), Map::new())
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.1.insert(key.into(), value.into());
        self
    }

    pub fn target(&self) -> &Value {
        &self.0
    }

    pub fn args(&self) -> &Map<String, Value> {
        &self.1
    }
}

// ──────────────────────────────────────────────
// Trait: Document
// ──────────────────────────────────────────────

/// A host document shown in a tab. The area only reads it.
pub trait Document {
    fn name(&self) -> &str;
    fn dirty(&self) -> bool;
    fn tooltip(&self) -> &str;

    /// Documents that cannot be recreated return `None` and are left out
    /// of persisted layouts.
    fn reopen_descriptor(&self) -> Option<ReopenDescriptor> {
        None
    }

    /// Whether `widget` is this document's control (or its focus proxy).
    fn owns_widget(&self, _widget: WidgetId) -> bool {
        false
    }
}

// ──────────────────────────────────────────────
// Trait: DocumentHost
// ──────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("cannot reopen {0}: {1}")]
    Reopen(Value, String),
    #[error("unknown document {0}")]
    UnknownDocument(DocumentId),
}

/// The application side of the editor area. Owns document lifetimes.
pub trait DocumentHost {
    fn document(&self, id: DocumentId) -> Option<&dyn Document>;

    /// Recreate a document from its reopen descriptor.
    fn open(&mut self, descriptor: &ReopenDescriptor) -> Result<DocumentId, HostError>;

    fn close(&mut self, id: DocumentId);

    /// Give keyboard focus to the document's control.
    fn focus(&mut self, _id: DocumentId) {}

    fn drag_image(&self, _id: DocumentId) -> Option<DragImage> {
        None
    }

    /// An accepted external file was dropped on the area.
    fn file_dropped(&mut self, _path: &Path) {}
}

// ──────────────────────────────────────────────
// Focus
// ──────────────────────────────────────────────

/// Where application focus landed, as translated by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Container(ContainerId),
    TabBar(ContainerId),
    Widget(WidgetId),
}

// ──────────────────────────────────────────────
// Context menu
// ──────────────────────────────────────────────

/// What a context menu was requested on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget {
    Container(ContainerId),
    Document(DocumentId),
}

/// Structural actions a menu entry can trigger on the area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaAction {
    Split {
        container: ContainerId,
        orientation: Orientation,
    },
    Collapse {
        container: ContainerId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub action: AreaAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup {
    pub id: String,
    pub items: Vec<MenuItem>,
}

/// A menu being assembled by the host for one context-menu request.
pub trait Menu {
    fn find_group(&self, id: &str) -> bool;
    fn append_group(&mut self, group: MenuGroup);
}

impl Menu for Vec<MenuGroup> {
    fn find_group(&self, id: &str) -> bool {
        self.iter().any(|g| g.id == id)
    }

    fn append_group(&mut self, group: MenuGroup) {
        self.push(group);
    }
}
