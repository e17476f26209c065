// Editor area controller on top of the sash split tree: document
// bookkeeping, tab drag and drop, focus routing, context menus, and
// settings/session persistence.

mod area;
mod context_menu;
mod drag;
mod focus;
mod memory_host;
pub mod session;
pub mod settings;

pub use area::{AreaError, EditorArea};
pub use context_menu::{COLLAPSE_GROUP, SPLIT_GROUP};
pub use drag::{DragOutcome, DragSession, DragSource, DragStart};
pub use memory_host::{MemoryDocument, MemoryHost};
pub use session::{load_session, save_session, Session, SessionError};
pub use settings::{load_settings, AreaSettings};
