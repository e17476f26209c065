// Session persistence: the split layout and window extent, saved as JSON
// next to the settings (e.g. ~/.config/sash/session.json on Linux).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sash_core::{DocumentHost, Size};
use sash_layout::{LayoutDescriptor, LayoutError};

use crate::area::EditorArea;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub layout: LayoutDescriptor,
    #[serde(default)]
    pub extent: Size,
}

impl<H: DocumentHost> EditorArea<H> {
    pub fn session(&self) -> Session {
        Session {
            layout: self.get_layout(),
            extent: self.layout.extent(),
        }
    }

    pub fn restore_session(&mut self, session: &Session) -> Result<(), LayoutError> {
        self.set_layout(&session.layout)?;
        self.layout.set_extent(session.extent);
        Ok(())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SessionError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn session_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("sash").join("session.json"))
}

pub fn save_session_to(path: &Path, session: &Session) -> Result<(), SessionError> {
    write_json(path, session)
}

pub fn load_session_from(path: &Path) -> Result<Session, SessionError> {
    read_json(path)
}

pub fn save_session(session: &Session) {
    let Some(path) = session_path() else {
        log::warn!("Could not determine config directory for session save");
        return;
    };
    if let Err(e) = save_session_to(&path, session) {
        log::error!("Failed to write session file: {}", e);
    }
}

/// The saved session, if there is a readable one.
pub fn load_session() -> Option<Session> {
    let path = session_path()?;
    if !path.exists() {
        return None;
    }
    match load_session_from(&path) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Failed to load session {}: {}", path.display(), e);
            None
        }
    }
}
