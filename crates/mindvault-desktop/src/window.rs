//! In-memory window registry

use chrono::{DateTime, Utc};
use mindvault_core::{Error, Result, MAX_CLOSED_WINDOW_HISTORIES, MAX_WINDOW_HISTORY};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    #[default]
    Main,
    Reader,
    Editor,
    Notes,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub id: String,
    pub window_type: WindowType,
    pub title: String,
    /// Reference to the document shown in the window
    pub content: Option<String>,
    pub position: Position,
    pub size: Size,
    pub state: WindowState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Options for [`WindowManager::create_window`]
#[derive(Debug, Clone, Default)]
pub struct WindowOptions {
    pub window_type: WindowType,
    pub title: Option<String>,
    pub content: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
}

impl WindowOptions {
    pub fn new(window_type: WindowType) -> Self {
        Self {
            window_type,
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAction {
    Created,
    Closed,
    Focused,
    Moved,
    Resized,
    StateChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowHistoryEntry {
    pub window_id: String,
    pub action: WindowAction,
    pub timestamp: DateTime<Utc>,
    pub data: Option<serde_json::Value>,
}

/// Open windows in creation order, the active window and per-window history
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: Vec<Window>,
    active: Option<String>,
    history: HashMap<String, VecDeque<WindowHistoryEntry>>,
    /// Closed window ids, oldest first
    closed: VecDeque<String>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a window; it becomes the active one
    pub fn create_window(&mut self, options: WindowOptions) -> Window {
        let now = Utc::now();
        let window = Window {
            id: uuid::Uuid::new_v4().to_string(),
            window_type: options.window_type,
            title: options
                .title
                .unwrap_or_else(|| "Mind Vault".to_string()),
            content: options.content,
            position: options.position.unwrap_or_default(),
            size: options.size.unwrap_or_default(),
            state: WindowState::Normal,
            created_at: now,
            updated_at: now,
        };

        debug!("Created window {} ({:?})", window.id, window.window_type);
        self.windows.push(window.clone());
        self.active = Some(window.id.clone());
        self.record(
            &window.id,
            WindowAction::Created,
            Some(json!({ "type": window.window_type })),
        );
        window
    }

    /// Close a window. Closing the active window activates the most recently
    /// created remaining one, or none.
    ///
    /// The history of the last `MAX_CLOSED_WINDOW_HISTORIES` closed windows is
    /// kept; closing one more drops the history of the oldest.
    pub fn close_window(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.windows.remove(index);
        self.record(id, WindowAction::Closed, None);

        self.closed.push_back(id.to_string());
        while self.closed.len() > MAX_CLOSED_WINDOW_HISTORIES {
            if let Some(forgotten) = self.closed.pop_front() {
                self.history.remove(&forgotten);
            }
        }

        if self.active.as_deref() == Some(id) {
            self.active = self.windows.last().map(|w| w.id.clone());
        }
        debug!("Closed window {}", id);
        Ok(())
    }

    pub fn set_active_window(&mut self, id: &str) -> Result<()> {
        self.index_of(id)?;
        self.active = Some(id.to_string());
        self.record(id, WindowAction::Focused, None);
        Ok(())
    }

    pub fn update_window_position(&mut self, id: &str, position: Position) -> Result<()> {
        let window = self.window_mut(id)?;
        window.position = position;
        window.updated_at = Utc::now();
        self.record(
            id,
            WindowAction::Moved,
            Some(json!({ "x": position.x, "y": position.y })),
        );
        Ok(())
    }

    pub fn update_window_size(&mut self, id: &str, size: Size) -> Result<()> {
        let window = self.window_mut(id)?;
        window.size = size;
        window.updated_at = Utc::now();
        self.record(
            id,
            WindowAction::Resized,
            Some(json!({ "width": size.width, "height": size.height })),
        );
        Ok(())
    }

    pub fn update_window_state(&mut self, id: &str, state: WindowState) -> Result<()> {
        let window = self.window_mut(id)?;
        window.state = state;
        window.updated_at = Utc::now();
        self.record(id, WindowAction::StateChanged, Some(json!({ "state": state })));
        Ok(())
    }

    pub fn get_windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn get_window(&self, id: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn get_active_window(&self) -> Option<&Window> {
        self.active.as_deref().and_then(|id| self.get_window(id))
    }

    /// History of a window, oldest first. Empty for unknown windows and for
    /// closed windows whose history was dropped.
    pub fn get_window_history(&self, id: &str) -> Vec<WindowHistoryEntry> {
        self.history
            .get(id)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.windows
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| Error::WindowNotFound(id.to_string()))
    }

    fn window_mut(&mut self, id: &str) -> Result<&mut Window> {
        self.windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::WindowNotFound(id.to_string()))
    }

    fn record(&mut self, id: &str, action: WindowAction, data: Option<serde_json::Value>) {
        let entries = self.history.entry(id.to_string()).or_default();
        entries.push_back(WindowHistoryEntry {
            window_id: id.to_string(),
            action,
            timestamp: Utc::now(),
            data,
        });
        while entries.len() > MAX_WINDOW_HISTORY {
            entries.pop_front();
        }
    }
}
