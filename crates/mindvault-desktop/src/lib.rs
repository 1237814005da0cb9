//! Mind Vault Desktop - file system and window facades
//!
//! File operations go through a [`FileBackend`]; [`MockBackend`] returns
//! deterministic data and [`LocalBackend`] talks to the real disk.

pub mod backend;
pub mod export;
pub mod fs;
pub mod window;

pub use backend::{DirEntry, FileBackend, LocalBackend, MockBackend, MOCK_FILE_CONTENTS};
pub use export::{render, ExportFormat};
pub use fs::{EbookFormat, FileSystem, ImportResult};
pub use window::{
    Position, Size, Window, WindowAction, WindowHistoryEntry, WindowManager, WindowOptions,
    WindowState, WindowType,
};
