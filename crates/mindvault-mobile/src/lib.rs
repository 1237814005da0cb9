//! Mind Vault Mobile - touch, layout, offline and power helpers
//!
//! Each registry is an in-memory keyed map with last-write-wins updates.

pub mod battery;
pub mod gestures;
pub mod offline;
pub mod responsive;

pub use battery::{PowerMode, PowerPolicy};
pub use gestures::{
    Gesture, GestureKind, GestureRecognizer, GestureRegistry, RecognizedGesture, SwipeDirection,
    TouchPoint,
};
pub use offline::{OfflineStore, QueuedAction, SyncResult, DEFAULT_MAX_RETRIES};
pub use responsive::{Breakpoint, ComponentConfig, Layout, ResponsiveRegistry};
