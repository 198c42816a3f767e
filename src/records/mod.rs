//! Record types for the four domains
//!
//! Plain value objects copied in and out of their stores. Each record also
//! carries its SQLite mapping (`impl Record`) so the generic store can persist it.
//!
//! # Module Structure
//!
//! - `clipboard` - Captured clipboard payloads, content-addressed by digest
//! - `app` - Launchable applications keyed by their exec command
//! - `shell` - Shell history and completion entries keyed by command text
//! - `settings` - The settings singleton and hotkey bindings

mod app;
mod clipboard;
mod settings;
mod shell;

pub use app::{AppEntry, AppIndex};
pub use clipboard::{content_digest, ClipboardEntry, ClipboardIndex, MIME_PNG, MIME_TEXT};
pub use settings::{Hotkey, Hotkeys, Settings, SETTINGS_KEY};
pub use shell::{ShellEntry, ShellIndex};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
