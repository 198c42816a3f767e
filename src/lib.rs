//! hotclip - local persistence for a clipboard / app launcher / shell history utility
//!
//! Four independent SQLite-backed domains behind one [`Datastore`] handle:
//! bounded clipboard history, an app list reconciled against desktop scans,
//! and a shell history replaced wholesale on each load, plus the settings
//! singleton.

pub mod app_launcher;
pub mod clipboard_history;
pub mod config;
pub mod datastore;
pub mod error;
pub mod logging;
pub mod ports;
pub mod records;
pub mod shell_history;
pub mod store;

pub use app_launcher::ReconcileReport;
pub use clipboard_history::AddOutcome;
pub use config::StoreConfig;
pub use datastore::{Datastore, Domain, StoreEvent, UnknownDomain};
pub use error::{ErrorKind, Result, ResultExt, StoreError};
pub use ports::{AppScanner, HistorySource};
pub use records::{AppEntry, ClipboardEntry, Hotkey, Hotkeys, Settings, ShellEntry};
pub use shell_history::{HistoryFile, HistoryFormat};
