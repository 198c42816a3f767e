//! Datastore facade
//!
//! Owns the four domain stores (clipboard, apps, shell, settings), relays
//! every read and write to the domain modules, substitutes default settings
//! when none are stored, and publishes a [`StoreEvent`] after each change.
//!
//! Each domain lives in its own SQLite file under the configured data
//! directory, so writers in different domains never wait on each other.

use std::fmt;
use std::fs;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::app_launcher::{self, ReconcileReport};
use crate::clipboard_history::{self, AddOutcome};
use crate::config::StoreConfig;
use crate::error::{Result, ResultExt, StoreError};
use crate::ports::{AppScanner, HistorySource};
use crate::records::{AppEntry, ClipboardEntry, Settings, ShellEntry, SETTINGS_KEY};
use crate::shell_history::{self, HistoryFile};
use crate::store::{Record, Store};

/// One of the four independently stored domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Clipboard,
    Apps,
    Shell,
    Settings,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Clipboard,
        Domain::Apps,
        Domain::Shell,
        Domain::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Clipboard => "clipboard",
            Domain::Apps => "apps",
            Domain::Shell => "shell",
            Domain::Settings => "settings",
        }
    }

    /// SQLite file name inside the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            Domain::Clipboard => "clipboard.sqlite",
            Domain::Apps => "apps.sqlite",
            Domain::Shell => "shell.sqlite",
            Domain::Settings => "settings.sqlite",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown domain '{0}' (expected clipboard, apps, shell or settings)")]
pub struct UnknownDomain(pub String);

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// Change notification published to every subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// An entry was captured, deleted, starred or evicted
    ClipboardChanged,
    /// A refresh changed the stored app list
    AppsRefreshed(ReconcileReport),
    AppAccessed { exec: String },
    ShellHistoryLoaded { count: usize },
    SettingsChanged,
    DomainDropped(Domain),
}

/// Handle to the whole datastore. Clones share the stores and subscribers.
#[derive(Clone)]
pub struct Datastore {
    clipboard: Store<ClipboardEntry>,
    apps: Store<AppEntry>,
    shell: Store<ShellEntry>,
    settings: Store<Settings>,
    subscribers: Arc<Mutex<Vec<Sender<StoreEvent>>>>,
    max_history_entries: usize,
    max_search_results: usize,
}

impl fmt::Debug for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datastore")
            .field("subscribers", &self.subscribers.lock().len())
            .field("max_history_entries", &self.max_history_entries)
            .field("max_search_results", &self.max_search_results)
            .finish_non_exhaustive()
    }
}

impl Datastore {
    /// Open every domain store under `config.data_dir`, creating the directory if needed
    #[instrument(name = "datastore_open", skip_all, fields(data_dir = %config.data_dir))]
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let dir = config.data_dir_path();
        fs::create_dir_all(&dir).map_err(|source| StoreError::DataDir {
            path: dir.clone(),
            source,
        })?;

        let datastore = Datastore {
            clipboard: Store::open(&dir.join(Domain::Clipboard.file_name()))?,
            apps: Store::open(&dir.join(Domain::Apps.file_name()))?,
            shell: Store::open(&dir.join(Domain::Shell.file_name()))?,
            settings: Store::open(&dir.join(Domain::Settings.file_name()))?,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            max_history_entries: config.max_history_entries,
            max_search_results: config.max_search_results,
        };
        info!(path = %dir.display(), "Datastore opened");
        Ok(datastore)
    }

    /// Datastore backed by private in-memory databases
    pub fn open_in_memory() -> Result<Self> {
        let config = StoreConfig::default();
        Ok(Datastore {
            clipboard: Store::open_in_memory()?,
            apps: Store::open_in_memory()?,
            shell: Store::open_in_memory()?,
            settings: Store::open_in_memory()?,
            subscribers: Arc::new(Mutex::new(Vec::new())),
            max_history_entries: config.max_history_entries,
            max_search_results: config.max_search_results,
        })
    }

    // ========================================
    // Events
    // ========================================

    /// Receive every change made through this datastore (or its clones) from now on
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    fn publish(&self, event: StoreEvent) {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let pruned = before - subscribers.len();
        if pruned > 0 {
            debug!(pruned, "Pruned closed event subscribers");
        }
    }

    // ========================================
    // Settings
    // ========================================

    /// Current settings, falling back to defaults.
    ///
    /// A missing row is filled with defaults. A row that cannot be read is
    /// left alone and defaults are returned.
    pub fn settings(&self) -> Settings {
        match self.settings.find(SETTINGS_KEY) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                let defaults = Settings::default();
                if self.settings.save(&defaults).warn_on_err().is_some() {
                    info!(max_entries = defaults.max_entries, "Wrote default settings");
                }
                defaults
            }
            Err(e) => {
                warn!(error = %e, "Settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    /// Validate and replace the stored settings
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|reason| StoreError::InvalidRecord {
                domain: Settings::DOMAIN,
                reason,
            })?;
        self.settings.save(settings)?;
        info!(max_entries = settings.max_entries, "Saved settings");
        self.publish(StoreEvent::SettingsChanged);
        Ok(())
    }

    // ========================================
    // Clipboard
    // ========================================

    /// Record a payload seen on the system clipboard
    pub fn capture_clipboard(&self, mime: &str, data: Vec<u8>) -> Result<AddOutcome> {
        self.add_clipboard(ClipboardEntry::capture(mime, data))
    }

    /// Save a clipboard entry and apply the retention bound from settings
    pub fn add_clipboard(&self, entry: ClipboardEntry) -> Result<AddOutcome> {
        let max_entries = self.settings().max_entries;
        let outcome = clipboard_history::add_entry(&self.clipboard, entry, max_entries)?;
        self.publish(StoreEvent::ClipboardChanged);
        Ok(outcome)
    }

    /// Clipboard history, most recent first
    pub fn list_clipboard(&self) -> Result<Vec<ClipboardEntry>> {
        clipboard_history::list_entries(&self.clipboard)
    }

    pub fn get_clipboard(&self, digest: &str) -> Result<ClipboardEntry> {
        clipboard_history::get_entry(&self.clipboard, digest)
    }

    pub fn delete_clipboard(&self, digest: &str) -> Result<()> {
        clipboard_history::delete_entry(&self.clipboard, digest)?;
        self.publish(StoreEvent::ClipboardChanged);
        Ok(())
    }

    pub fn set_clipboard_starred(&self, digest: &str, starred: bool) -> Result<ClipboardEntry> {
        let entry = clipboard_history::set_starred(&self.clipboard, digest, starred)?;
        self.publish(StoreEvent::ClipboardChanged);
        Ok(entry)
    }

    // ========================================
    // Apps
    // ========================================

    /// Apps, most recently launched first
    pub fn list_apps(&self) -> Result<Vec<AppEntry>> {
        app_launcher::list_apps(&self.apps)
    }

    pub fn get_app(&self, exec: &str) -> Result<AppEntry> {
        app_launcher::get_app(&self.apps, exec)
    }

    /// Record a launch of the app with this exec command
    pub fn update_app_access(&self, exec: &str) -> Result<AppEntry> {
        let entry = app_launcher::update_access(&self.apps, exec)?;
        self.publish(StoreEvent::AppAccessed {
            exec: entry.exec.clone(),
        });
        Ok(entry)
    }

    /// Reconcile the stored apps with a scanned candidate list
    pub fn refresh_apps(&self, candidates: &[AppEntry]) -> Result<ReconcileReport> {
        let report = app_launcher::reconcile(&self.apps, candidates)?;
        if report.changed() {
            self.publish(StoreEvent::AppsRefreshed(report));
        }
        Ok(report)
    }

    /// Scan with `scanner` and reconcile. A failed scan leaves the stored apps untouched.
    pub fn refresh_apps_from(&self, scanner: &dyn AppScanner) -> anyhow::Result<ReconcileReport> {
        let candidates = scanner.scan().context("App scan failed")?;
        let report = self
            .refresh_apps(&candidates)
            .context("Failed to store scanned apps")?;
        Ok(report)
    }

    // ========================================
    // Shell
    // ========================================

    /// Replace the shell history with `entries`, returning how many were stored
    pub fn load_shell_history(&self, entries: &[ShellEntry]) -> Result<usize> {
        let count = shell_history::replace_history(&self.shell, entries)?;
        self.publish(StoreEvent::ShellHistoryLoaded { count });
        Ok(count)
    }

    /// Read history from `source` and replace the shell domain with it
    pub fn load_shell_history_from(&self, source: &dyn HistorySource) -> anyhow::Result<usize> {
        let entries = source
            .read_history()
            .context("Failed to read shell history")?;
        let count = self
            .load_shell_history(&entries)
            .context("Failed to store shell history")?;
        Ok(count)
    }

    /// History file of the current login shell, capped at the configured history size
    pub fn default_history_file(&self) -> Option<HistoryFile> {
        HistoryFile::from_env().map(|file| file.with_max_entries(self.max_history_entries))
    }

    pub fn search_shell(&self, fragment: &str, limit: usize) -> Result<Vec<ShellEntry>> {
        shell_history::search(&self.shell, fragment, limit)
    }

    /// Search capped at the configured maximum number of suggestions
    pub fn shell_suggestions(&self, fragment: &str) -> Result<Vec<ShellEntry>> {
        self.search_shell(fragment, self.max_search_results)
    }

    pub fn list_shell(&self) -> Result<Vec<ShellEntry>> {
        shell_history::list(&self.shell)
    }

    // ========================================
    // Domains
    // ========================================

    pub fn count(&self, domain: Domain) -> Result<usize> {
        match domain {
            Domain::Clipboard => self.clipboard.count(),
            Domain::Apps => self.apps.count(),
            Domain::Shell => self.shell.count(),
            Domain::Settings => self.settings.count(),
        }
    }

    /// Remove every record of one domain, returning how many were removed
    pub fn drop_domain(&self, domain: Domain) -> Result<usize> {
        let removed = match domain {
            Domain::Clipboard => self.clipboard.drop_all()?,
            Domain::Apps => self.apps.drop_all()?,
            Domain::Shell => self.shell.drop_all()?,
            Domain::Settings => self.settings.drop_all()?,
        };
        self.publish(StoreEvent::DomainDropped(domain));
        Ok(removed)
    }

    /// Empty every domain. Stops at the first domain that fails.
    pub fn drop_all(&self) -> Result<()> {
        for domain in Domain::ALL {
            self.drop_domain(domain)?;
        }
        info!("Dropped all domains");
        Ok(())
    }
}

#[cfg(test)]
#[path = "datastore_tests.rs"]
mod tests;
