use rusqlite::types::Value;
use rusqlite::Row;
use sha2::{Digest, Sha256};

use crate::store::{Record, SortIndex};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PNG: &str = "image/png";

/// Compute the SHA-256 digest of a payload as lowercase hex
pub fn content_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// One captured clipboard payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    /// Content digest of `data`, the primary key
    pub digest: String,
    pub mime: String,
    pub data: Vec<u8>,
    /// Capture time in milliseconds since the Unix epoch
    pub captured_at: i64,
    pub starred: bool,
}

impl ClipboardEntry {
    /// Build an entry for a payload captured now.
    ///
    /// Identical payloads always produce the same digest, so saving a
    /// re-captured payload refreshes the existing record instead of adding one.
    pub fn capture(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self::captured_at(mime, data, super::now_millis())
    }

    /// Build an entry with an explicit capture time
    pub fn captured_at(mime: impl Into<String>, data: Vec<u8>, captured_at: i64) -> Self {
        ClipboardEntry {
            digest: content_digest(&data),
            mime: mime.into(),
            data,
            captured_at,
            starred: false,
        }
    }

    pub fn is_text(&self) -> bool {
        self.mime.starts_with("text/")
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// The payload as UTF-8 text, if this is a text entry
    pub fn text(&self) -> Option<&str> {
        if !self.is_text() {
            return None;
        }
        std::str::from_utf8(&self.data).ok()
    }
}

/// Sortable fields of the clipboard domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardIndex {
    CapturedAt,
    /// Starred flag, also usable as an exclusion filter
    Starred,
}

impl SortIndex for ClipboardIndex {
    fn column(self) -> &'static str {
        match self {
            ClipboardIndex::CapturedAt => "captured_at",
            ClipboardIndex::Starred => "starred",
        }
    }
}

impl Record for ClipboardEntry {
    const DOMAIN: &'static str = "clipboard";
    const TABLE: &'static str = "clipboard";
    const COLUMNS: &'static [&'static str] = &["digest", "mime", "data", "captured_at", "starred"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS clipboard (
            digest TEXT PRIMARY KEY,
            mime TEXT NOT NULL,
            data BLOB NOT NULL,
            captured_at INTEGER NOT NULL,
            starred INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_clipboard_captured_at ON clipboard(captured_at DESC);
    "#;

    type Index = ClipboardIndex;

    fn key(&self) -> &str {
        &self.digest
    }

    fn to_values(&self) -> rusqlite::Result<Vec<Value>> {
        Ok(vec![
            Value::Text(self.digest.clone()),
            Value::Text(self.mime.clone()),
            Value::Blob(self.data.clone()),
            Value::Integer(self.captured_at),
            Value::Integer(i64::from(self.starred)),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ClipboardEntry {
            digest: row.get(0)?,
            mime: row.get(1)?,
            data: row.get(2)?,
            captured_at: row.get(3)?,
            starred: row.get::<_, i64>(4)? != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic_hex() {
        let a = content_digest(b"hello");
        let b = content_digest(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64, "SHA-256 hash should be 64 hex chars");
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
        assert_ne!(a, content_digest(b"world"));
    }

    #[test]
    fn test_capture_keys_by_payload() {
        let first = ClipboardEntry::captured_at(MIME_TEXT, b"same".to_vec(), 1);
        let second = ClipboardEntry::captured_at(MIME_TEXT, b"same".to_vec(), 2);
        assert_eq!(first.digest, second.digest);
        assert!(!first.starred);
    }

    #[test]
    fn test_classification() {
        let text = ClipboardEntry::capture(MIME_TEXT, b"hi".to_vec());
        assert!(text.is_text());
        assert!(!text.is_image());
        assert_eq!(text.text(), Some("hi"));

        let image = ClipboardEntry::capture(MIME_PNG, vec![0x89, 0x50, 0x4e, 0x47]);
        assert!(image.is_image());
        assert!(!image.is_text());
        assert_eq!(image.text(), None);
    }
}
