//! Document Store port — the remote collaborator that owns the managed
//! LaTeX folders (templates, resumes, cover letters), free-path reads, and
//! the recursive `.tex` scan used by the file browser.
//!
//! The resolver never touches the filesystem itself; everything goes
//! through [`DocumentStore`], carried in `AppState` as `Arc<dyn DocumentStore>`.

pub mod browse;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three managed folders the store serves documents from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Template,
    Resume,
    CoverLetter,
}

impl DocumentKind {
    /// The store's URL path segment for this kind.
    pub fn as_segment(&self) -> &'static str {
        match self {
            DocumentKind::Template => "templates",
            DocumentKind::Resume => "resumes",
            DocumentKind::CoverLetter => "cover-letters",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "templates" | "template" => Some(DocumentKind::Template),
            "resumes" | "resume" => Some(DocumentKind::Resume),
            "cover-letters" | "cover-letter" => Some(DocumentKind::CoverLetter),
            _ => None,
        }
    }
}

/// One entry in a managed-folder listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListing {
    /// Display name (filename stem).
    pub name: String,
    /// Full filename including extension.
    pub filename: String,
}

/// One `.tex` file found by the recursive scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TexFileEntry {
    pub name: String,
    pub path: String,
    pub directory: String,
    pub size: u64,
    /// Unix seconds.
    pub modified: i64,
    /// True when the file lives in the dedicated workspace folder.
    pub is_workspace: bool,
}

/// Result of a successful save: the store echoes back the filename it
/// actually wrote (after sanitization and extension normalization).
#[derive(Debug, Clone, Deserialize)]
pub struct SaveReceipt {
    pub filename: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("document store unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document store error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Abstract document store. All methods are request/response; the caller
/// decides whether a failure falls through (startup resolution) or is
/// surfaced (explicit user action).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document from one of the managed folders by filename.
    async fn fetch_by_name(&self, kind: DocumentKind, filename: &str) -> Result<String, StoreError>;

    /// Fetches a document at an exact filesystem path (file-browser opens).
    async fn fetch_by_path(&self, path: &str) -> Result<String, StoreError>;

    /// Lists a managed folder, most recently modified first.
    async fn list(&self, kind: DocumentKind) -> Result<Vec<DocumentListing>, StoreError>;

    /// Recursively scans for `.tex` files (workspace folder flagged).
    async fn list_files_recursive(&self) -> Result<Vec<TexFileEntry>, StoreError>;

    /// Writes a document into a managed folder, returning the resolved
    /// filename.
    async fn save(
        &self,
        kind: DocumentKind,
        filename: &str,
        content: &str,
    ) -> Result<SaveReceipt, StoreError>;

    /// Asks the host to open a managed document in an external editor.
    async fn open_in_external_editor(
        &self,
        kind: DocumentKind,
        filename: &str,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_segments() {
        assert_eq!(DocumentKind::Template.as_segment(), "templates");
        assert_eq!(DocumentKind::Resume.as_segment(), "resumes");
        assert_eq!(DocumentKind::CoverLetter.as_segment(), "cover-letters");
    }

    #[test]
    fn test_kind_parse_accepts_singular_and_plural() {
        assert_eq!(DocumentKind::parse("resumes"), Some(DocumentKind::Resume));
        assert_eq!(DocumentKind::parse("resume"), Some(DocumentKind::Resume));
        assert_eq!(
            DocumentKind::parse("cover-letter"),
            Some(DocumentKind::CoverLetter)
        );
        assert_eq!(DocumentKind::parse("pdfs"), None);
    }
}
