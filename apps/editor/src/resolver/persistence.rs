//! Persisted resolution state — the typed view over the four fixed cache
//! keys that remember which document was open, and where its authoritative
//! content lives, across restarts.
//!
//! At most one of `content` (draft) or `path` (external) is authoritative
//! at a time, selected by `source`; when `source` is `saved` neither is
//! read and the document is re-fetched by filename. The whole record is
//! written in one go by every transition, so the fields can never drift
//! apart the way independently-set keys could.

use serde::{Deserialize, Serialize};

use crate::cache::KvStore;

const KEY_FILENAME: &str = "last_opened_filename";
const KEY_CONTENT: &str = "last_draft_content";
const KEY_SOURCE: &str = "last_opened_source";
const KEY_PATH: &str = "last_opened_path";

/// Where the editor's current content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Saved,
    Draft,
    External,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Saved => "saved",
            Provenance::Draft => "draft",
            Provenance::External => "external",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "saved" => Some(Provenance::Saved),
            "draft" => Some(Provenance::Draft),
            "external" => Some(Provenance::External),
            _ => None,
        }
    }
}

/// The four-field record persisted in the local cache. `filename` always
/// carries the `.tex` extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionState {
    pub filename: Option<String>,
    pub content: Option<String>,
    pub source: Option<Provenance>,
    pub path: Option<String>,
}

impl ResolutionState {
    /// Reads all four keys. Unknown provenance tags read as absent.
    pub fn load(kv: &dyn KvStore) -> Self {
        Self {
            filename: kv.get(KEY_FILENAME),
            content: kv.get(KEY_CONTENT),
            source: kv.get(KEY_SOURCE).and_then(|s| Provenance::parse(&s)),
            path: kv.get(KEY_PATH),
        }
    }

    /// Writes the full record, removing any field that is `None` so stale
    /// values from an earlier provenance cannot survive a transition.
    pub fn store(&self, kv: &dyn KvStore) {
        match &self.filename {
            Some(v) => kv.set(KEY_FILENAME, v),
            None => kv.remove(KEY_FILENAME),
        }
        match &self.content {
            Some(v) => kv.set(KEY_CONTENT, v),
            None => kv.remove(KEY_CONTENT),
        }
        match self.source {
            Some(v) => kv.set(KEY_SOURCE, v.as_str()),
            None => kv.remove(KEY_SOURCE),
        }
        match &self.path {
            Some(v) => kv.set(KEY_PATH, v),
            None => kv.remove(KEY_PATH),
        }
    }

    /// Record for a document loaded from (or saved to) a managed folder.
    pub fn saved(filename: String) -> Self {
        Self {
            filename: Some(filename),
            content: None,
            source: Some(Provenance::Saved),
            path: None,
        }
    }

    /// Record for a fresh draft identity with no unsaved text yet (new
    /// document); the content arrives later through the debounced write.
    pub fn fresh_draft(filename: String) -> Self {
        Self {
            filename: Some(filename),
            content: None,
            source: Some(Provenance::Draft),
            path: None,
        }
    }

    /// Record written by the debounced draft persister. This is the only
    /// constructor that sets `content`.
    pub fn draft_with_content(filename: String, content: String, source: Provenance) -> Self {
        Self {
            filename: Some(filename),
            content: Some(content),
            source: Some(source),
            path: None,
        }
    }

    /// Record for a file opened through the free-form file browser.
    pub fn external(filename: String, path: String) -> Self {
        Self {
            filename: Some(filename),
            content: None,
            source: Some(Provenance::External),
            path: Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::MemoryKvStore;

    #[test]
    fn test_roundtrip_all_fields() {
        let kv = MemoryKvStore::new();
        let state = ResolutionState::external("cv.tex".to_string(), "/home/u/cv.tex".to_string());
        state.store(&kv);

        let loaded = ResolutionState::load(&kv);
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_saved_transition_clears_content_and_path() {
        let kv = MemoryKvStore::new();
        ResolutionState::draft_with_content(
            "cv.tex".to_string(),
            "\\documentclass{article}".to_string(),
            Provenance::Draft,
        )
        .store(&kv);

        ResolutionState::saved("cv.tex".to_string()).store(&kv);

        let loaded = ResolutionState::load(&kv);
        assert_eq!(loaded.source, Some(Provenance::Saved));
        assert_eq!(loaded.content, None);
        assert_eq!(loaded.path, None);
        assert_eq!(loaded.filename.as_deref(), Some("cv.tex"));
    }

    #[test]
    fn test_external_transition_clears_draft_content() {
        let kv = MemoryKvStore::new();
        ResolutionState::draft_with_content(
            "a.tex".to_string(),
            "draft text".to_string(),
            Provenance::Draft,
        )
        .store(&kv);

        ResolutionState::external("b.tex".to_string(), "/tmp/b.tex".to_string()).store(&kv);

        let loaded = ResolutionState::load(&kv);
        assert_eq!(loaded.source, Some(Provenance::External));
        assert_eq!(loaded.content, None);
        assert_eq!(loaded.path.as_deref(), Some("/tmp/b.tex"));
    }

    #[test]
    fn test_unknown_source_tag_reads_as_absent() {
        let kv = MemoryKvStore::new();
        kv.set("last_opened_source", "cloud");
        let loaded = ResolutionState::load(&kv);
        assert_eq!(loaded.source, None);
    }

    #[test]
    fn test_empty_cache_loads_default() {
        let kv = MemoryKvStore::new();
        assert_eq!(ResolutionState::load(&kv), ResolutionState::default());
    }
}
