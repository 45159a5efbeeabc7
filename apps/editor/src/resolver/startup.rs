//! Startup resolution — decides which content populates the editor when the
//! application starts, trying sources in strict priority order:
//!
//! 1. the external file remembered from the file browser,
//! 2. the saved document remembered from the managed folder,
//! 3. the locally persisted draft text,
//! 4. the built-in default template.
//!
//! Every remote failure (unreachable store, missing file, empty content) is
//! logged and falls through to the next tier, so the editor is never left
//! empty.

use tracing::{info, warn};

use crate::cache::KvStore;
use crate::resolver::naming::{stem, FALLBACK_NAME};
use crate::resolver::persistence::{Provenance, ResolutionState};
use crate::resolver::session::EditorSession;
use crate::resolver::templates::DEFAULT_TEMPLATE;
use crate::store::{DocumentKind, DocumentStore};

/// Resolves the startup document. Infallible by design: the default
/// template is the floor.
pub async fn resolve_startup(store: &dyn DocumentStore, kv: &dyn KvStore) -> EditorSession {
    let state = ResolutionState::load(kv);

    // Tier 1: file opened from the free-form file browser.
    if state.source == Some(Provenance::External) {
        if let Some(path) = state.path.as_deref() {
            match store.fetch_by_path(path).await {
                Ok(content) if !content.is_empty() => {
                    let name = state
                        .filename
                        .as_deref()
                        .map(stem)
                        .unwrap_or(FALLBACK_NAME)
                        .to_string();
                    info!("Resolved startup document from external path {path}");
                    return EditorSession::new(name, content, Provenance::External);
                }
                Ok(_) => warn!("External file {path} is empty, falling back"),
                Err(e) => warn!("External file {path} unavailable ({e}), falling back"),
            }
        }
    }

    // Tier 2: saved document, re-fetched from the managed folder.
    if state.source == Some(Provenance::Saved) {
        if let Some(filename) = state.filename.as_deref() {
            match store.fetch_by_name(DocumentKind::Resume, filename).await {
                Ok(content) if !content.is_empty() => {
                    info!("Resolved startup document from saved '{filename}'");
                    return EditorSession::new(
                        stem(filename).to_string(),
                        content,
                        Provenance::Saved,
                    );
                }
                Ok(_) => warn!("Saved document '{filename}' is empty, falling back"),
                Err(e) => warn!("Saved document '{filename}' unavailable ({e}), falling back"),
            }
        }
    }

    // Tier 3: locally persisted draft, adopted verbatim. Reached for any
    // `source` once the higher tiers failed to produce content.
    if let Some(content) = state.content.filter(|c| !c.is_empty()) {
        let name = state
            .filename
            .as_deref()
            .map(stem)
            .unwrap_or(FALLBACK_NAME)
            .to_string();
        info!("Resolved startup document from local draft '{name}'");
        return EditorSession::new(name, content, Provenance::Draft);
    }

    // Tier 4: built-in template, persisted immediately so an unmodified
    // reload reproduces the same state.
    info!("No prior state, starting from the built-in template");
    let session = EditorSession::new(
        FALLBACK_NAME.to_string(),
        DEFAULT_TEMPLATE.to_string(),
        Provenance::Draft,
    );
    ResolutionState::draft_with_content(
        crate::resolver::naming::with_tex_extension(FALLBACK_NAME),
        session.content.clone(),
        Provenance::Draft,
    )
    .store(kv);
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::MemoryKvStore;
    use crate::store::{DocumentListing, SaveReceipt, StoreError, TexFileEntry};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// In-memory document store: managed documents keyed by (kind,
    /// filename), free-path files keyed by path.
    #[derive(Default)]
    struct FakeStore {
        named: HashMap<(&'static str, String), String>,
        by_path: HashMap<String, String>,
        unreachable: bool,
    }

    impl FakeStore {
        fn with_saved(mut self, filename: &str, content: &str) -> Self {
            self.named
                .insert(("resumes", filename.to_string()), content.to_string());
            self
        }

        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.by_path.insert(path.to_string(), content.to_string());
            self
        }
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn fetch_by_name(
            &self,
            kind: DocumentKind,
            filename: &str,
        ) -> Result<String, StoreError> {
            if self.unreachable {
                return Err(StoreError::Api {
                    status: 502,
                    message: "unreachable".to_string(),
                });
            }
            self.named
                .get(&(kind.as_segment(), filename.to_string()))
                .cloned()
                .ok_or_else(|| StoreError::NotFound(filename.to_string()))
        }

        async fn fetch_by_path(&self, path: &str) -> Result<String, StoreError> {
            if self.unreachable {
                return Err(StoreError::Api {
                    status: 502,
                    message: "unreachable".to_string(),
                });
            }
            self.by_path
                .get(path)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(path.to_string()))
        }

        async fn list(&self, _kind: DocumentKind) -> Result<Vec<DocumentListing>, StoreError> {
            Ok(vec![])
        }

        async fn list_files_recursive(&self) -> Result<Vec<TexFileEntry>, StoreError> {
            Ok(vec![])
        }

        async fn save(
            &self,
            _kind: DocumentKind,
            filename: &str,
            _content: &str,
        ) -> Result<SaveReceipt, StoreError> {
            Ok(SaveReceipt {
                filename: filename.to_string(),
            })
        }

        async fn open_in_external_editor(
            &self,
            _kind: DocumentKind,
            _filename: &str,
        ) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Cache primed with every field valid for every provenance, so the
    /// picked tier is decided purely by `source`.
    fn fully_primed_cache(source: Provenance) -> MemoryKvStore {
        let kv = MemoryKvStore::new();
        ResolutionState {
            filename: Some("primed.tex".to_string()),
            content: Some("draft body".to_string()),
            source: Some(source),
            path: Some("/files/primed.tex".to_string()),
        }
        .store(&kv);
        kv
    }

    #[tokio::test]
    async fn test_external_source_wins_when_path_fetch_succeeds() {
        let store = FakeStore::default()
            .with_file("/files/primed.tex", "external body")
            .with_saved("primed.tex", "saved body");
        let kv = fully_primed_cache(Provenance::External);

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.content, "external body");
        assert_eq!(session.provenance, Provenance::External);
        assert_eq!(session.display_name, "primed");
    }

    #[tokio::test]
    async fn test_saved_source_never_picks_lower_tier() {
        let store = FakeStore::default()
            .with_file("/files/primed.tex", "external body")
            .with_saved("primed.tex", "saved body");
        let kv = fully_primed_cache(Provenance::Saved);

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.content, "saved body");
        assert_eq!(session.provenance, Provenance::Saved);
    }

    #[tokio::test]
    async fn test_draft_source_adopts_local_content_verbatim() {
        let store = FakeStore::default().with_saved("primed.tex", "saved body");
        let kv = fully_primed_cache(Provenance::Draft);

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.content, "draft body");
        assert_eq!(session.provenance, Provenance::Draft);
    }

    #[tokio::test]
    async fn test_missing_saved_document_falls_through_to_draft() {
        // source=saved but the named fetch 404s; the local draft wins over
        // the built-in default.
        let store = FakeStore::default();
        let kv = fully_primed_cache(Provenance::Saved);

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.content, "draft body");
        assert_eq!(session.provenance, Provenance::Draft);
    }

    #[tokio::test]
    async fn test_unreachable_store_falls_through_to_draft() {
        let store = FakeStore {
            unreachable: true,
            ..FakeStore::default()
        };
        let kv = fully_primed_cache(Provenance::External);

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.content, "draft body");
    }

    #[tokio::test]
    async fn test_empty_cache_yields_default_template_and_persists_draft() {
        let store = FakeStore::default();
        let kv = MemoryKvStore::new();

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.display_name, FALLBACK_NAME);
        assert!(session.content.contains("\\documentclass"));
        assert_eq!(session.provenance, Provenance::Draft);

        // An unmodified reload reproduces the same state from tier 3.
        let state = ResolutionState::load(&kv);
        assert_eq!(state.source, Some(Provenance::Draft));
        assert_eq!(state.filename.as_deref(), Some("my_resume.tex"));
        assert_eq!(state.content.as_deref(), Some(session.content.as_str()));
    }

    #[tokio::test]
    async fn test_empty_external_content_falls_through() {
        let store = FakeStore::default().with_file("/files/primed.tex", "");
        let kv = fully_primed_cache(Provenance::External);

        let session = resolve_startup(&store, &kv).await;
        // Empty remote content is a failure; the draft tier wins.
        assert_eq!(session.content, "draft body");
    }

    #[tokio::test]
    async fn test_external_without_remembered_filename_uses_fallback_name() {
        let store = FakeStore::default().with_file("/x.tex", "body");
        let kv = MemoryKvStore::new();
        ResolutionState {
            filename: None,
            content: None,
            source: Some(Provenance::External),
            path: Some("/x.tex".to_string()),
        }
        .store(&kv);

        let session = resolve_startup(&store, &kv).await;
        assert_eq!(session.display_name, FALLBACK_NAME);
        assert_eq!(session.content, "body");
    }
}
