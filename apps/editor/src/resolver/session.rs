//! The editor session — the single application-state object behind every
//! handler. One document is open at a time; `SessionSlot` guards it
//! together with the draft debouncer and a generation counter, so a fetch
//! that was superseded by a newer user action can never overwrite newer
//! state.

use serde::Serialize;
use tokio::time::Instant;

use crate::cache::KvStore;
use crate::resolver::draft::DraftDebouncer;
use crate::resolver::naming::{display_name_or_fallback, with_tex_extension};
use crate::resolver::persistence::{Provenance, ResolutionState};

/// The currently open document.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSession {
    /// Display name, always the filename stem.
    pub display_name: String,
    pub content: String,
    pub provenance: Provenance,
    /// Cache-busted URL of the last successful compile, if any.
    pub artifact_url: Option<String>,
}

impl EditorSession {
    pub fn new(display_name: String, content: String, provenance: Provenance) -> Self {
        Self {
            display_name,
            content,
            provenance,
            artifact_url: None,
        }
    }
}

/// Mutable session state behind one lock: the open document (absent until
/// startup resolution finishes), the debounce machine, and the action
/// generation counter.
pub struct SessionSlot {
    session: Option<EditorSession>,
    debouncer: DraftDebouncer,
    /// Provenance tag the next completed draft write will carry.
    pending_source: Provenance,
    generation: u64,
}

impl SessionSlot {
    pub fn empty() -> Self {
        Self {
            session: None,
            debouncer: DraftDebouncer::default(),
            pending_source: Provenance::Draft,
            generation: 0,
        }
    }

    pub fn with_session(session: EditorSession) -> Self {
        let mut slot = Self::empty();
        slot.session = Some(session);
        slot
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    pub fn debounce_window(&self) -> std::time::Duration {
        self.debouncer.window()
    }

    /// Starts an explicit user action (load, new document). Bumps the
    /// generation; the returned value must be presented when the action's
    /// result is applied.
    pub fn begin_action(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Replaces the open document if `generation` is still current.
    /// Returns false when a newer action superseded this one, in which
    /// case the result must be discarded.
    pub fn apply_if_current(&mut self, generation: u64, session: EditorSession) -> bool {
        if generation != self.generation {
            return false;
        }
        self.session = Some(session);
        true
    }

    /// Applies an in-place buffer edit from the view and schedules the
    /// debounced draft write. No-op (returns `None`) before the session
    /// exists: there is nothing to persist yet.
    pub fn record_edit(
        &mut self,
        content: Option<String>,
        display_name: Option<String>,
        now: Instant,
    ) -> Option<u64> {
        let session = self.session.as_mut()?;
        if let Some(content) = content {
            session.content = content;
        }
        if let Some(name) = display_name {
            session.display_name = name;
        }
        self.pending_source = Provenance::Draft;
        Some(self.debouncer.schedule(now))
    }

    /// Schedules a draft write without touching the buffer, carrying an
    /// explicit provenance tag (template loads persist as `draft`).
    pub fn schedule_draft(&mut self, source: Provenance, now: Instant) -> Option<u64> {
        self.session.as_ref()?;
        self.pending_source = source;
        Some(self.debouncer.schedule(now))
    }

    /// Completes a pending draft write: if `token` is still current and its
    /// quiescence window has elapsed, captures the buffer as of *now* and
    /// writes the full resolution record. Returns whether a write happened.
    pub fn complete_draft_write(&mut self, kv: &dyn KvStore, token: u64, now: Instant) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if !self.debouncer.try_complete(token, now) {
            return false;
        }
        let name = display_name_or_fallback(&session.display_name);
        ResolutionState::draft_with_content(
            with_tex_extension(name),
            session.content.clone(),
            self.pending_source,
        )
        .store(kv);
        true
    }

    /// Records the outcome of a successful save: provenance flips to
    /// `saved` under the filename the store actually wrote.
    pub fn mark_saved(&mut self, resolved_filename: &str) {
        if let Some(session) = self.session.as_mut() {
            session.display_name = crate::resolver::naming::stem(resolved_filename).to_string();
            session.provenance = Provenance::Saved;
        }
    }

    pub fn set_artifact_url(&mut self, url: Option<String>) {
        if let Some(session) = self.session.as_mut() {
            session.artifact_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::MemoryKvStore;
    use std::time::Duration;

    fn draft_session() -> EditorSession {
        EditorSession::new(
            "cv".to_string(),
            "\\documentclass{article}".to_string(),
            Provenance::Draft,
        )
    }

    #[test]
    fn test_edit_without_session_is_noop() {
        let mut slot = SessionSlot::empty();
        let kv = MemoryKvStore::new();

        let token = slot.record_edit(Some("text".to_string()), None, Instant::now());
        assert_eq!(token, None);
        assert_eq!(kv.write_count(), 0);
    }

    #[test]
    fn test_rapid_edits_write_final_content_once() {
        let mut slot = SessionSlot::with_session(draft_session());
        let kv = MemoryKvStore::new();
        let start = Instant::now();

        let mut tokens = Vec::new();
        for i in 0..10 {
            let token = slot.record_edit(
                Some(format!("revision {i}")),
                None,
                start + Duration::from_millis(i * 10),
            );
            tokens.push(token.unwrap());
        }

        let after = start + Duration::from_millis(500);
        let writes: usize = tokens
            .iter()
            .filter(|t| slot.complete_draft_write(&kv, **t, after))
            .count();

        assert_eq!(writes, 1);
        let state = ResolutionState::load(&kv);
        assert_eq!(state.content.as_deref(), Some("revision 9"));
        assert_eq!(state.source, Some(Provenance::Draft));
        assert_eq!(state.filename.as_deref(), Some("cv.tex"));
    }

    #[test]
    fn test_blank_display_name_persists_fallback_filename() {
        let mut slot = SessionSlot::with_session(EditorSession::new(
            "  ".to_string(),
            "text".to_string(),
            Provenance::Draft,
        ));
        let kv = MemoryKvStore::new();
        let start = Instant::now();

        let token = slot.record_edit(None, None, start).unwrap();
        assert!(slot.complete_draft_write(&kv, token, start + Duration::from_secs(1)));

        let state = ResolutionState::load(&kv);
        assert_eq!(state.filename.as_deref(), Some("my_resume.tex"));
    }

    #[test]
    fn test_stale_generation_cannot_overwrite_newer_load() {
        let mut slot = SessionSlot::with_session(draft_session());

        let first = slot.begin_action();
        let second = slot.begin_action();

        // The newer action's response lands first.
        assert!(slot.apply_if_current(
            second,
            EditorSession::new("b".to_string(), "B".to_string(), Provenance::Saved)
        ));
        // The older response must be discarded.
        assert!(!slot.apply_if_current(
            first,
            EditorSession::new("a".to_string(), "A".to_string(), Provenance::Saved)
        ));

        assert_eq!(slot.session().unwrap().display_name, "b");
        assert_eq!(slot.session().unwrap().content, "B");
    }

    #[test]
    fn test_mark_saved_updates_name_and_provenance() {
        let mut slot = SessionSlot::with_session(draft_session());
        slot.mark_saved("final_cv.tex");

        let session = slot.session().unwrap();
        assert_eq!(session.display_name, "final_cv");
        assert_eq!(session.provenance, Provenance::Saved);
    }

    #[test]
    fn test_template_load_schedules_draft_tagged_write() {
        let mut slot = SessionSlot::with_session(draft_session());
        let kv = MemoryKvStore::new();
        let start = Instant::now();

        let token = slot.schedule_draft(Provenance::Draft, start).unwrap();
        assert!(slot.complete_draft_write(&kv, token, start + Duration::from_secs(1)));
        assert_eq!(ResolutionState::load(&kv).source, Some(Provenance::Draft));
    }
}
