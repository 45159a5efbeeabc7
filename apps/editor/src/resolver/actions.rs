//! Explicit user actions — each one a deterministic transition of the
//! persisted resolution state plus the in-memory session. Handlers stay
//! thin and call into here.
//!
//! Locking discipline: the session lock is never held across an await.
//! Every action snapshots what it needs, awaits the collaborator, then
//! re-locks and applies the result, presenting the generation it started
//! with so a superseded response is discarded instead of applied.

use std::sync::MutexGuard;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::compiler::{CompileRequest, DEFAULT_ENGINE};
use crate::errors::AppError;
use crate::resolver::naming::{
    display_name_or_fallback, next_untitled_name, stem, timestamped_untitled_name,
    with_tex_extension,
};
use crate::resolver::persistence::{Provenance, ResolutionState};
use crate::resolver::session::{EditorSession, SessionSlot};
use crate::resolver::templates::BLANK_TEMPLATE;
use crate::state::AppState;
use crate::store::DocumentKind;

fn lock(state: &AppState) -> MutexGuard<'_, SessionSlot> {
    state.session.lock().expect("session lock poisoned")
}

/// Spawns the debounce driver for a scheduled draft write: sleep out the
/// quiescence window, then complete the write if the token is still
/// current. A token superseded by a later edit completes nothing.
fn spawn_draft_flush(state: AppState, token: u64) {
    let window = lock(&state).debounce_window();
    tokio::spawn(async move {
        tokio::time::sleep(window).await;
        let wrote = lock(&state).complete_draft_write(state.cache.as_ref(), token, Instant::now());
        if wrote {
            debug!("Persisted draft after quiescence (token {token})");
        }
    });
}

/// Buffer change event from the view. Updates the session and schedules
/// the debounced draft write; a no-op before startup resolution completes.
pub fn record_edit(state: &AppState, content: Option<String>, display_name: Option<String>) {
    let token = lock(state).record_edit(content, display_name, Instant::now());
    match token {
        Some(token) => spawn_draft_flush(state.clone(), token),
        None => debug!("Edit before session exists, nothing to persist"),
    }
}

/// Loads a document from one of the managed folders. Templates become a
/// `draft` (persisted through the debounce path); saved resumes and cover
/// letters become `saved` with the draft content cleared immediately.
pub async fn load_managed_document(
    state: &AppState,
    kind: DocumentKind,
    filename: &str,
) -> Result<(), AppError> {
    let generation = lock(state).begin_action();
    let content = state.store.fetch_by_name(kind, filename).await?;
    let display = stem(filename).to_string();

    match kind {
        DocumentKind::Template => {
            let token = {
                let mut slot = lock(state);
                if !slot.apply_if_current(
                    generation,
                    EditorSession::new(display, content, Provenance::Draft),
                ) {
                    debug!("Discarding stale template load of '{filename}'");
                    return Ok(());
                }
                slot.schedule_draft(Provenance::Draft, Instant::now())
            };
            if let Some(token) = token {
                spawn_draft_flush(state.clone(), token);
            }
        }
        DocumentKind::Resume | DocumentKind::CoverLetter => {
            let mut slot = lock(state);
            if !slot.apply_if_current(
                generation,
                EditorSession::new(display, content, Provenance::Saved),
            ) {
                debug!("Discarding stale load of '{filename}'");
                return Ok(());
            }
            ResolutionState::saved(with_tex_extension(filename)).store(state.cache.as_ref());
        }
    }
    info!("Loaded {} '{filename}'", kind.as_segment());
    Ok(())
}

/// Loads a file picked in the free-form file browser; provenance becomes
/// `external` with the full path remembered.
pub async fn load_external_file(state: &AppState, path: &str, name: &str) -> Result<(), AppError> {
    let generation = lock(state).begin_action();
    let content = state.store.fetch_by_path(path).await?;

    let mut slot = lock(state);
    if !slot.apply_if_current(
        generation,
        EditorSession::new(stem(name).to_string(), content, Provenance::External),
    ) {
        debug!("Discarding stale external load of '{path}'");
        return Ok(());
    }
    ResolutionState::external(with_tex_extension(stem(name)), path.to_string())
        .store(state.cache.as_ref());
    info!("Loaded external file '{path}'");
    Ok(())
}

/// Saves the current buffer into the resumes folder. On success the
/// session and the persisted state flip to `saved` under the filename the
/// store resolved (it may sanitize the name we sent).
pub async fn save_current(state: &AppState) -> Result<String, AppError> {
    let (filename, content) = {
        let slot = lock(state);
        let session = slot
            .session()
            .ok_or_else(|| AppError::Validation("no document is open".to_string()))?;
        (
            with_tex_extension(display_name_or_fallback(&session.display_name)),
            session.content.clone(),
        )
    };

    let receipt = state
        .store
        .save(DocumentKind::Resume, &filename, &content)
        .await?;

    let mut slot = lock(state);
    slot.mark_saved(&receipt.filename);
    ResolutionState::saved(receipt.filename.clone()).store(state.cache.as_ref());
    info!("Saved '{}'", receipt.filename);
    Ok(receipt.filename)
}

/// Replaces the buffer with the blank canvas under a fresh unique name and
/// resets the preview. The name is the smallest free `untitled_N` among
/// saved documents; if the listing cannot be fetched, a timestamp keeps
/// the name unique anyway.
pub async fn new_document(state: &AppState) -> Result<String, AppError> {
    let name = match state.store.list(DocumentKind::Resume).await {
        Ok(listings) => next_untitled_name(listings.iter().map(|l| l.name.as_str())),
        Err(e) => {
            warn!("Saved-document list unavailable ({e}), using timestamp name");
            timestamped_untitled_name(Utc::now())
        }
    };

    let mut slot = lock(state);
    let generation = slot.begin_action();
    slot.apply_if_current(
        generation,
        EditorSession::new(name.clone(), BLANK_TEMPLATE.to_string(), Provenance::Draft),
    );
    ResolutionState::fresh_draft(with_tex_extension(&name)).store(state.cache.as_ref());
    info!("Created new document '{name}'");
    Ok(name)
}

/// Compiles the current buffer. A fresh timestamp query parameter is
/// appended to the artifact URL so the viewer always re-fetches.
pub async fn compile_current(state: &AppState, engine: Option<String>) -> Result<String, AppError> {
    let request = {
        let slot = lock(state);
        let session = slot
            .session()
            .ok_or_else(|| AppError::Validation("no document is open".to_string()))?;
        CompileRequest {
            content: session.content.clone(),
            target: display_name_or_fallback(&session.display_name).to_string(),
            engine: engine.unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        }
    };

    let artifact = state.compiler.compile(&request).await?;
    let url = format!("{}?t={}", artifact.pdf_url, Utc::now().timestamp_millis());
    lock(state).set_artifact_url(Some(url.clone()));
    info!("Compiled '{}' with {}", request.target, request.engine);
    Ok(url)
}

/// Opens a managed document in an external editor. With no filename the
/// current buffer is meant: it is quick-saved first so the external editor
/// sees the latest text, and the open is attempted even if that save fails
/// (the file may already exist on disk).
pub async fn open_in_external_editor(
    state: &AppState,
    filename: Option<String>,
    kind: DocumentKind,
) -> Result<(), AppError> {
    let (filename, kind) = match filename {
        Some(filename) => (filename, kind),
        None => {
            let (filename, content) = {
                let slot = lock(state);
                let session = slot
                    .session()
                    .ok_or_else(|| AppError::Validation("no document is open".to_string()))?;
                (
                    with_tex_extension(display_name_or_fallback(&session.display_name)),
                    session.content.clone(),
                )
            };
            if let Err(e) = state
                .store
                .save(DocumentKind::Resume, &filename, &content)
                .await
            {
                warn!("Quick-save before external open failed: {e}");
            }
            (filename, DocumentKind::Resume)
        }
    };

    state.store.open_in_external_editor(kind, &filename).await?;
    Ok(())
}
