//! HTTP surface of the editor session — thin wrappers that parse, call
//! into [`actions`](crate::resolver::actions), and map errors through
//! `AppError`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::compiler::ToolchainStatus;
use crate::errors::AppError;
use crate::resolver::actions;
use crate::resolver::persistence::Provenance;
use crate::state::AppState;
use crate::store::browse::{filter_files, group_files, FileGroup};
use crate::store::{DocumentKind, DocumentListing};

#[derive(Serialize)]
pub struct SessionView {
    pub display_name: String,
    pub content: String,
    pub provenance: Provenance,
    pub artifact_url: Option<String>,
}

fn session_view(state: &AppState) -> Result<SessionView, AppError> {
    let slot = state.session.lock().expect("session lock poisoned");
    let session = slot
        .session()
        .ok_or_else(|| AppError::NotFound("no document is open".to_string()))?;
    Ok(SessionView {
        display_name: session.display_name.clone(),
        content: session.content.clone(),
        provenance: session.provenance,
        artifact_url: session.artifact_url.clone(),
    })
}

fn parse_kind(kind: &str) -> Result<DocumentKind, AppError> {
    DocumentKind::parse(kind)
        .ok_or_else(|| AppError::Validation(format!("unknown document kind '{kind}'")))
}

/// GET /api/session
pub async fn handle_get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(session_view(&state)?))
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub content: Option<String>,
    pub display_name: Option<String>,
}

/// POST /api/session/edit — buffer change event from the view.
pub async fn handle_edit(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> StatusCode {
    actions::record_edit(&state, req.content, req.display_name);
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct CompileParams {
    pub engine: Option<String>,
}

#[derive(Serialize)]
pub struct CompileResponse {
    pub success: bool,
    pub pdf_url: String,
}

/// POST /api/session/compile
pub async fn handle_compile(
    State(state): State<AppState>,
    Json(req): Json<CompileParams>,
) -> Result<Json<CompileResponse>, AppError> {
    let pdf_url = actions::compile_current(&state, req.engine).await?;
    Ok(Json(CompileResponse {
        success: true,
        pdf_url,
    }))
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub filename: String,
}

/// POST /api/session/save
pub async fn handle_save(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let filename = actions::save_current(&state).await?;
    Ok(Json(SaveResponse {
        success: true,
        filename,
    }))
}

/// POST /api/session/new
pub async fn handle_new(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    actions::new_document(&state).await?;
    Ok(Json(session_view(&state)?))
}

/// POST /api/session/load/:kind/:name — managed-folder load (templates,
/// resumes, cover letters).
pub async fn handle_load_managed(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
) -> Result<Json<SessionView>, AppError> {
    let kind = parse_kind(&kind)?;
    actions::load_managed_document(&state, kind, &name).await?;
    Ok(Json(session_view(&state)?))
}

#[derive(Deserialize)]
pub struct LoadPathRequest {
    pub path: String,
    pub name: String,
}

/// POST /api/session/load-path — file-browser open by full path.
pub async fn handle_load_path(
    State(state): State<AppState>,
    Json(req): Json<LoadPathRequest>,
) -> Result<Json<SessionView>, AppError> {
    actions::load_external_file(&state, &req.path, &req.name).await?;
    Ok(Json(session_view(&state)?))
}

/// GET /api/documents/:kind
pub async fn handle_list_documents(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<DocumentListing>>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.store.list(kind).await?))
}

#[derive(Deserialize)]
pub struct FilesQuery {
    pub q: Option<String>,
}

/// GET /api/files — grouped recursive scan, workspace group first.
pub async fn handle_list_files(
    State(state): State<AppState>,
    Query(params): Query<FilesQuery>,
) -> Result<Json<Vec<FileGroup>>, AppError> {
    let files = state.store.list_files_recursive().await?;
    let files = filter_files(files, params.q.as_deref().unwrap_or(""));
    Ok(Json(group_files(files, &state.config.workspace_label)))
}

/// GET /api/engines
pub async fn handle_engines(
    State(state): State<AppState>,
) -> Result<Json<ToolchainStatus>, AppError> {
    Ok(Json(state.compiler.health_check().await?))
}

#[derive(Deserialize)]
pub struct OpenInEditorRequest {
    pub filename: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct OpenInEditorResponse {
    pub success: bool,
}

/// POST /api/open-in-editor
pub async fn handle_open_in_editor(
    State(state): State<AppState>,
    Json(req): Json<OpenInEditorRequest>,
) -> Result<Json<OpenInEditorResponse>, AppError> {
    let kind = match req.kind.as_deref() {
        Some(kind) => parse_kind(kind)?,
        None => DocumentKind::Resume,
    };
    actions::open_in_external_editor(&state, req.filename, kind).await?;
    Ok(Json(OpenInEditorResponse { success: true }))
}
