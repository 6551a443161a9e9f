//! Axum route handlers for the résumé, job descriptions, and credential.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Multipart, Path, Request, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{JobDescription, JobId};
use crate::models::resume::Resume;
use crate::state::AppState;
use crate::workspace::registry::MAX_JOB_DESCRIPTIONS;
use crate::workspace::upload::extract_text;
use crate::workspace::Workspace;

/// Largest résumé upload accepted, in bytes.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AddJobRequest {
    pub company: String,
    pub position: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectJobRequest {
    /// `None` or `""` clears the selection.
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobDescription>,
    pub selected_id: Option<JobId>,
    pub capacity: usize,
    pub can_add: bool,
    pub can_tailor: bool,
}

impl JobListResponse {
    fn from_workspace(ws: &Workspace) -> Self {
        Self {
            jobs: ws.registry.list().to_vec(),
            selected_id: ws.registry.selected_id().cloned(),
            capacity: MAX_JOB_DESCRIPTIONS,
            can_add: !ws.registry.is_full(),
            can_tailor: ws.can_submit(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddJobResponse {
    /// `None` when the registry was already full.
    pub added: Option<JobDescription>,
    #[serde(flatten)]
    pub list: JobListResponse,
}

#[derive(Debug, Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub is_set: bool,
    pub masked: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersistCredentialResponse {
    pub path: String,
    #[serde(flatten)]
    pub credential: CredentialResponse,
}

fn credential_response(ws: &Workspace) -> CredentialResponse {
    CredentialResponse {
        is_set: ws.credential.is_set(),
        masked: ws.credential.masked(),
    }
}

fn require_field(name: &str, value: String) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }
    Ok(value)
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Resume> {
    Json(state.workspace.lock().await.resume.resume().clone())
}

/// PUT /api/v1/resume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(request): Json<SaveResumeRequest>,
) -> Json<Resume> {
    let mut ws = state.workspace.lock().await;
    ws.resume.save(request.text);
    info!("Resume saved ({} chars)", ws.resume.text().len());
    Json(ws.resume.resume().clone())
}

/// POST /api/v1/resume/upload
///
/// Multipart upload of a `.txt` or `.pdf` résumé in the `file` field. An empty
/// body, or a `file` part with no content (a form submitted with no file
/// chosen), only refreshes the last-updated timestamp.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Resume>, AppError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_UPLOAD_BYTES)
        .await
        .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;

    let extracted = if body.is_empty() {
        None
    } else {
        let request = Request::from_parts(parts, Body::from(body));
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?;
        read_uploaded_file(multipart).await?
    };

    let mut ws = state.workspace.lock().await;
    match extracted {
        Some(text) => {
            info!("Resume uploaded ({} chars)", text.len());
            ws.resume.save(text);
        }
        None => {
            ws.resume.touch();
        }
    }
    Ok(Json(ws.resume.resume().clone()))
}

/// Extracts text from the first `file` part. `None` when there is no file part
/// or it carries no bytes.
async fn read_uploaded_file(mut multipart: Multipart) -> Result<Option<String>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;

        if data.is_empty() {
            return Ok(None);
        }
        let text = extract_text(file_name.as_deref(), content_type.as_deref(), data).await?;
        return Ok(Some(text));
    }
    Ok(None)
}

// ────────────────────────────────────────────────────────────────────────────
// Job descriptions
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    Json(JobListResponse::from_workspace(&*state.workspace.lock().await))
}

/// POST /api/v1/jobs
///
/// 201 when the job was added; 200 with `added: null` when the registry is full.
pub async fn handle_add_job(
    State(state): State<AppState>,
    Json(request): Json<AddJobRequest>,
) -> Result<(StatusCode, Json<AddJobResponse>), AppError> {
    let company = require_field("company", request.company)?;
    let position = require_field("position", request.position)?;
    let description = require_field("description", request.description)?;

    let mut ws = state.workspace.lock().await;
    let added = ws.registry.add(company, position, description).cloned();
    let status = match &added {
        Some(job) => {
            info!("Added job description {} ({})", job.id, job.label());
            StatusCode::CREATED
        }
        None => StatusCode::OK,
    };

    Ok((
        status,
        Json(AddJobResponse {
            added,
            list: JobListResponse::from_workspace(&ws),
        }),
    ))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_remove_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<JobListResponse> {
    let mut ws = state.workspace.lock().await;
    if let Some(job) = ws.registry.remove(&JobId::from(id.as_str())) {
        info!("Removed job description {} ({})", job.id, job.label());
    }
    Json(JobListResponse::from_workspace(&ws))
}

/// PUT /api/v1/jobs/selection
pub async fn handle_select_job(
    State(state): State<AppState>,
    Json(request): Json<SelectJobRequest>,
) -> Result<Json<JobListResponse>, AppError> {
    let mut ws = state.workspace.lock().await;
    ws.registry.select(request.id.as_deref().unwrap_or(""))?;
    Ok(Json(JobListResponse::from_workspace(&ws)))
}

// ────────────────────────────────────────────────────────────────────────────
// Credential
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/credential
pub async fn handle_get_credential(State(state): State<AppState>) -> Json<CredentialResponse> {
    Json(credential_response(&*state.workspace.lock().await))
}

/// PUT /api/v1/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(request): Json<SetCredentialRequest>,
) -> Json<CredentialResponse> {
    let mut ws = state.workspace.lock().await;
    ws.credential.set(request.api_key);
    Json(credential_response(&ws))
}

/// POST /api/v1/credential/persist
pub async fn handle_persist_credential(
    State(state): State<AppState>,
) -> Result<Json<PersistCredentialResponse>, AppError> {
    let ws = state.workspace.lock().await;
    let path = ws.credential.persist().await?.display().to_string();
    Ok(Json(PersistCredentialResponse {
        path,
        credential: credential_response(&ws),
    }))
}
