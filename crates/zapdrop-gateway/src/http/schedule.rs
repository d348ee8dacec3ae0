//! Schedule registration surface.
//!
//! `POST /schedule` — multipart form: `chatName` (comma-delimited names),
//! `message` (caption), `time` ("HH:MM"), `pdf` (the file).
//! Registers a daily dispatch job and answers synchronously; the job itself
//! runs later, when the trigger fires.
//!
//! `GET /schedule` lists registered jobs; `DELETE /schedule/{id}` removes one.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use zapdrop_core::action::DispatchAction;
use zapdrop_core::error::ZapdropError;
use zapdrop_scheduler::{Job, Schedule};

use crate::app::AppState;
use crate::upload;

/// Client-facing error string for a missing or unreadable upload.
const ERR_UPLOAD_MISSING: &str = "Arquivo não encontrado.";

/// Parse "HH:MM" into (hour, minute), rejecting out-of-range values.
pub fn parse_time(raw: &str) -> Result<(u8, u8), ZapdropError> {
    let invalid = || ZapdropError::InvalidTime(raw.to_string());
    let (h, m) = raw.split_once(':').ok_or_else(invalid)?;
    let hour: u8 = h.trim().parse().map_err(|_| invalid())?;
    let minute: u8 = m.trim().parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

/// POST /schedule — store the upload, compile the daily trigger, register
/// the dispatch job.
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut chat_name = String::new();
    let mut caption = String::new();
    let mut time = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "malformed multipart body");
        bad_request("corpo multipart inválido")
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "chatName" => chat_name = field.text().await.unwrap_or_default(),
            "message" => caption = field.text().await.unwrap_or_default(),
            "time" => time = field.text().await.unwrap_or_default(),
            "pdf" => {
                let original = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "documento.pdf".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "failed to read upload field");
                        bad_request(ERR_UPLOAD_MISSING)
                    })?
                    .to_vec();
                file = Some((original, bytes));
            }
            other => {
                warn!(field = %other, "ignoring unknown multipart field");
            }
        }
    }

    let (original_name, bytes) = file.ok_or_else(|| bad_request(ERR_UPLOAD_MISSING))?;

    let targets = DispatchAction::parse_targets(&chat_name);
    if targets.is_empty() {
        return Err(bad_request("chatName é obrigatório"));
    }

    let (hour, minute) = parse_time(&time).map_err(|e| {
        warn!(error = %e, "rejected registration");
        bad_request("time deve estar no formato HH:MM")
    })?;

    let stored = upload::store_upload(&state.uploads_dir, &original_name, &bytes)
        .map_err(|e| {
            warn!(error = %e, "upload could not be stored");
            bad_request(ERR_UPLOAD_MISSING)
        })?;

    let action = DispatchAction {
        targets,
        caption,
        attachment: stored,
    };
    let action_json = serde_json::to_string(&action).map_err(|e| {
        warn!(error = %e, "action serialization failed");
        internal_error()
    })?;

    let schedule = Schedule::daily(hour, minute).map_err(|e| bad_request(&e.to_string()))?;
    let job = state
        .scheduler
        .add_job(&format!("dispatch-{chat_name}"), schedule, &action_json)
        .map_err(|e| {
            warn!(error = %e, "job registration failed");
            internal_error()
        })?;

    info!(job_id = %job.id, time = %time, "schedule registered");
    Ok(Json(json!({
        "success": true,
        "time": format!("{hour:02}:{minute:02}"),
        "id": job.id,
    })))
}

/// GET /schedule — list registered jobs.
pub async fn list_schedules(State(state): State<Arc<AppState>>) -> Json<Vec<Job>> {
    Json(state.scheduler.list_jobs())
}

/// DELETE /schedule/{id} — unregister one job.
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.scheduler.remove_job(&id) {
        Ok(()) => Ok(Json(json!({"success": true}))),
        Err(e) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": e.to_string()})),
        )),
    }
}

fn bad_request(error: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "error": error})),
    )
}

fn internal_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"success": false, "error": "erro interno"})),
    )
}
