//! File action handlers: rename, share, revoke, delete, download, details.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use tracing::info;

use storeit_core::error::AppError;
use storeit_entity::{ACTION_DESCRIPTORS, ActionDescriptor, FileRecord};
use storeit_service::{Mutation, MutationOutcome, ShareList};

use crate::dto::request::{RenameRequest, ShareRequest, validate};
use crate::dto::response::{ApiResponse, FileResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::SignedIn;
use crate::state::AppState;

/// GET /api/files/actions
pub async fn list_actions() -> Json<ApiResponse<Vec<ActionDescriptor>>> {
    Json(ApiResponse::ok(ACTION_DESCRIPTORS.to_vec()))
}

/// GET /api/files/{id}
pub async fn get_file(
    actions: SignedIn,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let file = actions.readable_file(&id).await?;
    Ok(Json(ApiResponse::ok(file.into())))
}

/// PATCH /api/files/{id}/name
pub async fn rename_file(
    actions: SignedIn,
    Path(id): Path<String>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    validate(&req)?;
    let file = actions.owned_file(&id).await?;

    let outcome = Mutation::Rename {
        file_id: file.id.clone(),
        name: req.name,
        extension: file.extension.clone(),
    }
    .apply(&actions.scoped(&file))
    .await?;

    Ok(Json(ApiResponse::ok(updated(outcome)?.into())))
}

/// PUT /api/files/{id}/users
pub async fn update_users(
    actions: SignedIn,
    Path(id): Path<String>,
    Json(req): Json<ShareRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    validate(&req)?;

    let outcome = Mutation::Share {
        file_id: id,
        emails: req.emails,
    }
    .apply(&actions.0)
    .await?;

    Ok(Json(ApiResponse::ok(updated(outcome)?.into())))
}

/// DELETE /api/files/{id}/users/{email}
///
/// Revokes one reader immediately.
pub async fn remove_user(
    actions: SignedIn,
    Path((id, email)): Path<(String, String)>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let file = actions.owned_file(&id).await?;

    let mut readers = ShareList::new(file.users.clone());
    let record = readers
        .remove_email(&id, &email, &actions.scoped(&file))
        .await?;

    Ok(Json(ApiResponse::ok(record.into())))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    actions: SignedIn,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let file = actions.owned_file(&id).await?;

    Mutation::Delete {
        file_id: file.id.clone(),
        blob_id: file.blob_id.clone(),
    }
    .apply(&actions.scoped(&file))
    .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "File deleted".to_string(),
    })))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    actions: SignedIn,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let file = actions.readable_file(&id).await?;
    info!(file_id = %file.id, account_id = %actions.account().id, "Download requested");
    Ok(Redirect::to(&state.file_service.download_url(&file)))
}

fn updated(outcome: MutationOutcome) -> Result<FileRecord, AppError> {
    match outcome {
        MutationOutcome::Updated(file) => Ok(file),
        MutationOutcome::Deleted => Err(AppError::internal("Mutation removed the file")),
    }
}
