use axum::{extract::{State, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{RespondJoinRequest, SubmitJoinRequest};
use crate::domain::models::join_request::JoinRequestStatus;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::str::FromStr;
use std::sync::Arc;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    pub teacher_id: Option<String>,
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListRequestsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let teacher_id = match user.role {
        // Teachers always get their own inbox, whatever the query says.
        Role::Teacher => user.id.clone(),
        Role::Admin => query.teacher_id
            .ok_or(AppError::Validation("teacherId is required".into()))?,
        Role::Student => {
            return Err(AppError::Forbidden("TEACHER privileges required".into()));
        }
    };

    let requests = state.request_repo.list_pending_for_teacher(&teacher_id).await?;
    Ok(Json(requests))
}

pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SubmitJoinRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Student)?;

    let student = state.user_repo.find_by_id(&user.id).await?
        .ok_or(AppError::Unauthorized)?;

    let created = state.enrollment_service
        .submit(&student, &payload.teacher_id, payload.id)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn respond_request(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<RespondJoinRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Teacher)?;

    let status = JoinRequestStatus::from_str(&payload.status)
        .map_err(|_| AppError::Validation("Invalid status".into()))?;

    let updated = state.enrollment_service
        .respond(&payload.request_id, status, &user.id)
        .await?;

    Ok(Json(updated))
}
