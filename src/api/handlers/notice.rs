use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateNoticeRequest, UpdateNoticeRequest};
use crate::domain::models::notice::Notice;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFeedQuery {
    pub teacher_id: Option<String>,
    pub student_id: Option<String>,
}

/// Resolves a teacher/student feed query to the set of teacher ids whose
/// items the caller should see. A student with no linked teachers sees an
/// empty feed.
pub async fn resolve_feed_teachers(
    state: &AppState,
    user: &crate::api::extractors::auth::AuthContext,
    teacher_id: Option<String>,
    student_id: Option<String>,
) -> Result<Vec<String>, AppError> {
    // Students are pinned to their own linkage regardless of the query.
    let student_id = if user.role == Role::Student {
        Some(user.id.clone())
    } else {
        student_id
    };

    if let Some(student_id) = student_id {
        let student = state.user_repo.find_by_id(&student_id).await?
            .ok_or(AppError::NotFound("Student not found".into()))?;
        return Ok(student.teacher_ids().to_vec());
    }

    if let Some(teacher_id) = teacher_id {
        return Ok(vec![teacher_id]);
    }

    match user.role {
        Role::Teacher => Ok(vec![user.id.clone()]),
        _ => Err(AppError::Validation("teacherId or studentId is required".into())),
    }
}

pub async fn get_notices(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<NoticeFeedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let teacher_ids = resolve_feed_teachers(&state, &user, query.teacher_id, query.student_id).await?;
    let notices = state.notice_repo.list_by_teachers(&teacher_ids).await?;
    Ok(Json(notices))
}

pub async fn create_notice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateNoticeRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Teacher)?;

    let teacher = state.user_repo.find_by_id(&user.id).await?
        .ok_or(AppError::Unauthorized)?;

    let notice = Notice::new(
        payload.id,
        teacher.id.clone(),
        teacher.name.clone(),
        payload.title,
        payload.content,
        payload.attachments,
    );
    let created = state.notice_repo.create(&notice).await?;

    info!("Notice {} published by {}", created.id, created.teacher_id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_notice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(notice_id): Path<String>,
    Json(payload): Json<UpdateNoticeRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Teacher)?;

    let mut notice = state.notice_repo.find_by_id(&notice_id).await?
        .ok_or(AppError::NotFound("Notice not found".into()))?;

    if notice.teacher_id != user.id {
        return Err(AppError::Forbidden("Only the author can modify this notice".into()));
    }

    if let Some(title) = payload.title {
        notice.title = title;
    }
    if let Some(content) = payload.content {
        notice.content = content;
    }
    if let Some(attachments) = payload.attachments {
        notice.attachments = attachments;
    }

    let updated = state.notice_repo.update(&notice).await?;
    info!("Updated notice: {}", notice_id);
    Ok(Json(updated))
}

pub async fn delete_notice(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(notice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Teacher)?;

    let notice = state.notice_repo.find_by_id(&notice_id).await?
        .ok_or(AppError::NotFound("Notice not found".into()))?;

    if notice.teacher_id != user.id {
        return Err(AppError::Forbidden("Only the author can modify this notice".into()));
    }

    state.notice_repo.delete(&notice.id).await?;
    info!("Deleted notice: {}", notice_id);
    Ok(Json(serde_json::json!({"message": "Notice deleted"})))
}
