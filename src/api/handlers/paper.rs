use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::UploadPaperRequest;
use crate::api::handlers::notice::{resolve_feed_teachers, NoticeFeedQuery};
use crate::domain::models::paper::QuestionPaper;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_papers(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<NoticeFeedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let teacher_ids = resolve_feed_teachers(&state, &user, query.teacher_id, query.student_id).await?;
    let papers = state.paper_repo.list_by_teachers(&teacher_ids).await?;
    Ok(Json(papers))
}

pub async fn upload_paper(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<UploadPaperRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Teacher)?;

    let teacher = state.user_repo.find_by_id(&user.id).await?
        .ok_or(AppError::Unauthorized)?;

    let paper = QuestionPaper::new(
        payload.id,
        teacher.id.clone(),
        teacher.name.clone(),
        payload.subject,
        payload.year,
        payload.title,
        payload.file_name,
        payload.file_data,
    );
    let created = state.paper_repo.create(&paper).await?;

    info!("Paper {} uploaded by {}", created.id, created.teacher_id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_paper(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(paper_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Role::Teacher)?;

    let paper = state.paper_repo.find_by_id(&paper_id).await?
        .ok_or(AppError::NotFound("Paper not found".into()))?;

    if paper.teacher_id != user.id {
        return Err(AppError::Forbidden("Only the uploader can delete this paper".into()));
    }

    state.paper_repo.delete(&paper.id).await?;
    info!("Deleted paper: {}", paper_id);
    Ok(Json(serde_json::json!({"message": "Paper deleted"})))
}
