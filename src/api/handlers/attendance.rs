use axum::{extract::{State, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::RecordAttendanceRequest;
use crate::domain::models::attendance::{AttendanceQuery, AttendanceRecord, AttendanceStatus};
use crate::domain::models::user::Role;
use crate::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReportQuery {
    pub student_id: Option<String>,
    pub subject: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn query_attendance(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<AttendanceReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut filter = AttendanceQuery {
        student_id: query.student_id,
        // "All" is the dashboard's wildcard subject.
        subject: query.subject.filter(|s| s != "All"),
        start_date: query.start_date,
        end_date: query.end_date,
    };

    // Students only ever see their own records.
    if user.role == Role::Student {
        filter.student_id = Some(user.id.clone());
    }

    let records = state.attendance_repo.query(&filter).await?;
    Ok(Json(records))
}

pub async fn record_attendance(
    State(state): State<Arc<AppState>>,
    AuthUser(teacher): AuthUser,
    Json(payload): Json<RecordAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    teacher.require(Role::Teacher)?;

    let student = state.user_repo.find_by_id(&payload.student_id).await?
        .filter(|u| u.role() == Role::Student)
        .ok_or(AppError::NotFound("Student not found".into()))?;

    if state.attendance_repo
        .find_by_natural_key(&payload.student_id, &payload.subject, payload.date)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Attendance already marked for this subject today.".into()));
    }

    // Scan-based capture sends no status and means PRESENT.
    let record = AttendanceRecord::new(
        payload.id,
        student.id.clone(),
        student.name.clone(),
        teacher.id.clone(),
        payload.subject,
        payload.date,
        payload.status.unwrap_or(AttendanceStatus::Present),
        payload.timestamp,
    );
    let created = state.attendance_repo.create(&record).await?;

    info!("Marked {} as {} for {} on {}", created.student_id, created.status, created.subject, created.date);

    Ok((StatusCode::CREATED, Json(created)))
}
