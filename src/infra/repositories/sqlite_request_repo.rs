use std::str::FromStr;

use crate::domain::{models::join_request::{JoinRequest, JoinRequestStatus}, ports::JoinRequestRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

pub struct SqliteJoinRequestRepo {
    pool: SqlitePool,
}

impl SqliteJoinRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_request(row: &SqliteRow) -> Result<JoinRequest, sqlx::Error> {
    let status_str: String = row.try_get("status")?;
    let status = JoinRequestStatus::from_str(&status_str)
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(JoinRequest {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        student_name: row.try_get("student_name")?,
        teacher_id: row.try_get("teacher_id")?,
        teacher_name: row.try_get("teacher_name")?,
        status,
        timestamp: row.try_get("timestamp")?,
    })
}

#[async_trait]
impl JoinRequestRepository for SqliteJoinRequestRepo {
    async fn create(&self, request: &JoinRequest) -> Result<JoinRequest, AppError> {
        let row = sqlx::query(
            "INSERT INTO join_requests (id, student_id, student_name, teacher_id, teacher_name, status, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&request.id)
            .bind(&request.student_id)
            .bind(&request.student_name)
            .bind(&request.teacher_id)
            .bind(&request.teacher_name)
            .bind(request.status.as_str())
            .bind(request.timestamp)
            .fetch_one(&self.pool)
            .await
            // The partial unique index on PENDING pairs closes the window
            // between the pending check and this insert.
            .map_err(|e| AppError::unique_violation_as_conflict(e, "Request already pending"))?;
        map_request(&row).map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<JoinRequest>, AppError> {
        sqlx::query("SELECT * FROM join_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(|row| map_request(&row).map_err(AppError::Database))
            .transpose()
    }

    async fn find_pending_pair(&self, student_id: &str, teacher_id: &str) -> Result<Option<JoinRequest>, AppError> {
        sqlx::query("SELECT * FROM join_requests WHERE student_id = ? AND teacher_id = ? AND status = 'PENDING'")
            .bind(student_id)
            .bind(teacher_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(|row| map_request(&row).map_err(AppError::Database))
            .transpose()
    }

    async fn list_pending_for_teacher(&self, teacher_id: &str) -> Result<Vec<JoinRequest>, AppError> {
        let rows = sqlx::query("SELECT * FROM join_requests WHERE teacher_id = ? AND status = 'PENDING' ORDER BY timestamp DESC")
            .bind(teacher_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.iter().map(|row| map_request(row).map_err(AppError::Database)).collect()
    }

    async fn update_status(&self, id: &str, status: JoinRequestStatus) -> Result<JoinRequest, AppError> {
        let row = sqlx::query("UPDATE join_requests SET status = ? WHERE id = ? RETURNING *")
            .bind(status.as_str())
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::NotFound("Request not found".into()),
                e => AppError::Database(e),
            })?;
        map_request(&row).map_err(AppError::Database)
    }
}
