use std::str::FromStr;

use crate::domain::{
    models::attendance::{AttendanceQuery, AttendanceRecord, AttendanceStatus},
    ports::AttendanceRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgRow, PgPool, QueryBuilder, Row};

pub struct PostgresAttendanceRepo {
    pool: PgPool,
}

impl PostgresAttendanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_record(row: &PgRow) -> Result<AttendanceRecord, sqlx::Error> {
    let status_str: String = row.try_get("status")?;
    let status = AttendanceStatus::from_str(&status_str)
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(AttendanceRecord {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        student_name: row.try_get("student_name")?,
        teacher_id: row.try_get("teacher_id")?,
        subject: row.try_get("subject")?,
        date: row.try_get("date")?,
        timestamp: row.try_get("timestamp")?,
        status,
    })
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepo {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let row = sqlx::query(
            "INSERT INTO attendance (id, student_id, student_name, teacher_id, subject, date, timestamp, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
            .bind(&record.id)
            .bind(&record.student_id)
            .bind(&record.student_name)
            .bind(&record.teacher_id)
            .bind(&record.subject)
            .bind(record.date)
            .bind(record.timestamp)
            .bind(record.status.as_str())
            .fetch_one(&self.pool)
            .await
            // The natural-key index closes the window between the duplicate
            // check and this insert.
            .map_err(|e| AppError::unique_violation_as_conflict(e, "Attendance already marked for this subject today."))?;
        map_record(&row).map_err(AppError::Database)
    }

    async fn find_by_natural_key(&self, student_id: &str, subject: &str, date: NaiveDate) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query("SELECT * FROM attendance WHERE student_id = $1 AND subject = $2 AND date = $3")
            .bind(student_id)
            .bind(subject)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(|row| map_record(&row).map_err(AppError::Database))
            .transpose()
    }

    async fn query(&self, filter: &AttendanceQuery) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM attendance WHERE 1 = 1");
        if let Some(student_id) = &filter.student_id {
            qb.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(subject) = &filter.subject {
            qb.push(" AND subject = ").push_bind(subject);
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            qb.push(" AND date <= ").push_bind(end);
        }
        qb.push(" ORDER BY timestamp DESC");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(AppError::Database)?;
        rows.iter().map(|row| map_record(row).map_err(AppError::Database)).collect()
    }
}
