use crate::domain::{models::notice::Notice, ports::NoticeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, SqlitePool};

pub struct SqliteNoticeRepo {
    pool: SqlitePool,
}

impl SqliteNoticeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_notice(row: &SqliteRow) -> Result<Notice, sqlx::Error> {
    let attachments_json: String = row.try_get("attachments")?;
    let attachments = serde_json::from_str(&attachments_json)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(Notice {
        id: row.try_get("id")?,
        teacher_id: row.try_get("teacher_id")?,
        teacher_name: row.try_get("teacher_name")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        attachments,
        timestamp: row.try_get("timestamp")?,
    })
}

fn attachments_json(notice: &Notice) -> String {
    serde_json::to_string(&notice.attachments).unwrap_or_else(|_| "[]".into())
}

#[async_trait]
impl NoticeRepository for SqliteNoticeRepo {
    async fn create(&self, notice: &Notice) -> Result<Notice, AppError> {
        let row = sqlx::query(
            "INSERT INTO notices (id, teacher_id, teacher_name, title, content, attachments, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&notice.id)
            .bind(&notice.teacher_id)
            .bind(&notice.teacher_name)
            .bind(&notice.title)
            .bind(&notice.content)
            .bind(attachments_json(notice))
            .bind(notice.timestamp)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        map_notice(&row).map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Notice>, AppError> {
        sqlx::query("SELECT * FROM notices WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(|row| map_notice(&row).map_err(AppError::Database))
            .transpose()
    }

    async fn list_by_teachers(&self, teacher_ids: &[String]) -> Result<Vec<Notice>, AppError> {
        if teacher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new("SELECT * FROM notices WHERE teacher_id IN (");
        let mut separated = qb.separated(", ");
        for id in teacher_ids {
            separated.push_bind(id);
        }
        qb.push(") ORDER BY timestamp DESC");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(AppError::Database)?;
        rows.iter().map(|row| map_notice(row).map_err(AppError::Database)).collect()
    }

    async fn update(&self, notice: &Notice) -> Result<Notice, AppError> {
        let row = sqlx::query(
            "UPDATE notices SET title = ?, content = ?, attachments = ? WHERE id = ? RETURNING *",
        )
            .bind(&notice.title)
            .bind(&notice.content)
            .bind(attachments_json(notice))
            .bind(&notice.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::NotFound("Notice not found".into()),
                e => AppError::Database(e),
            })?;
        map_notice(&row).map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Notice not found".into()));
        }
        Ok(())
    }
}
