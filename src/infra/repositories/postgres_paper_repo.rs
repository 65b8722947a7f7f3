use crate::domain::{models::paper::QuestionPaper, ports::PaperRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

pub struct PostgresPaperRepo {
    pool: PgPool,
}

impl PostgresPaperRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaperRepository for PostgresPaperRepo {
    async fn create(&self, paper: &QuestionPaper) -> Result<QuestionPaper, AppError> {
        sqlx::query_as::<_, QuestionPaper>(
            "INSERT INTO question_papers (id, teacher_id, teacher_name, subject, year, title, file_name, file_data, uploaded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
            .bind(&paper.id)
            .bind(&paper.teacher_id)
            .bind(&paper.teacher_name)
            .bind(&paper.subject)
            .bind(&paper.year)
            .bind(&paper.title)
            .bind(&paper.file_name)
            .bind(&paper.file_data)
            .bind(paper.uploaded_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<QuestionPaper>, AppError> {
        sqlx::query_as::<_, QuestionPaper>("SELECT * FROM question_papers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_teachers(&self, teacher_ids: &[String]) -> Result<Vec<QuestionPaper>, AppError> {
        if teacher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new("SELECT * FROM question_papers WHERE teacher_id IN (");
        let mut separated = qb.separated(", ");
        for id in teacher_ids {
            separated.push_bind(id);
        }
        qb.push(") ORDER BY uploaded_at DESC");

        qb.build_query_as::<QuestionPaper>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM question_papers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Paper not found".into()));
        }
        Ok(())
    }
}
