use serde::Serialize;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPaper {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject: String,
    pub year: String,
    pub title: String,
    pub file_name: String,
    /// Base64 payload, passed through untouched.
    pub file_data: String,
    pub uploaded_at: DateTime<Utc>,
}

impl QuestionPaper {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Option<String>,
        teacher_id: String,
        teacher_name: String,
        subject: String,
        year: String,
        title: String,
        file_name: String,
        file_data: String,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            teacher_id,
            teacher_name,
            subject,
            year,
            title,
            file_name,
            file_data,
            uploaded_at: Utc::now(),
        }
    }
}
