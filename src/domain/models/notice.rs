use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeAttachment {
    pub name: String,
    /// Base64 payload, passed through untouched.
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub title: String,
    pub content: String,
    pub attachments: Vec<NoticeAttachment>,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn new(
        id: Option<String>,
        teacher_id: String,
        teacher_name: String,
        title: String,
        content: String,
        attachments: Vec<NoticeAttachment>,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            teacher_id,
            teacher_name,
            title,
            content,
            attachments,
            timestamp: Utc::now(),
        }
    }
}
