use crate::domain::models::attendance::AttendanceStatus;
use crate::domain::models::notice::NoticeAttachment;
use crate::domain::models::user::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub allow_invite: bool,
    #[serde(default)]
    pub teacher_ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub subjects: Option<Vec<String>>,
    pub allow_invite: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceRequest {
    pub id: Option<String>,
    pub student_id: String,
    pub subject: String,
    pub date: NaiveDate,
    pub status: Option<AttendanceStatus>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJoinRequest {
    pub id: Option<String>,
    pub teacher_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondJoinRequest {
    pub request_id: String,
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoticeRequest {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<NoticeAttachment>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoticeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub attachments: Option<Vec<NoticeAttachment>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPaperRequest {
    pub id: Option<String>,
    pub subject: String,
    pub year: String,
    pub title: String,
    pub file_name: String,
    pub file_data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub school_name: Option<String>,
    pub academic_year: Option<String>,
    pub system_notification: Option<String>,
    pub notification_type: Option<String>,
}
