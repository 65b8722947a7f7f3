use crate::domain::models::{
    user::{Role, User},
    join_request::{JoinRequest, JoinRequestStatus},
    attendance::{AttendanceQuery, AttendanceRecord},
    notice::Notice,
    paper::QuestionPaper,
    settings::SystemSettings,
    auth::RefreshTokenRecord,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>, AppError>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError>;
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// True when the student is already linked to the teacher.
    async fn is_assigned(&self, student_id: &str, teacher_id: &str) -> Result<bool, AppError>;
    /// Idempotent set union of one teacher into one student's links.
    async fn add_teacher(&self, student_id: &str, teacher_id: &str) -> Result<(), AppError>;
    /// Batch union of every teacher into every listed account that has role
    /// STUDENT. Non-student ids are skipped, not rejected.
    async fn assign_teachers(&self, student_ids: &[String], teacher_ids: &[String]) -> Result<(), AppError>;
}

#[async_trait]
pub trait JoinRequestRepository: Send + Sync {
    async fn create(&self, request: &JoinRequest) -> Result<JoinRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<JoinRequest>, AppError>;
    async fn find_pending_pair(&self, student_id: &str, teacher_id: &str) -> Result<Option<JoinRequest>, AppError>;
    async fn list_pending_for_teacher(&self, teacher_id: &str) -> Result<Vec<JoinRequest>, AppError>;
    async fn update_status(&self, id: &str, status: JoinRequestStatus) -> Result<JoinRequest, AppError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError>;
    async fn find_by_natural_key(&self, student_id: &str, subject: &str, date: NaiveDate) -> Result<Option<AttendanceRecord>, AppError>;
    async fn query(&self, filter: &AttendanceQuery) -> Result<Vec<AttendanceRecord>, AppError>;
}

#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn create(&self, notice: &Notice) -> Result<Notice, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Notice>, AppError>;
    async fn list_by_teachers(&self, teacher_ids: &[String]) -> Result<Vec<Notice>, AppError>;
    async fn update(&self, notice: &Notice) -> Result<Notice, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PaperRepository: Send + Sync {
    async fn create(&self, paper: &QuestionPaper) -> Result<QuestionPaper, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<QuestionPaper>, AppError>;
    async fn list_by_teachers(&self, teacher_ids: &[String]) -> Result<Vec<QuestionPaper>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find_global(&self) -> Result<Option<SystemSettings>, AppError>;
    async fn upsert(&self, settings: &SystemSettings) -> Result<SystemSettings, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
}
