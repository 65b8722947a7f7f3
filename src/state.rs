use std::sync::Arc;
use crate::domain::ports::{
    UserRepository, JoinRequestRepository, AttendanceRepository,
    NoticeRepository, PaperRepository, SettingsRepository, AuthRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::enrollment::EnrollmentService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub request_repo: Arc<dyn JoinRequestRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub notice_repo: Arc<dyn NoticeRepository>,
    pub paper_repo: Arc<dyn PaperRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub enrollment_service: Arc<EnrollmentService>,
}
