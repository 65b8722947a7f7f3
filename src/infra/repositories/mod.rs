pub mod sqlite_user_repo;
pub mod sqlite_request_repo;
pub mod sqlite_attendance_repo;
pub mod sqlite_notice_repo;
pub mod sqlite_paper_repo;
pub mod sqlite_settings_repo;
pub mod sqlite_auth_repo;

pub mod postgres_user_repo;
pub mod postgres_request_repo;
pub mod postgres_attendance_repo;
pub mod postgres_notice_repo;
pub mod postgres_paper_repo;
pub mod postgres_settings_repo;
pub mod postgres_auth_repo;
