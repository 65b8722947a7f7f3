use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::user::{RoleProfile, User};
use crate::domain::ports::UserRepository;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::enrollment::EnrollmentService;
use crate::infra::repositories::{
    postgres_user_repo::PostgresUserRepo, postgres_request_repo::PostgresJoinRequestRepo,
    postgres_attendance_repo::PostgresAttendanceRepo, postgres_notice_repo::PostgresNoticeRepo,
    postgres_paper_repo::PostgresPaperRepo, postgres_settings_repo::PostgresSettingsRepo,
    postgres_auth_repo::PostgresAuthRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_request_repo::SqliteJoinRequestRepo,
    sqlite_attendance_repo::SqliteAttendanceRepo, sqlite_notice_repo::SqliteNoticeRepo,
    sqlite_paper_repo::SqlitePaperRepo, sqlite_settings_repo::SqliteSettingsRepo,
    sqlite_auth_repo::SqliteAuthRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepo::new(pool.clone()));
        let request_repo = Arc::new(PostgresJoinRequestRepo::new(pool.clone()));
        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let enrollment_service = Arc::new(EnrollmentService::new(user_repo.clone(), request_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo,
            request_repo,
            attendance_repo: Arc::new(PostgresAttendanceRepo::new(pool.clone())),
            notice_repo: Arc::new(PostgresNoticeRepo::new(pool.clone())),
            paper_repo: Arc::new(PostgresPaperRepo::new(pool.clone())),
            settings_repo: Arc::new(PostgresSettingsRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            enrollment_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let request_repo = Arc::new(SqliteJoinRequestRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let enrollment_service = Arc::new(EnrollmentService::new(user_repo.clone(), request_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo,
            request_repo,
            attendance_repo: Arc::new(SqliteAttendanceRepo::new(pool.clone())),
            notice_repo: Arc::new(SqliteNoticeRepo::new(pool.clone())),
            paper_repo: Arc::new(SqlitePaperRepo::new(pool.clone())),
            settings_repo: Arc::new(SqliteSettingsRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            enrollment_service,
        }
    };

    seed_admin(&state).await;
    state
}

/// Creates the administrator account on first boot so the system is usable
/// out of the box. The password comes from the environment and is stored
/// hashed like every other credential.
pub async fn seed_admin(state: &AppState) {
    let existing = state.user_repo.find_by_email(&state.config.admin_email).await
        .expect("Failed to query admin account");
    if existing.is_some() {
        info!("Admin account already exists");
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(state.config.admin_password.as_bytes(), &salt)
        .expect("Failed to hash admin password")
        .to_string();

    let admin = User::new(
        "admin-001".to_string(),
        "System Admin".to_string(),
        state.config.admin_email.clone(),
        password_hash,
        RoleProfile::Admin,
    );
    state.user_repo.create(&admin).await.expect("Failed to seed admin account");
    info!("Admin account created");
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
