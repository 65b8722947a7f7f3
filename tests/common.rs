#![allow(dead_code)]

use rollcall_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::ports::UserRepository,
    domain::services::auth_service::AuthService,
    domain::services::enrollment::EnrollmentService,
    infra::factory::seed_admin,
    infra::repositories::{
        sqlite_user_repo::SqliteUserRepo,
        sqlite_request_repo::SqliteJoinRequestRepo,
        sqlite_attendance_repo::SqliteAttendanceRepo,
        sqlite_notice_repo::SqliteNoticeRepo,
        sqlite_paper_repo::SqlitePaperRepo,
        sqlite_settings_repo::SqliteSettingsRepo,
        sqlite_auth_repo::SqliteAuthRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@school.test";
pub const ADMIN_PASSWORD: &str = "Admin#12345";

pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        };

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let request_repo = Arc::new(SqliteJoinRequestRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let enrollment_service = Arc::new(EnrollmentService::new(user_repo.clone(), request_repo.clone()));

        let state = Arc::new(AppState {
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
        });

        seed_admin(&state).await;

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", auth.csrf_token.clone());
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, auth: Option<&AuthHeaders>) -> axum::response::Response {
        self.request("GET", uri, auth, None).await
    }

    pub async fn post(&self, uri: &str, auth: Option<&AuthHeaders>, body: Value) -> axum::response::Response {
        self.request("POST", uri, auth, Some(body)).await
    }

    pub async fn put(&self, uri: &str, auth: Option<&AuthHeaders>, body: Value) -> axum::response::Response {
        self.request("PUT", uri, auth, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, auth: Option<&AuthHeaders>) -> axum::response::Response {
        self.request("DELETE", uri, auth, None).await
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> AuthHeaders {
        let payload = json!({
            "email": email,
            "password": password,
            "role": role
        });

        let response = self.post("/api/login", None, payload).await;
        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token = extract_cookie(&cookies, "access_token")
            .expect("No access_token cookie returned");
        let refresh_token = extract_cookie(&cookies, "refresh_token")
            .expect("No refresh_token cookie returned");

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrfToken"].as_str().expect("No csrfToken in body").to_string();

        AuthHeaders {
            access_token,
            refresh_token,
            csrf_token,
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD, "ADMIN").await
    }

    /// Creates an account through the admin API and asserts success.
    pub async fn create_user(&self, admin: &AuthHeaders, payload: Value) -> Value {
        let response = self.post("/api/users", Some(admin), payload).await;
        assert_eq!(response.status(), StatusCode::CREATED, "create_user helper failed");
        parse_body(response).await
    }
}

fn extract_cookie(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    let cookie = cookies.iter().find(|c| c.starts_with(&prefix))?;
    let start = prefix.len();
    let end = cookie[start..].find(';').unwrap_or(cookie.len() - start);
    Some(cookie[start..start + end].to_string())
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
