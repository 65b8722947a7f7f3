use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, user, attendance, enrollment, notice, paper, settings};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/login", post(auth::login))
        .route("/api/forgot-password", post(auth::forgot_password))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))

        // Accounts
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route("/api/users/bulk-assign", post(user::bulk_assign))
        .route("/api/users/{id}", put(user::update_user).delete(user::delete_user))

        // Attendance
        .route("/api/attendance", get(attendance::query_attendance).post(attendance::record_attendance))

        // Join requests
        .route("/api/requests", get(enrollment::list_requests).post(enrollment::submit_request))
        .route("/api/requests/respond", post(enrollment::respond_request))

        // Notice board
        .route("/api/notices", get(notice::get_notices).post(notice::create_notice))
        .route("/api/notices/{id}", put(notice::update_notice).delete(notice::delete_notice))

        // Question papers
        .route("/api/papers", get(paper::get_papers).post(paper::upload_paper))
        .route("/api/papers/{id}", delete(paper::delete_paper))

        // Settings
        .route("/api/settings", get(settings::get_settings).post(settings::update_settings))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
