use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::UpdateSettingsRequest;
use crate::domain::models::settings::SystemSettings;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Public: the login screen renders the school name and system notification
/// before anyone is authenticated. Materializes the row on first read.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let settings = match state.settings_repo.find_global().await? {
        Some(settings) => settings,
        None => state.settings_repo.upsert(&SystemSettings::default()).await?,
    };
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    admin.require(Role::Admin)?;

    let mut settings = state.settings_repo.find_global().await?.unwrap_or_default();

    if let Some(school_name) = payload.school_name {
        settings.school_name = school_name;
    }
    if let Some(academic_year) = payload.academic_year {
        settings.academic_year = academic_year;
    }
    if let Some(system_notification) = payload.system_notification {
        settings.system_notification = system_notification;
    }
    if let Some(notification_type) = payload.notification_type {
        settings.notification_type = notification_type;
    }

    let updated = state.settings_repo.upsert(&settings).await?;
    info!("System settings updated");
    Ok(Json(updated))
}
