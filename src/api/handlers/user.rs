use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateUserRequest, UpdateUserRequest};
use crate::domain::models::user::{Role, RoleProfile, User};
use crate::error::AppError;
use std::sync::Arc;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use serde_json::Value;
use tracing::{info, error};

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string())
}

#[derive(serde::Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list(query.role).await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    admin.require(Role::Admin)?;

    if payload.id.trim().is_empty() || payload.name.trim().is_empty()
        || payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    if state.user_repo.find_by_id(&payload.id).await?.is_some() {
        return Err(AppError::Conflict("User ID already exists".into()));
    }
    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let profile = match payload.role {
        Role::Admin => RoleProfile::Admin,
        Role::Teacher => RoleProfile::Teacher {
            subjects: payload.subjects,
            allow_invite: payload.allow_invite,
        },
        Role::Student => RoleProfile::Student {
            teacher_ids: payload.teacher_ids,
        },
    };

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(payload.id, payload.name, payload.email, password_hash, profile);
    let created = state.user_repo.create(&user).await?;

    info!("Created {} account: {}", created.role(), created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    admin.require(Role::Admin)?;

    let mut user = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(name) = payload.name {
        user.name = name;
    }
    if let Some(email) = payload.email {
        user.email = email;
    }
    if let Some(password) = payload.password {
        user.password_hash = hash_password(&password)?;
    }

    // A role change resets the role-specific fields; links of a former
    // student stay in the link table but stop being visible.
    if let Some(role) = payload.role {
        if role != user.role() {
            user.profile = match role {
                Role::Admin => RoleProfile::Admin,
                Role::Teacher => RoleProfile::Teacher { subjects: Vec::new(), allow_invite: false },
                Role::Student => RoleProfile::Student { teacher_ids: Vec::new() },
            };
        }
    }
    if let RoleProfile::Teacher { subjects, allow_invite } = &mut user.profile {
        if let Some(new_subjects) = payload.subjects {
            *subjects = new_subjects;
        }
        if let Some(new_allow_invite) = payload.allow_invite {
            *allow_invite = new_allow_invite;
        }
    }

    let updated = state.user_repo.update(&user).await?;
    info!("Updated user: {}", user_id);
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    admin.require(Role::Admin)?;

    if admin.id == user_id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    match state.user_repo.delete(&target.id).await {
        Ok(_) => {
            info!("Deleted user {}", user_id);
            Ok(Json(serde_json::json!({"message": "User deleted successfully"})))
        },
        Err(e) => {
            error!("Failed to delete user {}: {:?}", user_id, e);
            Err(e)
        }
    }
}

fn parse_id_array(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}

pub async fn bulk_assign(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    admin.require(Role::Admin)?;

    // Validated by hand so a non-array (or non-string element) answers with
    // the exact message the dashboards expect.
    let student_ids = parse_id_array(payload.get("studentIds"));
    let teacher_ids = parse_id_array(payload.get("teacherIds"));
    let (Some(student_ids), Some(teacher_ids)) = (student_ids, teacher_ids) else {
        return Err(AppError::Validation("Invalid data format".into()));
    };

    let updated = state.enrollment_service.bulk_assign(&student_ids, &teacher_ids).await?;
    Ok(Json(updated))
}
