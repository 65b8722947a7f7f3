use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::{models::user::{Role, RoleProfile, User}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, QueryBuilder, Row};
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, subjects, allow_invite, created_at";

fn map_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let role_str: String = row.try_get("role")?;
    let role = Role::from_str(&role_str).map_err(|e| sqlx::Error::Decode(e.into()))?;

    let profile = match role {
        Role::Admin => RoleProfile::Admin,
        Role::Teacher => {
            let subjects_json: String = row.try_get("subjects")?;
            let subjects = serde_json::from_str(&subjects_json)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            RoleProfile::Teacher { subjects, allow_invite: row.try_get("allow_invite")? }
        }
        // Links live in student_teachers and are attached after mapping.
        Role::Student => RoleProfile::Student { teacher_ids: Vec::new() },
    };

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        profile,
        created_at: row.try_get("created_at")?,
    })
}

fn profile_columns(user: &User) -> (String, bool) {
    match &user.profile {
        RoleProfile::Teacher { subjects, allow_invite } => (
            serde_json::to_string(subjects).unwrap_or_else(|_| "[]".into()),
            *allow_invite,
        ),
        _ => ("[]".to_string(), false),
    }
}

impl PostgresUserRepo {
    async fn attach_links(&self, users: &mut [User]) -> Result<(), AppError> {
        let student_ids: Vec<&str> = users.iter()
            .filter(|u| u.role() == Role::Student)
            .map(|u| u.id.as_str())
            .collect();
        if student_ids.is_empty() {
            return Ok(());
        }

        let mut qb = QueryBuilder::new(
            "SELECT student_id, teacher_id FROM student_teachers WHERE student_id IN ("
        );
        let mut separated = qb.separated(", ");
        for id in &student_ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY teacher_id ASC");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(AppError::Database)?;

        let mut links: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            links.entry(row.get("student_id")).or_default().push(row.get("teacher_id"));
        }

        for user in users.iter_mut() {
            if let RoleProfile::Student { teacher_ids } = &mut user.profile {
                *teacher_ids = links.remove(&user.id).unwrap_or_default();
            }
        }
        Ok(())
    }

    async fn map_and_attach(&self, row: Option<PgRow>) -> Result<Option<User>, AppError> {
        match row {
            Some(row) => {
                let mut users = [map_user(&row).map_err(AppError::Database)?];
                self.attach_links(&mut users).await?;
                let [user] = users;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let (subjects, allow_invite) = profile_columns(user);

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, subjects, allow_invite, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role().as_str())
            .bind(&subjects)
            .bind(allow_invite)
            .bind(user.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::unique_violation_as_conflict(e, "User already exists"))?;

        for teacher_id in user.teacher_ids() {
            sqlx::query("INSERT INTO student_teachers (student_id, teacher_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(&user.id)
                .bind(teacher_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;

        self.find_by_id(&user.id).await?.ok_or(AppError::Internal)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        self.map_and_attach(row).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"),
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        self.map_and_attach(row).await
    }

    async fn find_by_email_and_role(&self, email: &str, role: Role) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND role = $2"),
        )
            .bind(email)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        self.map_and_attach(row).await
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new(
            format!("SELECT {USER_COLUMNS} FROM users WHERE id IN (")
        );
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        qb.push(") ORDER BY id ASC");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(AppError::Database)?;
        let mut users = rows.iter().map(map_user).collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Database)?;
        self.attach_links(&mut users).await?;
        Ok(users)
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        let rows = match role {
            Some(role) => sqlx::query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY name ASC"),
            )
                .bind(role.as_str())
                .fetch_all(&self.pool)
                .await,
            None => sqlx::query(
                &format!("SELECT {USER_COLUMNS} FROM users ORDER BY name ASC"),
            )
                .fetch_all(&self.pool)
                .await,
        }.map_err(AppError::Database)?;

        let mut users = rows.iter().map(map_user).collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Database)?;
        self.attach_links(&mut users).await?;
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let (subjects, allow_invite) = profile_columns(user);

        let result = sqlx::query(
            "UPDATE users SET name = $1, email = $2, password_hash = $3, role = $4, subjects = $5, allow_invite = $6 WHERE id = $7",
        )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role().as_str())
            .bind(&subjects)
            .bind(allow_invite)
            .bind(&user.id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::unique_violation_as_conflict(e, "Email already registered"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        self.find_by_id(&user.id).await?.ok_or(AppError::Internal)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Postgres user deletion failed: {:?}", e);
                AppError::Database(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }

        sqlx::query("DELETE FROM student_teachers WHERE student_id = $1 OR teacher_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn is_assigned(&self, student_id: &str, teacher_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM student_teachers WHERE student_id = $1 AND teacher_id = $2)",
        )
            .bind(student_id)
            .bind(teacher_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn add_teacher(&self, student_id: &str, teacher_id: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO student_teachers (student_id, teacher_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(student_id)
            .bind(teacher_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn assign_teachers(&self, student_ids: &[String], teacher_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for student_id in student_ids {
            for teacher_id in teacher_ids {
                sqlx::query(
                    "INSERT INTO student_teachers (student_id, teacher_id)
                     SELECT id, $1 FROM users WHERE id = $2 AND role = 'STUDENT'
                     ON CONFLICT DO NOTHING",
                )
                    .bind(teacher_id)
                    .bind(student_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::Database)?;
            }
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
