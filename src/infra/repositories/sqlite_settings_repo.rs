use crate::domain::{models::settings::SystemSettings, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn find_global(&self) -> Result<Option<SystemSettings>, AppError> {
        sqlx::query_as::<_, SystemSettings>("SELECT * FROM settings WHERE id = ?")
            .bind(crate::domain::models::settings::GLOBAL_SETTINGS_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, settings: &SystemSettings) -> Result<SystemSettings, AppError> {
        sqlx::query_as::<_, SystemSettings>(
            "INSERT INTO settings (id, school_name, academic_year, system_notification, notification_type)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 school_name = excluded.school_name,
                 academic_year = excluded.academic_year,
                 system_notification = excluded.system_notification,
                 notification_type = excluded.notification_type
             RETURNING *",
        )
            .bind(&settings.id)
            .bind(&settings.school_name)
            .bind(&settings.academic_year)
            .bind(&settings.system_notification)
            .bind(&settings.notification_type)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
