use serde::Serialize;
use sqlx::FromRow;

pub const GLOBAL_SETTINGS_ID: &str = "global";

/// Singleton configuration row, materialized with defaults on first read.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub id: String,
    pub school_name: String,
    pub academic_year: String,
    pub system_notification: String,
    pub notification_type: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            id: GLOBAL_SETTINGS_ID.to_string(),
            school_name: String::new(),
            academic_year: String::new(),
            system_notification: String::new(),
            notification_type: "info".to_string(),
        }
    }
}
