use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESENT" => Ok(AttendanceStatus::Present),
            "ABSENT" => Ok(AttendanceStatus::Absent),
            _ => Err(format!("{:?} is not a valid attendance status", s)),
        }
    }
}

/// One attendance fact per (student, subject, date). The date is the natural
/// calendar day; the timestamp is the exact capture instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    pub subject: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Option<String>,
        student_id: String,
        student_name: String,
        teacher_id: String,
        subject: String,
        date: NaiveDate,
        status: AttendanceStatus,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            student_id,
            student_name,
            teacher_id,
            subject,
            date,
            timestamp: timestamp.unwrap_or_else(Utc::now),
            status,
        }
    }
}

/// Filter for attendance report queries. `subject` equal to "All" is treated
/// as absent by the handler.
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    pub student_id: Option<String>,
    pub subject: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
