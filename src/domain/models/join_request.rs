use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// PENDING is the only non-terminal state. A resolved request is kept as an
/// audit record and never reused; a retry means a fresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "PENDING",
            JoinRequestStatus::Accepted => "ACCEPTED",
            JoinRequestStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JoinRequestStatus::Pending)
    }
}

impl std::fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JoinRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JoinRequestStatus::Pending),
            "ACCEPTED" => Ok(JoinRequestStatus::Accepted),
            "REJECTED" => Ok(JoinRequestStatus::Rejected),
            _ => Err(format!("{:?} is not a valid join request status", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    /// Teacher name at submission time. Not kept in sync with later renames.
    pub teacher_name: String,
    pub status: JoinRequestStatus,
    pub timestamp: DateTime<Utc>,
}

impl JoinRequest {
    pub fn new(
        id: Option<String>,
        student_id: String,
        student_name: String,
        teacher_id: String,
        teacher_name: String,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            student_id,
            student_name,
            teacher_id,
            teacher_name,
            status: JoinRequestStatus::Pending,
            timestamp: Utc::now(),
        }
    }
}
