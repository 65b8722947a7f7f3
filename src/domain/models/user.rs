use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            _ => Err(format!("{:?} is not a valid role", s)),
        }
    }
}

/// Role-specific fields live only on the matching variant; the wire shape
/// stays flat (`role` discriminant alongside the variant's fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleProfile {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "TEACHER")]
    #[serde(rename_all = "camelCase")]
    Teacher {
        #[serde(default)]
        subjects: Vec<String>,
        #[serde(default)]
        allow_invite: bool,
    },
    #[serde(rename = "STUDENT")]
    #[serde(rename_all = "camelCase")]
    Student {
        #[serde(default)]
        teacher_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, name: String, email: String, password_hash: String, profile: RoleProfile) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            profile,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        match self.profile {
            RoleProfile::Admin => Role::Admin,
            RoleProfile::Teacher { .. } => Role::Teacher,
            RoleProfile::Student { .. } => Role::Student,
        }
    }

    pub fn teacher_ids(&self) -> &[String] {
        match &self.profile {
            RoleProfile::Student { teacher_ids } => teacher_ids,
            _ => &[],
        }
    }
}
