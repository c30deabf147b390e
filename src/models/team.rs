//! Teammate and employee directory models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_string, null_as_default};

/// A directory entry. Managers and peers see the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teammate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(
        rename = "employeesList",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employees_list: Option<Vec<Value>>,
}

impl Teammate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive match on name, email, role or department.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            self.full_name().as_str(),
            self.email.as_str(),
            self.role.as_str(),
            self.department.as_deref().unwrap_or(""),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Success payload of `GET /my-employees`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Employees {
    #[serde(default, deserialize_with = "null_as_default")]
    pub employees: Vec<Teammate>,
    #[serde(default)]
    pub manager: Option<Teammate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employees_count: u64,
}

/// Success payload of `GET /teammates`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Teammates {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teammates: Vec<Teammate>,
    #[serde(default)]
    pub manager: Option<Teammate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teammates_count: u64,
    /// The requesting employee, when the gateway echoes it.
    #[serde(default)]
    pub employee: Option<Teammate>,
}

/// Success payload of `GET /team`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamInfo {
    #[serde(default)]
    pub employee: Option<Teammate>,
    #[serde(default)]
    pub manager: Option<Teammate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub teammates: Vec<Teammate>,
}

/// Success payload of `GET /user/identity`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}
