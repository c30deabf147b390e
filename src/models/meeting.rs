//! Meeting model and meeting request/response payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_string, null_as_default};

/// A scheduled meeting. The password itself is never exposed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub meeting_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invitation_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_password: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: String,
    /// Active meetings are "upcoming", inactive ones "previous".
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// Request body for `POST /create-meet`.
#[derive(Clone, Default, Serialize)]
pub struct NewMeeting {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "invitedEmployeesList", skip_serializing_if = "Option::is_none")]
    pub invited_employees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Defaults to the session's user id when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl NewMeeting {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for NewMeeting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewMeeting")
            .field("title", &self.title)
            .field("object", &self.object)
            .field("description", &self.description)
            .field("invited_employees", &self.invited_employees)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("created_by", &self.created_by)
            .finish()
    }
}

/// Request body for `PUT /meetings/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Success payload of `POST /join-meet`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinMeetingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

/// Success payload of the meeting delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeetingDeletion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub meeting_id: String,
}

/// Filters for `GET /meetings`.
#[derive(Debug, Clone, Default)]
pub struct MeetingFilters {
    pub user_email: Option<String>,
    pub is_active: Option<bool>,
}

impl MeetingFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(email) = self.user_email.as_ref().filter(|e| !e.is_empty()) {
            query.push(("user_email", email.clone()));
        }
        if let Some(active) = self.is_active {
            query.push(("is_active", active.to_string()));
        }
        query
    }
}

/// Scope of `GET /meetings/user`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MyMeetingsScope {
    #[default]
    All,
    Created,
    Invited,
}

impl MyMeetingsScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MyMeetingsScope::All => "all",
            MyMeetingsScope::Created => "created",
            MyMeetingsScope::Invited => "invited",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(MyMeetingsScope::All),
            "created" => Some(MyMeetingsScope::Created),
            "invited" => Some(MyMeetingsScope::Invited),
            _ => None,
        }
    }
}

/// Filters for `GET /meetings/user`.
#[derive(Debug, Clone, Default)]
pub struct MyMeetingsFilters {
    pub scope: Option<MyMeetingsScope>,
    pub is_active: Option<bool>,
    pub include_details: Option<bool>,
}

impl MyMeetingsFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(scope) = self.scope {
            query.push(("filter", scope.as_str().to_string()));
        }
        if let Some(active) = self.is_active {
            query.push(("is_active", active.to_string()));
        }
        if let Some(details) = self.include_details {
            query.push(("include_details", details.to_string()));
        }
        query
    }
}

/// Per-user meeting counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MeetingStatistics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invited: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

/// Success payload of `GET /meetings/user`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MyMeetings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Meeting>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub statistics: MeetingStatistics,
}

/// Success payload of `GET /meetings/my/upcoming`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpcomingMeetings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upcoming_meetings: Vec<Meeting>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
}

/// Request body for `POST /meetings/{id}/log`.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingLogEntry {
    pub action: String,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A meeting log record. The gateway does not fix its shape.
pub type MeetingLog = Value;
