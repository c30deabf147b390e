//! Activity model, shared by company events and team activities.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{lenient_string, null_as_default};

/// Type-tag prefix for company events.
pub const EVENT_PREFIX: &str = "event_";
/// Type-tag prefix for team activities.
pub const TEAM_ACTIVITY_PREFIX: &str = "activity_";

/// What an activity is, decoded from its `type` tag.
///
/// The gateway encodes the distinction as a string prefix; this is the only
/// place that convention is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// `event_<name>`
    Event(String),
    /// `activity_<name>`
    Team(String),
    /// Any other tag, kept verbatim.
    Other(String),
}

impl ActivityKind {
    pub fn from_wire(tag: &str) -> Self {
        if let Some(name) = tag.strip_prefix(EVENT_PREFIX) {
            ActivityKind::Event(name.to_string())
        } else if let Some(name) = tag.strip_prefix(TEAM_ACTIVITY_PREFIX) {
            ActivityKind::Team(name.to_string())
        } else {
            ActivityKind::Other(tag.to_string())
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            ActivityKind::Event(name) => format!("{}{}", EVENT_PREFIX, name),
            ActivityKind::Team(name) => format!("{}{}", TEAM_ACTIVITY_PREFIX, name),
            ActivityKind::Other(raw) => raw.clone(),
        }
    }

    /// The tag without its prefix.
    pub fn name(&self) -> &str {
        match self {
            ActivityKind::Event(name) | ActivityKind::Team(name) | ActivityKind::Other(name) => {
                name
            }
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, ActivityKind::Event(_))
    }

    pub fn is_team_activity(&self) -> bool {
        matches!(self, ActivityKind::Team(_))
    }

    /// Human label: `activity_team_building` reads `Team Building`.
    pub fn label(&self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Serialize for ActivityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ActivityKind::from_wire(&tag))
    }
}

/// Relation of the current user to an activity, as reported by `/my-activities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityRole {
    Creator,
    Participant,
}

/// An event or team activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub activity_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw type tag; see [`Activity::kind`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employees_joined: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ActivityRole>,
    // Legacy fields still sent by older gateway builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u32>,
}

impl Activity {
    /// Decoded type tag, falling back to the legacy `activity_type`.
    pub fn kind(&self) -> ActivityKind {
        let tag = [&self.type_tag, &self.activity_type]
            .into_iter()
            .flatten()
            .find(|tag| !tag.is_empty())
            .map(String::as_str)
            .unwrap_or("");
        ActivityKind::from_wire(tag)
    }

    /// Scheduled date, falling back to the legacy `scheduled_date`.
    pub fn when(&self) -> Option<&str> {
        self.date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.scheduled_date.as_deref().filter(|d| !d.is_empty()))
    }

    /// Whether `email` counts as joined. The creator always does.
    pub fn is_joined_by(&self, email: &str) -> bool {
        if email.is_empty() {
            return false;
        }
        if self.creator == email {
            return true;
        }
        self.employees_joined.iter().any(|e| e == email)
            || self
                .participants
                .as_ref()
                .is_some_and(|p| p.iter().any(|e| e == email))
    }

    /// Whether the participant cap has been reached.
    pub fn is_full(&self) -> bool {
        match self.max_participants {
            Some(max) if max > 0 => self.employees_joined.len() >= max as usize,
            _ => false,
        }
    }
}

/// Request body for creating an activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewActivity {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
}

impl NewActivity {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Request body for updating an activity. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
}

/// Filters for `GET /activities`.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilters {
    pub status: Option<String>,
    pub type_tag: Option<String>,
    pub activity_type: Option<String>,
    pub creator: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ActivityFilters {
    /// Query pairs for the set filters. Empty strings and zero counts are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let strings = [
            ("status", &self.status),
            ("type", &self.type_tag),
            ("activity_type", &self.activity_type),
            ("creator", &self.creator),
        ];
        for (key, value) in strings {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                query.push((key, value.clone()));
            }
        }
        for (key, value) in [("limit", self.limit), ("offset", self.offset)] {
            if let Some(value) = value.filter(|v| *v > 0) {
                query.push((key, value.to_string()));
            }
        }
        query
    }
}

/// One page of `GET /activities`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPage {
    pub activities: Vec<Activity>,
    pub total: u64,
}

/// Scope of `GET /my-activities`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MyActivitiesFilter {
    #[default]
    All,
    Created,
    Joined,
    Upcoming,
}

impl MyActivitiesFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            MyActivitiesFilter::All => "all",
            MyActivitiesFilter::Created => "created",
            MyActivitiesFilter::Joined => "joined",
            MyActivitiesFilter::Upcoming => "upcoming",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(MyActivitiesFilter::All),
            "created" => Some(MyActivitiesFilter::Created),
            "joined" => Some(MyActivitiesFilter::Joined),
            "upcoming" => Some(MyActivitiesFilter::Upcoming),
            _ => None,
        }
    }
}

/// Format a local date-time the way the gateway expects (`YYYY-MM-DDTHH:MM:SS`).
pub fn format_activity_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}
