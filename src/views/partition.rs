//! Client-side partitioning of fetched lists.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{Activity, Meeting};

/// Meetings split into active ("upcoming") and inactive ("previous").
pub fn split_meetings(meetings: Vec<Meeting>) -> (Vec<Meeting>, Vec<Meeting>) {
    meetings.into_iter().partition(|m| m.is_active)
}

/// Activities split into company events and team activities.
///
/// Activities with any other tag belong to neither view and are dropped.
pub fn split_by_kind(activities: Vec<Activity>) -> (Vec<Activity>, Vec<Activity>) {
    let mut events = Vec::new();
    let mut team = Vec::new();
    for activity in activities {
        let kind = activity.kind();
        if kind.is_event() {
            events.push(activity);
        } else if kind.is_team_activity() {
            team.push(activity);
        }
    }
    (events, team)
}

/// Only team activities.
pub fn team_activities(activities: Vec<Activity>) -> Vec<Activity> {
    split_by_kind(activities).1
}

/// Only company events.
pub fn company_events(activities: Vec<Activity>) -> Vec<Activity> {
    split_by_kind(activities).0
}

/// Activities split into upcoming and past relative to `now`.
///
/// Undated or unparsable activities count as upcoming.
pub fn split_by_date(
    activities: Vec<Activity>,
    now: DateTime<Utc>,
) -> (Vec<Activity>, Vec<Activity>) {
    activities.into_iter().partition(|activity| {
        activity
            .when()
            .and_then(parse_activity_date)
            .map_or(true, |date| date >= now)
    })
}

/// Parse the date formats the gateway emits.
///
/// RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` and `YYYY-MM-DD HH:MM:SS` (read as
/// UTC), or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_activity_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// Activities `email` has joined, counting created ones.
pub fn joined_by(activities: &[Activity], email: &str) -> Vec<Activity> {
    activities
        .iter()
        .filter(|a| a.is_joined_by(email))
        .cloned()
        .collect()
}
