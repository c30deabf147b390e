//! Activity endpoints (company events and team activities).

use serde_json::{json, Value};

use super::require;
use crate::errors::Result;
use crate::gateway::{envelope, Gateway};
use crate::models::{
    Activity, ActivityChanges, ActivityFilters, ActivityPage, MyActivitiesFilter, NewActivity,
};

/// GET /activities - List activities matching `filters`.
///
/// Envelope: `{data, count}`; missing fields read as `[]` and `0`.
pub async fn list_activities(gateway: &Gateway, filters: &ActivityFilters) -> Result<ActivityPage> {
    let body = gateway
        .get("/activities", &filters.to_query(), "Failed to fetch activities")
        .await?;

    Ok(ActivityPage {
        activities: envelope::field_or_default(&body, "data")?,
        total: envelope::field_or_default(&body, "count")?,
    })
}

/// GET /activities/:id - Get a single activity.
///
/// Envelope: `{activity}`.
pub async fn get_activity(gateway: &Gateway, activity_id: i64) -> Result<Activity> {
    let body = gateway
        .get(
            &format!("/activities/{}", activity_id),
            &[],
            "Failed to fetch activity",
        )
        .await?;
    envelope::field(&body, "activity")
}

/// POST /activities - Create an activity.
///
/// Envelope: `{activity}`, or the bare activity.
pub async fn create_activity(gateway: &Gateway, activity: &NewActivity) -> Result<Activity> {
    require(&[("Title", activity.title.as_str())])?;

    tracing::debug!(title = %activity.title, "Creating activity");
    let body = gateway
        .post("/activities", activity, "Failed to create activity")
        .await?;
    envelope::field_or_bare(&body, "activity")
}

/// PUT /activities/:id - Update an activity.
///
/// Envelope: `{activity}`.
pub async fn update_activity(
    gateway: &Gateway,
    activity_id: i64,
    changes: &ActivityChanges,
) -> Result<Activity> {
    let body = gateway
        .put(
            &format!("/activities/{}", activity_id),
            changes,
            "Failed to update activity",
        )
        .await?;
    envelope::field(&body, "activity")
}

/// DELETE /activities/:id - Delete an activity.
pub async fn delete_activity(gateway: &Gateway, activity_id: i64) -> Result<()> {
    gateway
        .delete(
            &format!("/activities/{}", activity_id),
            "Failed to delete activity",
        )
        .await?;
    Ok(())
}

/// POST /activities/:id/join - Join an activity.
///
/// Envelope: `{message}`; the message is returned when present.
pub async fn join_activity(gateway: &Gateway, activity_id: i64) -> Result<Option<String>> {
    let body = gateway
        .post_empty(
            &format!("/activities/{}/join", activity_id),
            "Failed to join activity",
        )
        .await?;
    Ok(envelope::string_field(&body, "message"))
}

/// POST /activities/:id/leave - Leave an activity.
///
/// Leaving twice is reported by the gateway as an error, not a crash.
pub async fn leave_activity(gateway: &Gateway, activity_id: i64) -> Result<Option<String>> {
    let body = gateway
        .post_empty(
            &format!("/activities/{}/leave", activity_id),
            "Failed to leave activity",
        )
        .await?;
    Ok(envelope::string_field(&body, "message"))
}

/// POST /activities/:id/participants - Invite participants by e-mail.
pub async fn add_participants(gateway: &Gateway, activity_id: i64, emails: &[String]) -> Result<()> {
    gateway
        .post(
            &format!("/activities/{}/participants", activity_id),
            &json!({ "emails": emails }),
            "Failed to add participants",
        )
        .await?;
    Ok(())
}

/// GET /activities/:id/participants - List participants.
///
/// Envelope: `{participants}`, default `[]`. Entries have no fixed shape.
pub async fn list_participants(gateway: &Gateway, activity_id: i64) -> Result<Vec<Value>> {
    let body = gateway
        .get(
            &format!("/activities/{}/participants", activity_id),
            &[],
            "Failed to fetch participants",
        )
        .await?;
    envelope::field_or_default(&body, "participants")
}

/// DELETE /activities/:id/participants/:email - Remove a participant.
pub async fn remove_participant(gateway: &Gateway, activity_id: i64, email: &str) -> Result<()> {
    let id = activity_id.to_string();
    let path = gateway.segment_path(&["activities", &id, "participants", email]);
    gateway.delete(&path, "Failed to remove participant").await?;
    Ok(())
}

/// GET /my-activities - Activities the user created or joined.
///
/// Envelope: `{data}`, else `{activities}`, else `[]`.
pub async fn my_activities(gateway: &Gateway, filter: MyActivitiesFilter) -> Result<Vec<Activity>> {
    let body = gateway
        .get(
            "/my-activities",
            &[("filter", filter.as_str().to_string())],
            "Failed to fetch my activities",
        )
        .await?;
    envelope::first_or_default(&body, &["data", "activities"])
}

/// Create an activity, then invite `emails`.
///
/// Inviting is best effort: if it fails the activity still exists, the
/// failure is logged, and the created activity is returned.
pub async fn create_activity_with_participants(
    gateway: &Gateway,
    activity: &NewActivity,
    emails: &[String],
) -> Result<Activity> {
    let created = create_activity(gateway, activity).await?;

    let emails: Vec<String> = emails
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();

    if !emails.is_empty() && created.id != 0 {
        if let Err(e) = add_participants(gateway, created.id, &emails).await {
            tracing::warn!(
                activity_id = created.id,
                "Activity created but inviting participants failed: {}",
                e
            );
        }
    }

    Ok(created)
}

/// Split a comma-separated list of e-mails.
pub fn parse_email_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}
