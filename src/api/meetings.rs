//! Meeting endpoints.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use super::require;
use crate::auth::keys;
use crate::errors::{ClientError, Result};
use crate::gateway::{envelope, Gateway};
use crate::models::{
    JoinMeetingResponse, Meeting, MeetingChanges, MeetingDeletion, MeetingFilters, MeetingLog,
    MeetingLogEntry, MyMeetings, MyMeetingsFilters, NewMeeting, UpcomingMeetings,
};

/// Session user id, used as the meeting owner.
fn session_user_id(gateway: &Gateway) -> Option<String> {
    gateway
        .session()
        .get(keys::USER_ID)
        .filter(|id| !id.is_empty())
}

/// POST /create-meet - Create a meeting.
///
/// `created_by` defaults to the session user id. Envelope: bare meeting.
pub async fn create_meeting(gateway: &Gateway, meeting: &NewMeeting) -> Result<Meeting> {
    require(&[("Title", meeting.title.as_str())])?;

    let mut meeting = meeting.clone();
    if meeting.created_by.as_deref().map_or(true, str::is_empty) {
        meeting.created_by = Some(session_user_id(gateway).unwrap_or_default());
    }

    let body = gateway
        .post("/create-meet", &meeting, "Failed to create meeting")
        .await?;
    envelope::decode(&body)
}

#[derive(Serialize)]
struct LegacyJoinBody<'a> {
    meeting_id: &'a str,
    user_email: &'a str,
}

/// POST /join-meet - Join by meeting id and e-mail, without credentials.
///
/// Envelope: `{redirectUrl}`.
pub async fn join_meeting(gateway: &Gateway, meeting_id: &str, user_email: &str) -> Result<String> {
    let http = gateway
        .request_unauthenticated(Method::POST, "/join-meet")
        .json(&LegacyJoinBody {
            meeting_id,
            user_email,
        });
    let body = gateway.send(http, "Failed to join meeting").await?;
    envelope::field(&body, "redirectUrl")
}

#[derive(Serialize)]
struct JoinBody<'a> {
    meet_id: &'a str,
    password: &'a str,
}

/// POST /join-meet - Join a password-protected meeting.
///
/// Envelope: bare `{success, redirectUrl}`. An empty redirect URL is treated
/// as a malformed payload.
pub async fn join_meeting_with_password(
    gateway: &Gateway,
    meeting_id: &str,
    password: &str,
) -> Result<JoinMeetingResponse> {
    require(&[("Meeting id", meeting_id)])?;

    tracing::debug!(meeting_id, has_password = !password.is_empty(), "Joining meeting");
    let body = gateway
        .post(
            "/join-meet",
            &JoinBody {
                meet_id: meeting_id,
                password,
            },
            "Failed to join meeting",
        )
        .await?;

    let response: JoinMeetingResponse = envelope::decode(&body)?;
    if response.redirect_url.is_empty() {
        return Err(ClientError::Decode(
            "Gateway did not return a meeting URL".to_string(),
        ));
    }
    Ok(response)
}

/// GET /meetings - List meetings.
///
/// Envelope: `{data}`, default `[]`.
pub async fn list_meetings(gateway: &Gateway, filters: &MeetingFilters) -> Result<Vec<Meeting>> {
    let body = gateway
        .get("/meetings", &filters.to_query(), "Failed to fetch meetings")
        .await?;
    envelope::field_or_default(&body, "data")
}

/// GET /meetings/:id - Get a single meeting.
///
/// Envelope: `{meeting}`.
pub async fn get_meeting(gateway: &Gateway, meeting_id: &str) -> Result<Meeting> {
    let body = gateway
        .get(
            &format!("/meetings/{}", meeting_id),
            &[],
            "Failed to fetch meeting",
        )
        .await?;
    envelope::field(&body, "meeting")
}

/// PUT /meetings/:id - Update title or description.
///
/// Envelope: `{meeting}`.
pub async fn update_meeting(
    gateway: &Gateway,
    meeting_id: &str,
    changes: &MeetingChanges,
) -> Result<Meeting> {
    let body = gateway
        .put(
            &format!("/meetings/{}", meeting_id),
            changes,
            "Failed to update meeting",
        )
        .await?;
    envelope::field(&body, "meeting")
}

/// DELETE /meetings/:id/delete - Delete a meeting.
///
/// Envelope: bare `{success, message, meeting_id}`.
pub async fn delete_meeting(gateway: &Gateway, meeting_id: &str) -> Result<MeetingDeletion> {
    let body = gateway
        .delete(
            &format!("/meetings/{}/delete", meeting_id),
            "Failed to delete meeting",
        )
        .await?;
    envelope::decode(&body)
}

/// DELETE /meetings/:id/hard-delete - Permanently delete a meeting.
///
/// Envelope: bare `{success, message, meeting_id}`.
pub async fn hard_delete_meeting(gateway: &Gateway, meeting_id: &str) -> Result<MeetingDeletion> {
    let http = gateway
        .request(
            Method::DELETE,
            &format!("/meetings/{}/hard-delete", meeting_id),
        )
        .json(&json!({ "confirm": true }));
    let body = gateway
        .send(http, "Failed to permanently delete meeting")
        .await?;
    envelope::decode(&body)
}

/// GET /meetings/user - Meetings the user created or was invited to.
///
/// Requires a session user id. Envelope: bare
/// `{success, user, filter, data, statistics}`.
pub async fn my_meetings(gateway: &Gateway, filters: &MyMeetingsFilters) -> Result<MyMeetings> {
    if session_user_id(gateway).is_none() {
        return Err(ClientError::Unauthorized(
            "User id not found in session".to_string(),
        ));
    }

    let body = gateway
        .get(
            "/meetings/user",
            &filters.to_query(),
            "Failed to fetch user meetings",
        )
        .await?;
    envelope::decode(&body)
}

/// GET /meetings/my/upcoming - Upcoming meetings for the user.
///
/// Envelope: bare `{success, email, upcoming_meetings, total_count}`.
pub async fn my_upcoming_meetings(gateway: &Gateway) -> Result<UpcomingMeetings> {
    let body = gateway
        .get(
            "/meetings/my/upcoming",
            &[],
            "Failed to fetch upcoming meetings",
        )
        .await?;
    envelope::decode(&body)
}

/// POST /meetings/:id/start - Mark a meeting active.
pub async fn start_meeting(gateway: &Gateway, meeting_id: &str) -> Result<()> {
    gateway
        .post_empty(
            &format!("/meetings/{}/start", meeting_id),
            "Failed to start meeting",
        )
        .await?;
    Ok(())
}

/// POST /meetings/:id/end - Mark a meeting ended.
pub async fn end_meeting(gateway: &Gateway, meeting_id: &str) -> Result<()> {
    gateway
        .post_empty(
            &format!("/meetings/{}/end", meeting_id),
            "Failed to end meeting",
        )
        .await?;
    Ok(())
}

/// POST /meetings/:id/log - Append to the meeting log.
pub async fn add_meeting_log(
    gateway: &Gateway,
    meeting_id: &str,
    entry: &MeetingLogEntry,
) -> Result<()> {
    gateway
        .post(
            &format!("/meetings/{}/log", meeting_id),
            entry,
            "Failed to add meeting log",
        )
        .await?;
    Ok(())
}

/// GET /meetings/:id/log - Read the meeting log.
///
/// Envelope: `{logs}`, default `[]`.
pub async fn meeting_logs(
    gateway: &Gateway,
    meeting_id: &str,
    download: bool,
) -> Result<Vec<MeetingLog>> {
    let query = if download {
        vec![("download", "true".to_string())]
    } else {
        Vec::new()
    };
    let body = gateway
        .get(
            &format!("/meetings/{}/log", meeting_id),
            &query,
            "Failed to fetch meeting logs",
        )
        .await?;
    envelope::field_or_default(&body, "logs")
}
