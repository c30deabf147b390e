//! Integration tests against a mock gateway.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::api;
use crate::auth::{keys, FileStore, KeyValueStore, Session, SessionStore};
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::models::{
    ActivityChanges, ActivityFilters, MeetingChanges, MeetingFilters, MeetingLogEntry,
    MyActivitiesFilter, MyMeetingsFilters, MyMeetingsScope, NewActivity, NewMeeting,
    SignUpRequest,
};
use crate::views::{JoinMeetingFlow, JoinState, LaunchTarget, Launcher, ListView, ViewState};

/// A request as the mock gateway saw it.
#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Request body is not JSON")
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    /// Queued responses per (method, path). The last one repeats.
    routes: Mutex<HashMap<(String, String), VecDeque<Canned>>>,
    requests: Mutex<Vec<Recorded>>,
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .map(|v| v.to_str().unwrap_or_default().to_string())
    };

    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    let canned = {
        let mut routes = state.routes.lock().unwrap();
        routes
            .get_mut(&(method.to_string(), uri.path().to_string()))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
    };

    match canned {
        Some(canned) => (
            StatusCode::from_u16(canned.status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            canned.body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "error": "Route not mocked" }).to_string(),
        )
            .into_response(),
    }
}

/// Test fixture: a mock gateway on a random port.
struct TestFixture {
    state: Arc<MockState>,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestFixture { state, base_url }
    }

    /// Gateway client with an empty in-memory session.
    fn gateway(&self) -> Gateway {
        Gateway::new(&self.base_url, Arc::new(SessionStore::in_memory())).unwrap()
    }

    /// Gateway client with a signed-in session.
    fn signed_in(&self) -> Gateway {
        let gateway = self.gateway();
        gateway.session().set(&Session {
            token: "tok".to_string(),
            user_id: "42".to_string(),
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: "user".to_string(),
        });
        gateway
    }

    fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, body.to_string().into_bytes());
    }

    fn respond_raw(&self, method: &str, path: &str, status: u16, body: Vec<u8>) {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(Canned { status, body });
    }

    fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    fn last(&self, method: &str, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .unwrap_or_else(|| panic!("No {} {} request recorded", method, path))
    }
}

#[derive(Default)]
struct RecordingLauncher {
    blocked: bool,
    opened: Vec<String>,
    navigated: Vec<String>,
}

impl Launcher for RecordingLauncher {
    fn open_new_context(&mut self, url: &str) -> bool {
        self.opened.push(url.to_string());
        !self.blocked
    }

    fn navigate_current(&mut self, url: &str) {
        self.navigated.push(url.to_string());
    }
}

// Auth

#[tokio::test]
async fn test_sign_up_stores_session() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/signup",
        201,
        json!({ "id": "u-1", "AuthToken": "tok", "firstname": "John", "lastname": "Doe", "role": "user" }),
    );

    let gateway = fixture.gateway();
    let user = api::sign_up(
        &gateway,
        &SignUpRequest {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            password: "pw123".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            address: "123 Main St".to_string(),
            manager_code: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(user.id, "u-1");
    assert_eq!(user.display_name(), "John Doe");

    let session = gateway.session();
    assert_eq!(session.get(keys::TOKEN).as_deref(), Some("tok"));
    assert_eq!(session.get(keys::USER_FIRSTNAME).as_deref(), Some("John"));
    assert_eq!(session.get(keys::USER_LASTNAME).as_deref(), Some("Doe"));
    assert_eq!(session.get(keys::USER_EMAIL).as_deref(), Some("john@example.com"));
    assert_eq!(session.get(keys::USER_ROLE).as_deref(), Some("user"));

    let request = fixture.last("POST", "/signup");
    assert!(request.authorization.is_none());
    let body = request.json();
    assert_eq!(body["Password"], "pw123");
    assert_eq!(body["FirstName"], "John");
    assert_eq!(body["DateOfBirth"], "1990-01-01");
    assert!(body.get("managercode").is_none());
}

#[tokio::test]
async fn test_sign_up_role_defaults_to_user() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/signup", 200, json!({ "id": 9, "AuthToken": "tok" }));

    let gateway = fixture.gateway();
    let user = api::sign_up(
        &gateway,
        &SignUpRequest {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            password: "pw".to_string(),
            date_of_birth: String::new(),
            address: String::new(),
            manager_code: Some("MGR-1".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(user.id, "9");
    assert_eq!(user.role, "user");
    assert_eq!(gateway.session().get(keys::USER_FIRSTNAME).as_deref(), Some("Ann"));
    assert_eq!(fixture.last("POST", "/signup").json()["managercode"], "MGR-1");
}

#[tokio::test]
async fn test_sign_up_rejects_missing_fields_locally() {
    let fixture = TestFixture::new().await;
    let gateway = fixture.gateway();

    let err = api::sign_up(
        &gateway,
        &SignUpRequest {
            first_name: "John".to_string(),
            last_name: String::new(),
            email: "john@example.com".to_string(),
            password: "pw".to_string(),
            date_of_birth: String::new(),
            address: String::new(),
            manager_code: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(fixture.requests().is_empty());
}

#[tokio::test]
async fn test_sign_in_maps_employer_to_admin() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/login",
        200,
        json!({ "id": 7, "Token": "t2", "email": "boss@example.com", "firstname": "Big", "lastname": "Boss", "role": "EMPLOYER" }),
    );

    let gateway = fixture.gateway();
    let user = api::sign_in(&gateway, "boss@example.com", "pw").await.unwrap();

    assert_eq!(user.role, "admin");
    assert!(user.is_admin());
    assert_eq!(user.id, "7");
    assert_eq!(gateway.session().token().as_deref(), Some("t2"));
    assert_eq!(gateway.session().get(keys::USER_ROLE).as_deref(), Some("EMPLOYER"));

    let body = fixture.last("POST", "/login").json();
    assert_eq!(body, json!({ "email": "boss@example.com", "password": "pw" }));
}

#[tokio::test]
async fn test_sign_in_failure_surfaces_gateway_message() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/login", 401, json!({ "message": "Invalid credentials" }));

    let gateway = fixture.gateway();
    let err = api::sign_in(&gateway, "john@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn test_sign_out_clears_every_key() {
    let fixture = TestFixture::new().await;
    let gateway = fixture.signed_in();
    gateway.session().ephemeral().set("draft", "x");

    api::sign_out(&gateway);

    for key in keys::ALL {
        assert!(gateway.session().get(key).is_none(), "{} survived sign-out", key);
    }
    assert!(gateway.session().ephemeral().is_empty());
    assert!(gateway.session().current().is_none());
}

#[tokio::test]
async fn test_session_survives_restart_through_file_store() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/login", 200, json!({ "id": "u-1", "Token": "persisted" }));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("session.json");

    {
        let session = Arc::new(SessionStore::new(FileStore::open(&path)));
        let gateway = Gateway::new(&fixture.base_url, session).unwrap();
        api::sign_in(&gateway, "john@example.com", "pw").await.unwrap();
    }

    let session = Arc::new(SessionStore::new(FileStore::open(&path)));
    let gateway = Gateway::new(&fixture.base_url, session).unwrap();
    assert_eq!(gateway.session().token().as_deref(), Some("persisted"));
    assert_eq!(gateway.authorization(), "Bearer persisted");
}

// Transport

#[tokio::test]
async fn test_bearer_header_follows_session() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/activities", 200, json!({ "data": [], "count": 0 }));

    let gateway = fixture.signed_in();
    api::list_activities(&gateway, &ActivityFilters::default())
        .await
        .unwrap();
    let request = fixture.last("GET", "/activities");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));

    api::sign_out(&gateway);
    api::list_activities(&gateway, &ActivityFilters::default())
        .await
        .unwrap();
    assert_eq!(fixture.last("GET", "/activities").authorization.as_deref(), Some(""));
}

#[tokio::test]
async fn test_error_field_takes_priority_over_message() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/activities",
        400,
        json!({ "error": "Invalid status filter", "message": "Bad request" }),
    );

    let err = api::list_activities(&fixture.signed_in(), &ActivityFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(err.message(), "Invalid status filter");
}

#[tokio::test]
async fn test_status_fallback_message() {
    let fixture = TestFixture::new().await;
    fixture.respond_raw("GET", "/activities", 500, b"<html>oops</html>".to_vec());
    fixture.respond_raw("GET", "/meetings", 503, Vec::new());

    let gateway = fixture.signed_in();
    let err = api::list_activities(&gateway, &ActivityFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Server(_)));
    assert_eq!(err.message(), "Failed to fetch activities: 500");

    let err = api::list_meetings(&gateway, &Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Failed to fetch meetings: 503");
}

#[tokio::test]
async fn test_malformed_success_payload_is_decode_error() {
    let fixture = TestFixture::new().await;
    fixture.respond_raw("GET", "/team", 200, b"not json".to_vec());

    let err = api::team(&fixture.signed_in()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_gateway_is_network_error() {
    // Nothing listens on the discard port.
    let gateway = Gateway::new("http://127.0.0.1:9", Arc::new(SessionStore::in_memory())).unwrap();
    let err = api::my_upcoming_meetings(&gateway).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}

// Activities

#[tokio::test]
async fn test_list_activities_envelope_and_query() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/activities",
        200,
        json!({
            "data": [
                { "id": 1, "title": "Quiz", "type": "activity_quiz", "creator": "a@example.com" },
                { "id": 2, "title": "Summit", "type": "event_summit", "creator": "b@example.com" }
            ],
            "count": 2
        }),
    );

    let page = api::list_activities(
        &fixture.signed_in(),
        &ActivityFilters {
            status: Some("scheduled".to_string()),
            creator: Some(String::new()),
            limit: Some(10),
            offset: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.activities.len(), 2);
    assert!(page.activities[1].kind().is_event());

    let query = fixture.last("GET", "/activities").query.unwrap_or_default();
    assert!(query.contains("status=scheduled"));
    assert!(query.contains("limit=10"));
    assert!(!query.contains("creator"));
    assert!(!query.contains("offset"));
}

#[tokio::test]
async fn test_list_activities_missing_fields_default() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/activities", 200, json!({}));

    let page = api::list_activities(&fixture.signed_in(), &ActivityFilters::default())
        .await
        .unwrap();
    assert!(page.activities.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_my_activities_envelope_fallback() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/my-activities",
        200,
        json!({ "activities": [{ "id": 5, "title": "Legacy", "activity_type": "activity_hike" }] }),
    );

    let activities = api::my_activities(&fixture.signed_in(), MyActivitiesFilter::Joined)
        .await
        .unwrap();
    assert_eq!(activities.len(), 1);
    assert!(activities[0].kind().is_team_activity());
    assert_eq!(
        fixture.last("GET", "/my-activities").query.as_deref(),
        Some("filter=joined")
    );
}

#[tokio::test]
async fn test_creator_counts_as_joined() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/my-activities",
        200,
        json!({ "data": [
            { "id": 1, "title": "Mine", "type": "activity_a", "creator": "john@example.com", "employees_joined": null },
            { "id": 2, "title": "Theirs", "type": "activity_b", "creator": "x@example.com", "employees_joined": [] }
        ]}),
    );

    let activities = api::my_activities(&fixture.signed_in(), MyActivitiesFilter::All)
        .await
        .unwrap();
    assert!(activities[0].is_joined_by("john@example.com"));
    assert!(!activities[1].is_joined_by("john@example.com"));
}

#[tokio::test]
async fn test_leave_twice_reports_error() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/activities/3/leave", 200, json!({ "message": "Left activity" }));
    fixture.respond(
        "POST",
        "/activities/3/leave",
        500,
        json!({ "error": "Not a participant of this activity" }),
    );

    let gateway = fixture.signed_in();
    let message = api::leave_activity(&gateway, 3).await.unwrap();
    assert_eq!(message.as_deref(), Some("Left activity"));

    let err = api::leave_activity(&gateway, 3).await.unwrap_err();
    assert!(matches!(err, ClientError::Server(_)));
    assert_eq!(err.message(), "Not a participant of this activity");
}

#[tokio::test]
async fn test_create_activity_tolerates_invite_failure() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/activities",
        201,
        json!({ "activity": { "id": 11, "title": "Bowling", "type": "activity_bowling", "creator": "john@example.com" } }),
    );
    fixture.respond(
        "POST",
        "/activities/11/participants",
        500,
        json!({ "error": "Mail server down" }),
    );

    let activity = NewActivity {
        kind: Some(crate::models::ActivityKind::from_wire("activity_bowling")),
        ..NewActivity::new("Bowling")
    };
    let created = api::create_activity_with_participants(
        &fixture.signed_in(),
        &activity,
        &["a@example.com".to_string(), " ".to_string()],
    )
    .await
    .unwrap();

    assert_eq!(created.id, 11);
    let sent = fixture.last("POST", "/activities").json();
    assert_eq!(sent["title"], "Bowling");
    assert_eq!(sent["type"], "activity_bowling");
    assert_eq!(
        fixture.last("POST", "/activities/11/participants").json(),
        json!({ "emails": ["a@example.com"] })
    );
}

#[tokio::test]
async fn test_remove_participant_encodes_email() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "DELETE",
        "/activities/4/participants/ops%2Fteam%20lead@example.com",
        200,
        json!({ "message": "Removed" }),
    );

    api::remove_participant(&fixture.signed_in(), 4, "ops/team lead@example.com")
        .await
        .unwrap();
    let request = fixture.last("DELETE", "/activities/4/participants/ops%2Fteam%20lead@example.com");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
}

// Meetings

#[tokio::test]
async fn test_join_with_password_returns_redirect() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/join-meet",
        200,
        json!({ "success": true, "redirectUrl": "https://x/y" }),
    );

    let response = api::join_meeting_with_password(&fixture.signed_in(), "m-1", "secret")
        .await
        .unwrap();
    assert_eq!(response.redirect_url, "https://x/y");
    assert_eq!(
        fixture.last("POST", "/join-meet").json(),
        json!({ "meet_id": "m-1", "password": "secret" })
    );
}

#[tokio::test]
async fn test_join_flow_opens_meeting() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/join-meet",
        200,
        json!({ "success": true, "redirectUrl": "https://x/y" }),
    );

    let gateway = fixture.signed_in();
    let mut flow = JoinMeetingFlow::new();
    let mut launcher = RecordingLauncher {
        blocked: true,
        ..Default::default()
    };

    flow.prompt("m-1");
    let target = flow.submit(&gateway, "secret", &mut launcher).await.unwrap();

    assert_eq!(target, LaunchTarget::CurrentContext);
    assert_eq!(launcher.opened, vec!["https://x/y".to_string()]);
    assert_eq!(launcher.navigated, vec!["https://x/y".to_string()]);
    assert_eq!(
        flow.state(),
        &JoinState::Joined {
            url: "https://x/y".to_string(),
            target: LaunchTarget::CurrentContext
        }
    );
}

#[tokio::test]
async fn test_join_flow_wrong_password_returns_to_prompt() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/join-meet", 403, json!({ "error": "Invalid password" }));

    let gateway = fixture.signed_in();
    let mut flow = JoinMeetingFlow::new();
    let mut launcher = RecordingLauncher::default();

    flow.prompt("m-1");
    let err = flow.submit(&gateway, "wrong", &mut launcher).await.unwrap_err();

    assert_eq!(err.message(), "Invalid password");
    assert_eq!(
        flow.state(),
        &JoinState::PasswordPrompt {
            meeting_id: "m-1".to_string(),
            last_error: Some("Invalid password".to_string())
        }
    );
    assert!(launcher.opened.is_empty());
}

#[tokio::test]
async fn test_create_meeting_defaults_owner() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/create-meet",
        201,
        json!({ "id": 3, "meeting_id": "abc", "title": "Standup", "created_by": "42", "is_active": true }),
    );

    let meeting = api::create_meeting(
        &fixture.signed_in(),
        &NewMeeting {
            invited_employees: Some(vec!["a@example.com".to_string()]),
            password: Some("pw".to_string()),
            ..NewMeeting::new("Standup")
        },
    )
    .await
    .unwrap();

    assert_eq!(meeting.meeting_id, "abc");
    let sent = fixture.last("POST", "/create-meet").json();
    assert_eq!(sent["created_by"], "42");
    assert_eq!(sent["invitedEmployeesList"], json!(["a@example.com"]));
}

#[tokio::test]
async fn test_my_meetings_requires_user_id() {
    let fixture = TestFixture::new().await;
    let gateway = fixture.gateway();

    let err = api::my_meetings(&gateway, &MyMeetingsFilters::default())
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Unauthorized("User id not found in session".to_string()));
    assert!(fixture.requests().is_empty());
}

#[tokio::test]
async fn test_my_meetings_with_scope() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/meetings/user",
        200,
        json!({
            "success": true,
            "user": "42",
            "filter": "created",
            "data": [
                { "id": 1, "title": "Live", "is_active": true },
                { "id": 2, "title": "Done", "is_active": false }
            ],
            "statistics": { "created": 2, "invited": 0, "total": 2 }
        }),
    );

    let mine = api::my_meetings(
        &fixture.signed_in(),
        &MyMeetingsFilters {
            scope: Some(MyMeetingsScope::Created),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(mine.statistics.created, 2);
    let (upcoming, previous) = crate::views::split_meetings(mine.data);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(previous.len(), 1);
    assert_eq!(
        fixture.last("GET", "/meetings/user").query.as_deref(),
        Some("filter=created")
    );
}

#[tokio::test]
async fn test_hard_delete_sends_confirmation() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "DELETE",
        "/meetings/abc/hard-delete",
        200,
        json!({ "success": true, "message": "Meeting permanently deleted", "meeting_id": "abc" }),
    );

    let deletion = api::hard_delete_meeting(&fixture.signed_in(), "abc")
        .await
        .unwrap();
    assert_eq!(deletion.message, "Meeting permanently deleted");
    assert_eq!(
        fixture.last("DELETE", "/meetings/abc/hard-delete").json(),
        json!({ "confirm": true })
    );
}

// Manager

#[tokio::test]
async fn test_become_manager_updates_role() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/becamemanager",
        200,
        json!({ "success": true, "message": "You are now a manager", "new_role": "MANAGER", "user_email": "john@example.com" }),
    );

    let gateway = fixture.signed_in();
    let response = api::become_manager(&gateway, "CODE-1").await.unwrap();

    assert_eq!(response.message, "You are now a manager");
    assert_eq!(gateway.session().get(keys::USER_ROLE).as_deref(), Some("MANAGER"));
    assert_eq!(gateway.session().token().as_deref(), Some("tok"));
    assert_eq!(fixture.last("POST", "/becamemanager").json(), json!({ "code": "CODE-1" }));
}

#[tokio::test]
async fn test_manager_code_error_uses_fallback_chain() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/getCodeForManager", 403, json!({ "message": "Only managers can generate codes" }));

    let err = api::generate_manager_code(&fixture.signed_in())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert_eq!(err.message(), "Only managers can generate codes");
}

// Team

#[tokio::test]
async fn test_teammates_defaults() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/teammates", 200, json!({}));

    let teammates = api::teammates_for_display(&fixture.signed_in(), true, true)
        .await
        .unwrap();
    assert!(teammates.teammates.is_empty());
    assert!(teammates.manager.is_none());
    assert_eq!(teammates.teammates_count, 0);

    let query = fixture.last("GET", "/teammates").query.unwrap_or_default();
    assert!(query.contains("include_details=true"));
    assert!(query.contains("include_manager=true"));
}

// Files

#[tokio::test]
async fn test_upload_file_multipart() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "POST",
        "/files/upload",
        200,
        json!({ "success": true, "filename": "notes.txt" }),
    );

    let gateway = fixture.signed_in();
    let file = api::upload_file(&gateway, "notes.txt", b"hello world".to_vec())
        .await
        .unwrap();

    assert_eq!(file.filename, "notes.txt");
    assert_eq!(file.size, Some(11));
    assert_eq!(file.uploaded_by, "john@example.com");

    let request = fixture.last("POST", "/files/upload");
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
    assert!(request
        .content_type
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("hello world"));
}

#[tokio::test]
async fn test_list_files_requires_success_flag() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/files", 200, json!({ "success": true, "files": ["a.pdf", "b c.txt"] }));

    let gateway = fixture.signed_in();
    let files = api::list_files(&gateway).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].uploaded_by, "unknown");
    assert!(files[0].size.is_none());
    assert_eq!(
        files[1].url.as_deref(),
        Some(format!("{}/files/b%20c.txt", fixture.base_url).as_str())
    );

    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/files", 200, json!({ "success": false, "message": "Storage unavailable" }));
    let err = api::list_files(&fixture.signed_in()).await.unwrap_err();
    assert_eq!(err.message(), "Storage unavailable");
}

#[tokio::test]
async fn test_download_file_bytes() {
    let fixture = TestFixture::new().await;
    fixture.respond_raw("GET", "/files/report%20v1.pdf", 200, vec![0x25, 0x50, 0x44, 0x46]);
    fixture.respond("GET", "/files/missing.pdf", 404, json!({ "error": "File not found" }));

    let gateway = fixture.signed_in();
    let bytes = api::download_file(&gateway, "report v1.pdf").await.unwrap();
    assert_eq!(bytes, b"%PDF");
    assert_eq!(
        fixture.last("GET", "/files/report%20v1.pdf").authorization.as_deref(),
        Some("Bearer tok")
    );

    let err = api::download_file(&gateway, "missing.pdf").await.unwrap_err();
    assert_eq!(err, ClientError::NotFound("File not found".to_string()));
}

// Views

#[tokio::test]
async fn test_list_view_load_and_retry() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/meetings/my/upcoming", 500, json!({}));
    fixture.respond(
        "GET",
        "/meetings/my/upcoming",
        200,
        json!({ "success": true, "email": "john@example.com", "upcoming_meetings": [], "total_count": 0 }),
    );

    let gateway = fixture.signed_in();
    let view = ListView::new();

    assert!(view.load(api::my_upcoming_meetings(&gateway)).await);
    assert_eq!(
        view.state(),
        ViewState::Failed("Failed to fetch upcoming meetings: 500".to_string())
    );

    assert!(view.load(api::my_upcoming_meetings(&gateway)).await);
    assert_eq!(view.data().map(|u| u.total_count), Some(0));
}

// Envelopes

#[tokio::test]
async fn test_lists_tolerate_null_fields() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/meetings",
        200,
        json!({ "data": [
            { "id": 1, "title": "Standup", "created_at": "2025-01-01" },
            { "id": 2, "title": "Retro", "invitation_link": null, "created_by": null }
        ]}),
    );
    fixture.respond(
        "GET",
        "/activities",
        200,
        json!({ "data": [{ "id": 1, "title": "Hike", "creator": null }], "count": 1 }),
    );

    let gateway = fixture.signed_in();
    let meetings = api::list_meetings(&gateway, &MeetingFilters::default())
        .await
        .unwrap();
    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[1].invitation_link, "");

    let page = api::list_activities(&gateway, &ActivityFilters::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.activities[0].creator, "");
}

#[tokio::test]
async fn test_get_and_update_activity_read_activity_field() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/activities/5",
        200,
        json!({ "activity": { "id": 5, "title": "Quiz", "type": "activity_quiz" } }),
    );
    fixture.respond(
        "PUT",
        "/activities/5",
        200,
        json!({ "activity": { "id": 5, "title": "Pub Quiz", "type": "activity_quiz" } }),
    );
    fixture.respond("GET", "/activities/6", 200, json!({ "id": 6, "title": "Bare" }));

    let gateway = fixture.signed_in();
    let activity = api::get_activity(&gateway, 5).await.unwrap();
    assert_eq!(activity.title, "Quiz");
    assert_eq!(
        fixture.last("GET", "/activities/5").authorization.as_deref(),
        Some("Bearer tok")
    );

    let updated = api::update_activity(
        &gateway,
        5,
        &ActivityChanges {
            title: Some("Pub Quiz".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.title, "Pub Quiz");
    assert_eq!(
        fixture.last("PUT", "/activities/5").json(),
        json!({ "title": "Pub Quiz" })
    );

    // The single-activity endpoint always wraps its payload.
    let err = api::get_activity(&gateway, 6).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_delete_activity_and_participants() {
    let fixture = TestFixture::new().await;
    fixture.respond("DELETE", "/activities/5", 200, json!({ "message": "Deleted" }));
    fixture.respond(
        "GET",
        "/activities/5/participants",
        200,
        json!({ "participants": [{ "email": "a@example.com" }, { "email": "b@example.com" }] }),
    );
    fixture.respond("GET", "/activities/6/participants", 200, json!({}));

    let gateway = fixture.signed_in();
    api::delete_activity(&gateway, 5).await.unwrap();
    assert_eq!(
        fixture.last("DELETE", "/activities/5").authorization.as_deref(),
        Some("Bearer tok")
    );

    let participants = api::list_participants(&gateway, 5).await.unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[1]["email"], "b@example.com");
    assert!(api::list_participants(&gateway, 6).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_and_update_meeting_read_meeting_field() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/meetings/abc",
        200,
        json!({ "meeting": { "id": 3, "meeting_id": "abc", "title": "Standup" } }),
    );
    fixture.respond(
        "PUT",
        "/meetings/abc",
        200,
        json!({ "meeting": { "id": 3, "meeting_id": "abc", "title": "Standup", "description": "Daily" } }),
    );

    let gateway = fixture.signed_in();
    let meeting = api::get_meeting(&gateway, "abc").await.unwrap();
    assert_eq!(meeting.title, "Standup");

    let updated = api::update_meeting(
        &gateway,
        "abc",
        &MeetingChanges {
            description: Some("Daily".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Daily"));

    let request = fixture.last("PUT", "/meetings/abc");
    assert_eq!(request.json(), json!({ "description": "Daily" }));
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn test_list_meetings_query_and_default() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/meetings", 200, json!({ "success": true }));

    let meetings = api::list_meetings(
        &fixture.signed_in(),
        &MeetingFilters {
            user_email: Some("john@example.com".to_string()),
            is_active: Some(true),
        },
    )
    .await
    .unwrap();

    assert!(meetings.is_empty());
    let query = fixture.last("GET", "/meetings").query.unwrap_or_default();
    assert!(query.contains("user_email=john%40example.com"));
    assert!(query.contains("is_active=true"));
}

#[tokio::test]
async fn test_delete_meeting_bare_envelope() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "DELETE",
        "/meetings/abc/delete",
        200,
        json!({ "success": true, "message": "Meeting deleted", "meeting_id": 12 }),
    );

    let deletion = api::delete_meeting(&fixture.signed_in(), "abc").await.unwrap();
    assert!(deletion.success);
    assert_eq!(deletion.message, "Meeting deleted");
    assert_eq!(deletion.meeting_id, "12");
    assert_eq!(
        fixture.last("DELETE", "/meetings/abc/delete").authorization.as_deref(),
        Some("Bearer tok")
    );
}

#[tokio::test]
async fn test_meeting_lifecycle_and_logs() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/meetings/abc/start", 200, json!({ "success": true }));
    fixture.respond("POST", "/meetings/abc/end", 200, json!({ "success": true }));
    fixture.respond("POST", "/meetings/abc/log", 201, json!({ "success": true }));
    fixture.respond(
        "GET",
        "/meetings/abc/log",
        200,
        json!({ "logs": [{ "action": "joined", "user_email": "john@example.com" }] }),
    );

    let gateway = fixture.signed_in();
    api::start_meeting(&gateway, "abc").await.unwrap();
    api::end_meeting(&gateway, "abc").await.unwrap();
    api::add_meeting_log(
        &gateway,
        "abc",
        &MeetingLogEntry {
            action: "joined".to_string(),
            user_email: "john@example.com".to_string(),
            details: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        fixture.last("POST", "/meetings/abc/start").authorization.as_deref(),
        Some("Bearer tok")
    );
    assert!(fixture.last("POST", "/meetings/abc/end").body.is_empty());
    assert_eq!(
        fixture.last("POST", "/meetings/abc/log").json(),
        json!({ "action": "joined", "user_email": "john@example.com" })
    );

    let logs = api::meeting_logs(&gateway, "abc", false).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "joined");
    assert!(fixture.last("GET", "/meetings/abc/log").query.is_none());

    api::meeting_logs(&gateway, "abc", true).await.unwrap();
    assert_eq!(
        fixture.last("GET", "/meetings/abc/log").query.as_deref(),
        Some("download=true")
    );
}

#[tokio::test]
async fn test_legacy_join_is_unauthenticated() {
    let fixture = TestFixture::new().await;
    fixture.respond("POST", "/join-meet", 200, json!({ "redirectUrl": "https://x/legacy" }));

    let url = api::join_meeting(&fixture.signed_in(), "abc", "john@example.com")
        .await
        .unwrap();
    assert_eq!(url, "https://x/legacy");

    let request = fixture.last("POST", "/join-meet");
    assert!(request.authorization.is_none());
    assert_eq!(
        request.json(),
        json!({ "meeting_id": "abc", "user_email": "john@example.com" })
    );
}

#[tokio::test]
async fn test_my_employees_defaults_and_query() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/my-employees", 200, json!({ "manager": null }));

    let employees = api::my_employees(&fixture.signed_in(), false).await.unwrap();
    assert!(employees.employees.is_empty());
    assert!(employees.manager.is_none());
    assert_eq!(employees.employees_count, 0);

    let request = fixture.last("GET", "/my-employees");
    assert_eq!(request.query.as_deref(), Some("include_details=false"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn test_user_identity() {
    let fixture = TestFixture::new().await;
    fixture.respond(
        "GET",
        "/user/identity",
        200,
        json!({ "user_id": 42, "email": "john@example.com" }),
    );

    let identity = api::user_identity(&fixture.signed_in()).await.unwrap();
    assert_eq!(identity.user_id, "42");
    assert_eq!(identity.email, "john@example.com");
    assert_eq!(
        fixture.last("GET", "/user/identity").authorization.as_deref(),
        Some("Bearer tok")
    );
}

#[tokio::test]
async fn test_become_manager_code_is_unauthenticated() {
    let fixture = TestFixture::new().await;
    fixture.respond("GET", "/generateBecameManagerCode", 200, json!({ "code": "MGR-7" }));

    let code = api::generate_become_manager_code(&fixture.signed_in())
        .await
        .unwrap();
    assert_eq!(code, "MGR-7");
    assert!(fixture
        .last("GET", "/generateBecameManagerCode")
        .authorization
        .is_none());
}
