//! Integration tests for the advising client against an in-process mock backend.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, RawQuery, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower_http::trace::TraceLayer;

use crate::api::{ApiClient, API_KEY_HEADER};
use crate::auth::UserPrivileges;
use crate::config::Config;
use crate::errors::ClientError;
use crate::filters::{keys, FilterRegistry, OptionLoader, StepOutcome};
use crate::models::{
    CreatedNotes, CuratedGroup, GroupPage, NewAttachment, NoteDraft, NoteId, NoteUpdate,
};
use crate::session::{Session, SessionEvent};

// ==================== MOCK BACKEND ====================

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    query: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Clone)]
struct FormField {
    name: String,
    file_name: Option<String>,
    value: String,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    forms: Arc<Mutex<Vec<Vec<FormField>>>>,
}

impl MockState {
    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn last_body(&self) -> Value {
        self.bodies.lock().unwrap().last().cloned().unwrap_or(Value::Null)
    }

    fn last_form(&self) -> Vec<FormField> {
        self.forms.lock().unwrap().last().cloned().unwrap_or_default()
    }

    fn hit(&self, method: &str, path: &str) -> bool {
        self.requests()
            .iter()
            .any(|r| r.method == method && r.path == path)
    }
}

type MockResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

async fn record_request(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        api_key: request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    next.run(request).await
}

async fn read_form(mut multipart: Multipart) -> Vec<FormField> {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        fields.push(FormField {
            name,
            file_name,
            value: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    fields
}

fn form_text<'a>(fields: &'a [FormField], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.value.as_str())
}

fn note_from_form(id: Value, fields: &[FormField]) -> Value {
    let topics: Vec<&str> = form_text(fields, "topics")
        .unwrap_or_default()
        .split(',')
        .filter(|t| !t.is_empty())
        .collect();
    let attachments: Vec<Value> = fields
        .iter()
        .filter_map(|f| f.file_name.as_ref())
        .enumerate()
        .map(|(i, name)| json!({ "id": i + 1, "displayName": name }))
        .collect();
    json!({
        "id": id,
        "subject": form_text(fields, "subject"),
        "body": form_text(fields, "body"),
        "contactType": form_text(fields, "contactType"),
        "setDate": form_text(fields, "setDate"),
        "isPrivate": form_text(fields, "isPrivate") == Some("true"),
        "topics": topics,
        "attachments": attachments,
        "updatedAt": null,
        "read": true,
    })
}

fn note_json(id: &str) -> Value {
    let id = id
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(id));
    json!({
        "id": id,
        "subject": "Vicar in a Tutu",
        "body": "A scanty bit of a thing",
        "topics": [],
    })
}

async fn add_students(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.bodies.lock().unwrap().push(body.clone());
    Json(json!({ "id": body["curatedGroupId"], "name": "Swimmers", "sids": ["1", "2"] }))
}

async fn create_group(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.bodies.lock().unwrap().push(body.clone());
    Json(json!({ "id": 7, "name": body["name"], "sids": body["sids"], "ownerId": 1 }))
}

async fn delete_group(Path(id): Path<String>) -> MockResult {
    if id == "404" {
        return Err(fail(StatusCode::NOT_FOUND, "No curated group found with id: 404"));
    }
    Ok(Json(json!({ "message": format!("Curated group {} deleted", id) })))
}

async fn rename_group(State(state): State<MockState>, Json(body): Json<Value>) -> MockResult {
    state.bodies.lock().unwrap().push(body.clone());
    if body["name"].as_str().unwrap_or_default().is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "Requested name is empty"));
    }
    Ok(Json(json!({ "id": body["id"], "name": body["name"], "ownerId": 1 })))
}

async fn remove_student(Path((id, _sid)): Path<(i64, String)>) -> Json<Value> {
    Json(json!({ "id": id, "name": "Swimmers", "sids": ["1", "2", "3"] }))
}

async fn get_group(Path(id): Path<i64>, RawQuery(query): RawQuery) -> MockResult {
    if id == 404 {
        return Err(fail(StatusCode::NOT_FOUND, "Sorry, curated group not found"));
    }
    Ok(Json(json!({
        "id": id,
        "name": "Swimmers",
        "sids": ["1", "2", "3"],
        "totalStudentCount": 3,
        "students": [{ "sid": "1" }],
        "query": query,
    })))
}

async fn all_groups() -> Json<Value> {
    Json(json!([{
        "uid": "1133399",
        "firstName": "Balloon",
        "lastName": "Man",
        "groups": [{ "id": 1, "name": "Swimmers", "totalStudentCount": 1 }],
    }]))
}

async fn students_with_alerts(Path(id): Path<i64>) -> MockResult {
    if id == 500 {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
    }
    Ok(Json(json!([{ "sid": "11667051", "firstName": "Brigitte", "alertCount": 2 }])))
}

async fn download_csv(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.bodies.lock().unwrap().push(body);
    (
        [(header::CONTENT_TYPE, "text/csv")],
        "sid,first_name\n11667051,Brigitte\n",
    )
}

async fn get_note(Path(id): Path<String>) -> MockResult {
    if id == "missing" {
        return Err(fail(StatusCode::NOT_FOUND, "Note not found"));
    }
    Ok(Json(note_json(&id)))
}

async fn mark_read(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "noteId": id, "read": true }))
}

async fn create_note(State(state): State<MockState>, multipart: Multipart) -> Json<Value> {
    let fields = read_form(multipart).await;
    state.forms.lock().unwrap().push(fields.clone());
    let sids = form_text(&fields, "sids").unwrap_or_default();
    let fans_out = ["cohortIds", "curatedGroupIds"]
        .iter()
        .any(|name| !form_text(&fields, name).unwrap_or_default().is_empty());
    if sids.contains(',') || fans_out {
        return Json(json!({ "count": sids.split(',').count(), "sids": sids }));
    }
    Json(note_from_form(json!(101), &fields))
}

async fn update_note(State(state): State<MockState>, multipart: Multipart) -> MockResult {
    let fields = read_form(multipart).await;
    state.forms.lock().unwrap().push(fields.clone());
    match form_text(&fields, "id").and_then(|id| id.parse::<i64>().ok()) {
        Some(id) => Ok(Json(note_from_form(json!(id), &fields))),
        None => Err(fail(StatusCode::BAD_REQUEST, "Note id is required")),
    }
}

async fn delete_note(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "message": format!("Note {} deleted", id) }))
}

async fn add_attachments(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Json<Value> {
    let fields = read_form(multipart).await;
    state.forms.lock().unwrap().push(fields.clone());
    Json(note_from_form(json!(id), &fields))
}

async fn remove_attachment(Path((id, attachment_id)): Path<(i64, i64)>) -> Json<Value> {
    Json(json!({ "id": id, "attachments": [], "removedAttachmentId": attachment_id }))
}

async fn my_profile() -> Json<Value> {
    Json(json!({
        "uid": "1133399",
        "isAdmin": false,
        "departments": [{ "code": "COENG", "name": "College of Engineering" }],
        "myCuratedGroups": [{ "id": 1, "name": "Swimmers", "sids": ["1"] }],
    }))
}

async fn relevant_majors() -> Json<Value> {
    Json(json!(["English", "English-undeclared", "Physics"]))
}

async fn team_groups() -> Json<Value> {
    Json(json!([{ "groupCode": "MFB-DB", "name": "Football, Defensive Backs" }]))
}

async fn dept_profiles(Path(code): Path<String>) -> Json<Value> {
    Json(json!([{ "uid": format!("{}-1", code), "firstName": "Balloon", "lastName": "Man" }]))
}

fn mock_router(state: MockState) -> Router {
    Router::new()
        // Curated groups
        .route("/api/curated_group/students/add", post(add_students))
        .route("/api/curated_group/create", post(create_group))
        .route("/api/curated_group/rename", post(rename_group))
        .route("/api/curated_group/delete/{id}", delete(delete_group))
        .route("/api/curated_group/{id}", get(get_group))
        .route("/api/curated_group/{id}/remove_student/{sid}", delete(remove_student))
        .route("/api/curated_group/{id}/students_with_alerts", get(students_with_alerts))
        .route("/api/curated_group/{id}/download_csv", post(download_csv))
        .route("/api/curated_groups/all", get(all_groups))
        // Notes
        .route("/api/note/{id}", get(get_note))
        .route("/api/notes/create", post(create_note))
        .route("/api/notes/update", post(update_note))
        .route("/api/notes/delete/{id}", delete(delete_note))
        .route("/api/notes/{id}/mark_read", post(mark_read))
        .route("/api/notes/{id}/attachments", post(add_attachments))
        .route("/api/notes/{id}/attachment/{attachment_id}", delete(remove_attachment))
        // Lookups
        .route("/api/profile/my", get(my_profile))
        .route("/api/majors/relevant", get(relevant_majors))
        .route("/api/team_groups/all", get(team_groups))
        .route("/api/users/dept/{code}", get(dept_profiles))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Test fixture for integration tests.
struct TestFixture {
    client: ApiClient,
    state: MockState,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_api_key(None).await
    }

    async fn with_api_key(api_key: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = MockState::default();
        let app = mock_router(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = Config::with_base_url(format!("http://{}", addr));
        config.api_key = api_key;
        config.download_dir = temp_dir.path().join("exports");

        TestFixture {
            client: ApiClient::new(&config).expect("Failed to build client"),
            state,
            temp_dir,
        }
    }
}

fn sids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn session_with(groups: Vec<CuratedGroup>) -> Session {
    let mut session = Session::new("1133399", UserPrivileges::default());
    for group in groups {
        session.on_create(group);
    }
    session
}

// ==================== CURATED GROUPS ====================

#[tokio::test]
async fn test_add_students_merges_sids() {
    let fixture = TestFixture::new().await;

    let group = fixture
        .client
        .add_students(12, &sids(&["2", "3"]), Some(true))
        .await
        .unwrap();

    assert_eq!(group.id, 12);
    assert_eq!(group.sids, sids(&["1", "2", "3"]));

    let body = fixture.state.last_body();
    assert_eq!(body["curatedGroupId"], 12);
    assert_eq!(body["sids"], json!(["2", "3"]));
    assert_eq!(body["returnStudentProfiles"], true);
}

#[tokio::test]
async fn test_create_curated_group_updates_session() {
    let fixture = TestFixture::new().await;
    let mut session = session_with(vec![CuratedGroup::new(1, "Swimmers", sids(&["1"]))]);
    let mut events = session.subscribe();
    let before = session.my_curated_groups().len();

    let group = fixture
        .client
        .create_curated_group(&mut session, "Divers", &sids(&["4", "5"]))
        .await
        .unwrap();

    assert_eq!(group.id, 7);
    assert_eq!(group.sids, sids(&["4", "5"]));
    assert_eq!(session.my_curated_groups().len(), before + 1);
    assert!(session.my_curated_groups().iter().any(|g| g.id == 7));
    assert_eq!(events.recv().await.unwrap(), SessionEvent::MyCuratedGroupsUpdated);
}

#[tokio::test]
async fn test_delete_curated_group() {
    let fixture = TestFixture::new().await;
    let mut session = session_with(vec![
        CuratedGroup::new(7, "Divers", Vec::new()),
        CuratedGroup::new(8, "Swimmers", Vec::new()),
    ]);

    fixture
        .client
        .delete_curated_group(&mut session, 7)
        .await
        .unwrap();
    assert_eq!(session.my_curated_groups().len(), 1);
    assert_eq!(session.my_curated_groups()[0].id, 8);
    assert!(fixture.state.hit("DELETE", "/api/curated_group/delete/7"));

    let err = fixture
        .client
        .delete_curated_group(&mut session, 404)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(session.my_curated_groups().len(), 1);
}

#[tokio::test]
async fn test_rename_curated_group() {
    let fixture = TestFixture::new().await;
    let mut session = session_with(vec![CuratedGroup::new(3, "Old name", sids(&["1", "2"]))]);

    let group = fixture
        .client
        .rename_curated_group(&mut session, 3, "New name")
        .await
        .unwrap();
    assert_eq!(group.name, "New name");
    let cached = &session.my_curated_groups()[0];
    assert_eq!(cached.name, "New name");
    assert_eq!(cached.sids, sids(&["1", "2"]));
    assert_eq!(cached.owner_id, Some(1));

    let err = fixture
        .client
        .rename_curated_group(&mut session, 3, "")
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Requested name is empty");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(session.my_curated_groups()[0].name, "New name");
}

#[tokio::test]
async fn test_remove_from_curated_group() {
    let fixture = TestFixture::new().await;

    let group = fixture
        .client
        .remove_from_curated_group(9, "2")
        .await
        .unwrap();

    assert_eq!(group.sids, sids(&["1", "3"]));
    assert!(fixture
        .state
        .hit("DELETE", "/api/curated_group/9/remove_student/2"));
}

#[tokio::test]
async fn test_get_curated_group_sends_paging() {
    let fixture = TestFixture::new().await;
    let page = GroupPage {
        order_by: "first_name".to_string(),
        term_id: "2248".to_string(),
        offset: 50,
        limit: 25,
    };

    let group = fixture
        .client
        .get_curated_group(5, &page)
        .await
        .unwrap()
        .expect("group exists");

    assert_eq!(group.total_student_count, Some(3));
    assert_eq!(group.students.as_ref().map(Vec::len), Some(1));
    assert_eq!(
        group.extra["query"],
        "orderBy=first_name&termId=2248&offset=50&limit=25"
    );

    let missing = fixture
        .client
        .get_curated_group(404, &GroupPage::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_group_listings() {
    let fixture = TestFixture::new().await;

    let owners = fixture.client.get_users_with_groups().await.unwrap().unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].groups[0].name, "Swimmers");

    let students = fixture
        .client
        .get_students_with_alerts(1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(students[0].sid, "11667051");
    assert_eq!(students[0].alert_count, 2);

    let err = fixture
        .client
        .get_students_with_alerts(500)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_download_curated_group_csv() {
    let fixture = TestFixture::new().await;

    let path = fixture
        .client
        .download_curated_group_csv(5, "Swimmers", &sids(&["sid", "first_name"]))
        .await
        .unwrap();

    assert!(path.starts_with(fixture.temp_dir.path().join("exports")));
    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("Swimmers-students-"));
    assert!(file_name.ends_with(".csv"));

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(contents, "sid,first_name\n11667051,Brigitte\n");
    assert_eq!(
        fixture.state.last_body(),
        json!({ "csvColumnsSelected": ["sid", "first_name"] })
    );
}

#[tokio::test]
async fn test_download_csv_with_separator_in_name() {
    let fixture = TestFixture::new().await;
    let exports = fixture.temp_dir.path().join("exports");

    for name in ["Swimmers/Divers", "../escaped"] {
        let path = fixture
            .client
            .download_curated_group_csv(5, name, &sids(&["sid"]))
            .await
            .unwrap();
        assert_eq!(path.parent(), Some(exports.as_path()));
        assert!(tokio::fs::metadata(&path).await.unwrap().is_file());
    }
}

// ==================== NOTES ====================

#[tokio::test]
async fn test_get_note() {
    let fixture = TestFixture::new().await;

    let note = fixture.client.get_note(&NoteId::Int(3)).await.unwrap().unwrap();
    assert_eq!(note.id, NoteId::Int(3));

    let legacy = fixture
        .client
        .get_note(&NoteId::from("11667051-00001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(legacy.id, NoteId::from("11667051-00001"));

    let missing = fixture.client.get_note(&NoteId::from("missing")).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_note_id_is_one_path_segment() {
    let fixture = TestFixture::new().await;
    let note_id = NoteId::from("eform/10096?x#y");

    let note = fixture.client.get_note(&note_id).await.unwrap().unwrap();

    assert_eq!(note.id, note_id);
    assert!(fixture.state.hit("GET", "/api/note/eform%2F10096%3Fx%23y"));
}

#[tokio::test]
async fn test_mark_note_read() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .mark_note_read(&NoteId::from("eform-10096"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response["read"], true);
    assert!(fixture.state.hit("POST", "/api/notes/eform-10096/mark_read"));
}

#[tokio::test]
async fn test_create_note_with_attachments() {
    let fixture = TestFixture::new().await;
    let draft = NoteDraft {
        attachments: vec![
            NewAttachment::new("attachment_1.txt", b"one".to_vec()),
            NewAttachment::new("attachment_2.txt", b"two".to_vec()).with_content_type("text/plain"),
        ],
        body: "I come correct".to_string(),
        sids: sids(&["9000000000"]),
        subject: "I come with attachments".to_string(),
        template_attachment_ids: vec![4, 5],
        topics: sids(&["Slanted", "Enchanted"]),
        ..Default::default()
    };

    let created = fixture.client.create_notes(draft).await.unwrap();
    let note = match created {
        CreatedNotes::Single(note) => note,
        CreatedNotes::Batch(other) => panic!("expected a single note, got {}", other),
    };
    assert_eq!(note.id, NoteId::Int(101));
    assert_eq!(note.attachments.len(), 2);
    assert_eq!(note.topics, sids(&["Slanted", "Enchanted"]));
    assert!(!note.is_private);

    let form = fixture.state.last_form();
    assert_eq!(form_text(&form, "sids"), Some("9000000000"));
    assert_eq!(form_text(&form, "templateAttachmentIds"), Some("4,5"));
    assert_eq!(form_text(&form, "isPrivate"), Some("false"));
    assert_eq!(form_text(&form, "attachment[0]"), Some("one"));
    assert!(form_text(&form, "contactType").is_none());
    assert!(form_text(&form, "setDate").is_none());
    let file_names: Vec<_> = form.iter().filter_map(|f| f.file_name.clone()).collect();
    assert_eq!(file_names, vec!["attachment_1.txt", "attachment_2.txt"]);
}

#[tokio::test]
async fn test_create_batch_notes() {
    let fixture = TestFixture::new().await;
    let draft = NoteDraft {
        body: "Well you greet the tokens and stamps".to_string(),
        cohort_ids: vec![1],
        contact_type: Some("Admin".to_string()),
        curated_group_ids: vec![2, 3],
        set_date: Some("2022-01-01".to_string()),
        sids: sids(&["9000000000", "11667051"]),
        subject: "Elevate Me Later".to_string(),
        ..Default::default()
    };

    let created = fixture.client.create_notes(draft).await.unwrap();
    match created {
        CreatedNotes::Batch(response) => assert_eq!(response["count"], 2),
        CreatedNotes::Single(note) => panic!("expected a batch, got note {}", note.id),
    }

    let form = fixture.state.last_form();
    assert_eq!(form_text(&form, "cohortIds"), Some("1"));
    assert_eq!(form_text(&form, "curatedGroupIds"), Some("2,3"));
    assert_eq!(form_text(&form, "contactType"), Some("Admin"));
    assert_eq!(form_text(&form, "setDate"), Some("2022-01-01"));
}

#[tokio::test]
async fn test_create_notes_for_curated_group_only() {
    let fixture = TestFixture::new().await;
    let draft = NoteDraft {
        body: "Cut your hair".to_string(),
        curated_group_ids: vec![2],
        subject: "Range Life".to_string(),
        ..Default::default()
    };

    let created = fixture.client.create_notes(draft).await.unwrap();

    match created {
        CreatedNotes::Batch(response) => assert!(response.get("count").is_some()),
        CreatedNotes::Single(note) => panic!("expected a batch, got note {}", note.id),
    }
    let form = fixture.state.last_form();
    assert_eq!(form_text(&form, "curatedGroupIds"), Some("2"));
    assert_eq!(form_text(&form, "sids"), Some(""));
}

#[tokio::test]
async fn test_create_note_without_recipients() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .client
        .create_notes(NoteDraft::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(fixture.state.requests().is_empty());
}

#[tokio::test]
async fn test_update_note() {
    let fixture = TestFixture::new().await;
    let update = NoteUpdate {
        id: NoteId::Int(42),
        body: "Updated body".to_string(),
        contact_type: Some("Phone".to_string()),
        is_private: true,
        set_date: None,
        subject: "Updated subject".to_string(),
        topics: sids(&["Registration"]),
        attachments: Vec::new(),
    };

    let note = fixture.client.update_note(update).await.unwrap();

    assert_eq!(note.id, NoteId::Int(42));
    assert_eq!(note.subject.as_deref(), Some("Updated subject"));
    assert_eq!(note.contact_type.as_deref(), Some("Phone"));
    assert!(note.is_private);
    assert_eq!(form_text(&fixture.state.last_form(), "id"), Some("42"));
}

#[tokio::test]
async fn test_note_attachments_and_delete() {
    let fixture = TestFixture::new().await;
    let note_id = NoteId::Int(42);

    let note = fixture
        .client
        .add_attachments(&note_id, vec![NewAttachment::new("plan.pdf", b"%PDF".to_vec())])
        .await
        .unwrap();
    assert_eq!(note.attachments.len(), 1);
    assert_eq!(note.attachments[0].display_name.as_deref(), Some("plan.pdf"));

    let note = fixture.client.remove_attachment(&note_id, 1).await.unwrap();
    assert!(note.attachments.is_empty());
    assert!(fixture.state.hit("DELETE", "/api/notes/42/attachment/1"));

    let response = fixture.client.delete_note(&note_id).await.unwrap();
    assert_eq!(response["message"], "Note 42 deleted");
}

// ==================== LOOKUPS & OPTIONS ====================

#[tokio::test]
async fn test_api_key_header() {
    let fixture = TestFixture::with_api_key(Some("test-api-key".to_string())).await;

    fixture.client.current_user().await.unwrap();

    let requests = fixture.state.requests();
    assert_eq!(requests[0].api_key.as_deref(), Some("test-api-key"));

    let anonymous = TestFixture::new().await;
    anonymous.client.current_user().await.unwrap();
    assert!(anonymous.state.requests()[0].api_key.is_none());
}

#[tokio::test]
async fn test_load_filter_options_over_http() {
    let fixture = TestFixture::new().await;
    let session = Session::from_current_user(fixture.client.current_user().await.unwrap());
    assert_eq!(session.my_curated_groups().len(), 1);

    let loader = OptionLoader::new(
        Arc::new(fixture.client.clone()),
        Arc::new(session.privileges().clone()),
        "COENG",
    );
    let mut definitions = FilterRegistry::default().definitions();
    let outcomes = loader.run(&mut definitions).await.unwrap();

    assert_eq!(
        outcomes,
        vec![StepOutcome::Ran, StepOutcome::Skipped, StepOutcome::Ran]
    );
    assert!(!fixture.state.hit("GET", "/api/team_groups/all"));
    assert!(fixture.state.hit("GET", "/api/users/dept/COENG"));

    let by_key = |key: &str| {
        definitions
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.options.clone())
            .unwrap()
    };
    let majors: Vec<_> = by_key(keys::MAJORS)
        .into_iter()
        .map(|o| o.map(|o| o.name))
        .collect();
    assert_eq!(
        majors,
        vec![
            Some("Declared".to_string()),
            Some("Undeclared".to_string()),
            None,
            Some("English".to_string()),
            Some("Physics".to_string()),
        ]
    );
    assert!(by_key(keys::GROUP_CODES).is_empty());
    let advisors = by_key(keys::ADVISORS);
    assert_eq!(advisors[0].as_ref().unwrap().value, "COENG-1");
    assert_eq!(advisors[0].as_ref().unwrap().name, "Balloon Man");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let config = Config::with_base_url("http://127.0.0.1:1");
    let client = ApiClient::new(&config).unwrap();

    let err = client.current_user().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}
