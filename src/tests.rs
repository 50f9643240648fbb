//! Integration tests for the rollcall backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::roll::RollSession;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            api_psk: psk.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = AppState {
            repo,
            roll: Arc::new(RollSession::new()),
            config: Arc::new(config),
        };

        let app = create_router(state);

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

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_student(&self, first_name: &str, last_name: &str) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/students"))
            .json(&json!({
                "first_name": first_name,
                "last_name": last_name
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_group(&self, name: &str) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/groups"))
            .json(&json!({
                "name": name,
                "number_of_weeks": 4,
                "roll_states": "absent",
                "incidents": 3,
                "ltmt": ">"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Client without the API key header
    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/groups"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/groups"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_valid_psk() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/groups"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_auth_disabled_without_psk() {
    let fixture = TestFixture::with_psk(None).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/groups"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_group_crud() {
    let fixture = TestFixture::new().await;

    // Create group
    let create_resp = fixture
        .client
        .post(fixture.url("/api/groups"))
        .json(&json!({
            "name": "Frequent absentees",
            "number_of_weeks": 6,
            "roll_states": "absent",
            "incidents": 3,
            "ltmt": ">",
            "student_count": 0
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    assert_eq!(create_body["success"], true);
    let group_id = create_body["data"]["id"].as_i64().unwrap();
    assert_eq!(create_body["data"]["name"], "Frequent absentees");
    assert_eq!(create_body["data"]["roll_states"], "absent");
    assert_eq!(create_body["data"]["ltmt"], ">");
    let revision_after_create = create_body["revisionId"].as_i64().unwrap();

    // Get group
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/groups/{}", group_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(get_resp.status(), 200);
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["number_of_weeks"], 6);
    assert_eq!(get_body["data"]["incidents"], 3);

    // Update group
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/groups/{}", group_id)))
        .json(&json!({
            "name": "Late arrivals",
            "roll_states": "late",
            "ltmt": "<"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["name"], "Late arrivals");
    assert_eq!(update_body["data"]["roll_states"], "late");
    assert_eq!(update_body["data"]["ltmt"], "<");
    // Untouched fields keep their values
    assert_eq!(update_body["data"]["number_of_weeks"], 6);
    let revision_after_update = update_body["revisionId"].as_i64().unwrap();
    assert!(revision_after_update > revision_after_create);

    // List groups
    let list_resp = fixture
        .client
        .get(fixture.url("/api/groups"))
        .send()
        .await
        .unwrap();

    assert_eq!(list_resp.status(), 200);
    let list_body: Value = list_resp.json().await.unwrap();
    assert!(list_body["data"].as_array().unwrap().len() >= 1);

    // Delete group
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/groups/{}", group_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(delete_resp.status(), 200);

    // Verify deleted
    let get_deleted_resp = fixture
        .client
        .get(fixture.url(&format!("/api/groups/{}", group_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(get_deleted_resp.status(), 404);
}

#[tokio::test]
async fn test_group_rejects_invalid_enum_values() {
    let fixture = TestFixture::new().await;

    // Out-of-enum roll_states
    let resp = fixture
        .client
        .post(fixture.url("/api/groups"))
        .json(&json!({
            "name": "Bogus states",
            "number_of_weeks": 4,
            "roll_states": "bogus",
            "incidents": 1,
            "ltmt": ">"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Out-of-enum ltmt
    let resp2 = fixture
        .client
        .post(fixture.url("/api/groups"))
        .json(&json!({
            "name": "Bogus operator",
            "number_of_weeks": 4,
            "roll_states": "present",
            "incidents": 1,
            "ltmt": "="
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 400);

    // Update path rejects them too
    let group_id = fixture.create_group("Valid group").await;
    let resp3 = fixture
        .client
        .put(fixture.url(&format!("/api/groups/{}", group_id)))
        .json(&json!({ "roll_states": "kinda-here" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp3.status(), 400);
    let body3: Value = resp3.json().await.unwrap();
    assert_eq!(body3["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_student_crud() {
    let fixture = TestFixture::new().await;

    // Create student
    let create_resp = fixture
        .client
        .post(fixture.url("/api/students"))
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "photo_url": "https://example.com/ada.png"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    let student_id = create_body["data"]["id"].as_i64().unwrap();
    assert_eq!(create_body["data"]["first_name"], "Ada");
    assert_eq!(create_body["data"]["photo_url"], "https://example.com/ada.png");

    // Get student
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/students/{}", student_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(get_resp.status(), 200);
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["last_name"], "Lovelace");

    // Update student
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/students/{}", student_id)))
        .json(&json!({ "last_name": "King" }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["first_name"], "Ada");
    assert_eq!(update_body["data"]["last_name"], "King");

    // List students
    let list_resp = fixture
        .client
        .get(fixture.url("/api/students"))
        .send()
        .await
        .unwrap();

    assert_eq!(list_resp.status(), 200);
    let list_body: Value = list_resp.json().await.unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 1);

    // Delete student
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/students/{}", student_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(delete_resp.status(), 200);

    let get_deleted_resp = fixture
        .client
        .get(fixture.url(&format!("/api/students/{}", student_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(get_deleted_resp.status(), 404);
}

#[tokio::test]
async fn test_group_student_membership() {
    let fixture = TestFixture::new().await;

    let group_id = fixture.create_group("Reading group").await;
    let alice = fixture.create_student("Alice", "Zimmer").await;
    let bob = fixture.create_student("Bob", "Young").await;

    // Add a single membership
    let add_resp = fixture
        .client
        .post(fixture.url("/api/group-students"))
        .json(&json!({
            "group_id": group_id,
            "student_id": alice,
            "incident_count": 2
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(add_resp.status(), 200);
    let add_body: Value = add_resp.json().await.unwrap();
    let membership_id = add_body["data"]["id"].as_i64().unwrap();
    assert_eq!(add_body["data"]["group_id"], group_id);
    assert_eq!(add_body["data"]["incident_count"], 2);

    // Batch add
    let batch_resp = fixture
        .client
        .post(fixture.url("/api/group-students/batch"))
        .json(&json!({
            "members": [
                { "group_id": group_id, "student_id": bob, "incident_count": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(batch_resp.status(), 200);
    let batch_body: Value = batch_resp.json().await.unwrap();
    assert_eq!(batch_body["data"].as_array().unwrap().len(), 1);

    // List members with computed full names
    let members_resp = fixture
        .client
        .get(fixture.url(&format!("/api/groups/{}/students", group_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(members_resp.status(), 200);
    let members_body: Value = members_resp.json().await.unwrap();
    let members = members_body["data"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["full_name"], "Alice Zimmer");
    assert_eq!(members[1]["full_name"], "Bob Young");

    // Remove a membership
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/group-students/{}", membership_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(delete_resp.status(), 200);

    let members_after: Value = fixture
        .client
        .get(fixture.url(&format!("/api/groups/{}/students", group_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(members_after["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_membership_requires_existing_referents() {
    let fixture = TestFixture::new().await;

    let group_id = fixture.create_group("Orphans").await;

    // Unknown student
    let resp = fixture
        .client
        .post(fixture.url("/api/group-students"))
        .json(&json!({
            "group_id": group_id,
            "student_id": 9999
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Unknown group
    let student_id = fixture.create_student("Real", "Student").await;
    let resp2 = fixture
        .client
        .post(fixture.url("/api/group-students"))
        .json(&json!({
            "group_id": 9999,
            "student_id": student_id
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 404);

    // Empty batch is rejected
    let resp3 = fixture
        .client
        .post(fixture.url("/api/group-students/batch"))
        .json(&json!({ "members": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp3.status(), 400);
}

#[tokio::test]
async fn test_group_delete_cascades_memberships() {
    let fixture = TestFixture::new().await;

    let group_id = fixture.create_group("Doomed group").await;
    let student_id = fixture.create_student("Carol", "Xu").await;

    let add_body: Value = fixture
        .client
        .post(fixture.url("/api/group-students"))
        .json(&json!({ "group_id": group_id, "student_id": student_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let membership_id = add_body["data"]["id"].as_i64().unwrap();

    // Delete the group
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/groups/{}", group_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);

    // The membership is gone too
    let membership_delete = fixture
        .client
        .delete(fixture.url(&format!("/api/group-students/{}", membership_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(membership_delete.status(), 404);

    // The student is untouched
    let student_resp = fixture
        .client
        .get(fixture.url(&format!("/api/students/{}", student_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(student_resp.status(), 200);
}

#[tokio::test]
async fn test_homeboard_defaults_to_unmarked_students() {
    let fixture = TestFixture::new().await;

    fixture.create_student("Alice", "Zimmer").await;
    fixture.create_student("Bob", "Young").await;

    let resp = fixture
        .client
        .get(fixture.url("/api/homeboard/students"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let students = body["data"]["students"].as_array().unwrap();
    assert_eq!(students.len(), 2);
    for student in students {
        assert_eq!(student["type"], "unmark");
    }
}

#[tokio::test]
async fn test_homeboard_search_and_sort() {
    let fixture = TestFixture::new().await;

    fixture.create_student("Alice", "Zimmer").await;
    fixture.create_student("Bob", "Young").await;
    fixture.create_student("Carol", "Xu").await;

    // Case-insensitive substring search over full names
    let search_body: Value = fixture
        .client
        .get(fixture.url("/api/homeboard/students?search=bob%20y"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let found = search_body["data"]["students"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["first_name"], "Bob");

    // Sort by last name descending
    let sort_body: Value = fixture
        .client
        .get(fixture.url("/api/homeboard/students?sort_by=last_name&order=desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sorted = sort_body["data"]["students"].as_array().unwrap();
    assert_eq!(sorted[0]["last_name"], "Zimmer");
    assert_eq!(sorted[2]["last_name"], "Xu");

    // Unknown sort key is rejected
    let bad_resp = fixture
        .client
        .get(fixture.url("/api/homeboard/students?sort_by=shoe_size"))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_resp.status(), 400);
}

#[tokio::test]
async fn test_roll_lifecycle() {
    let fixture = TestFixture::new().await;

    let alice = fixture.create_student("Alice", "Zimmer").await;
    let bob = fixture.create_student("Bob", "Young").await;
    fixture.create_student("Carol", "Xu").await;

    // Marking before a roll starts is rejected
    let early_resp = fixture
        .client
        .post(fixture.url("/api/roll/mark"))
        .json(&json!({ "student_id": alice, "state": "present" }))
        .send()
        .await
        .unwrap();
    assert_eq!(early_resp.status(), 400);

    // Start a roll
    let start_resp = fixture
        .client
        .post(fixture.url("/api/roll/start"))
        .send()
        .await
        .unwrap();
    assert_eq!(start_resp.status(), 200);
    let start_body: Value = start_resp.json().await.unwrap();
    assert!(start_body["data"]["id"].is_string());

    // Invalid state is rejected
    let bad_mark = fixture
        .client
        .post(fixture.url("/api/roll/mark"))
        .json(&json!({ "student_id": alice, "state": "asleep" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_mark.status(), 400);

    // Unknown student is rejected
    let unknown_mark = fixture
        .client
        .post(fixture.url("/api/roll/mark"))
        .json(&json!({ "student_id": 9999, "state": "present" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_mark.status(), 404);

    // Mark two students
    for (student_id, state) in [(alice, "present"), (bob, "late")] {
        let mark_resp = fixture
            .client
            .post(fixture.url("/api/roll/mark"))
            .json(&json!({ "student_id": student_id, "state": state }))
            .send()
            .await
            .unwrap();
        assert_eq!(mark_resp.status(), 200);
    }

    // Summary counts match the marks
    let summary_body: Value = fixture
        .client
        .get(fixture.url("/api/roll/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary_body["data"]["all"], 3);
    assert_eq!(summary_body["data"]["present"], 1);
    assert_eq!(summary_body["data"]["late"], 1);
    assert_eq!(summary_body["data"]["absent"], 0);

    // Homeboard merges the transient marks
    let board_body: Value = fixture
        .client
        .get(fixture.url("/api/homeboard/students?roll_state=present"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let present = board_body["data"]["students"].as_array().unwrap();
    assert_eq!(present.len(), 1);
    assert_eq!(present[0]["first_name"], "Alice");
    assert_eq!(present[0]["type"], "present");

    // Complete the roll
    let complete_body: Value = fixture
        .client
        .post(fixture.url("/api/roll/complete"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(complete_body["data"]["present"], 1);
    assert_eq!(complete_body["data"]["late"], 1);

    // The session is gone and marks are cleared
    let summary_after = fixture
        .client
        .get(fixture.url("/api/roll/summary"))
        .send()
        .await
        .unwrap();
    assert_eq!(summary_after.status(), 400);

    let board_after: Value = fixture
        .client
        .get(fixture.url("/api/homeboard/students"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for student in board_after["data"]["students"].as_array().unwrap() {
        assert_eq!(student["type"], "unmark");
    }
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    // Create student with empty first name
    let resp = fixture
        .client
        .post(fixture.url("/api/students"))
        .json(&json!({
            "first_name": "",
            "last_name": "Nameless"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Create group with empty name
    let resp2 = fixture
        .client
        .post(fixture.url("/api/groups"))
        .json(&json!({
            "name": "   ",
            "number_of_weeks": 4,
            "roll_states": "present",
            "incidents": 1,
            "ltmt": "<"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 400);
}

#[tokio::test]
async fn test_update_rejects_empty_names() {
    let fixture = TestFixture::new().await;

    let student_id = fixture.create_student("Ada", "Lovelace").await;

    // Blank first name on update
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/students/{}", student_id)))
        .json(&json!({ "first_name": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Blank last name on update
    let resp2 = fixture
        .client
        .put(fixture.url(&format!("/api/students/{}", student_id)))
        .json(&json!({ "last_name": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 400);

    // The stored names are untouched
    let get_body: Value = fixture
        .client
        .get(fixture.url(&format!("/api/students/{}", student_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get_body["data"]["first_name"], "Ada");
    assert_eq!(get_body["data"]["last_name"], "Lovelace");
}

#[tokio::test]
async fn test_revision_increments_on_writes() {
    let fixture = TestFixture::new().await;

    // Initial revision from a read
    let initial_body: Value = fixture
        .client
        .get(fixture.url("/api/groups"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let initial_revision = initial_body["revisionId"].as_i64().unwrap();

    // Create student
    let create_body: Value = fixture
        .client
        .post(fixture.url("/api/students"))
        .json(&json!({ "first_name": "Rev", "last_name": "Counter" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after_create = create_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_create, initial_revision + 1);

    let student_id = create_body["data"]["id"].as_i64().unwrap();

    // Update student
    let update_body: Value = fixture
        .client
        .put(fixture.url(&format!("/api/students/{}", student_id)))
        .json(&json!({ "last_name": "Bumped" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after_update = update_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_update, initial_revision + 2);

    // Delete student
    let delete_body: Value = fixture
        .client
        .delete(fixture.url(&format!("/api/students/{}", student_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after_delete = delete_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_delete, initial_revision + 3);
}

#[tokio::test]
async fn test_batch_add_increments_revision_once() {
    let fixture = TestFixture::new().await;

    let group_id = fixture.create_group("Batch group").await;
    let alice = fixture.create_student("Alice", "Zimmer").await;
    let bob = fixture.create_student("Bob", "Young").await;

    let before_body: Value = fixture
        .client
        .get(fixture.url("/api/groups"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let before = before_body["revisionId"].as_i64().unwrap();

    let batch_body: Value = fixture
        .client
        .post(fixture.url("/api/group-students/batch"))
        .json(&json!({
            "members": [
                { "group_id": group_id, "student_id": alice },
                { "group_id": group_id, "student_id": bob }
            ]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after = batch_body["revisionId"].as_i64().unwrap();

    // Batch should increment revision only once
    assert_eq!(after, before + 1);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    // Get non-existent group
    let resp = fixture
        .client
        .get(fixture.url("/api/groups/9999"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Get non-existent student
    let resp2 = fixture
        .client
        .get(fixture.url("/api/students/9999"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 404);

    // List members of a non-existent group
    let resp3 = fixture
        .client
        .get(fixture.url("/api/groups/9999/students"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp3.status(), 404);
}
