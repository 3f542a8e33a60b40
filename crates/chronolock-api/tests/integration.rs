use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use chronolock_api::storage::UploadStore;
use chronolock_api::token::TokenIssuer;
use chronolock_api::{AppState, AppStateInner, build_router};
use chronolock_db::Database;

const BOUNDARY: &str = "chronolock-test-boundary";

struct TestApp {
    _dir: tempfile::TempDir,
    state: AppState,
}

impl TestApp {
    /// Fresh database and upload directory, seeded with two users.
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        db.insert_user("U1", "Alice", "Reyes", "alice@example.com", "alicepw", "student")
            .unwrap();
        db.insert_user("U2", "Bob", "Santos", "bob@example.com", "bobpw", "teacher")
            .unwrap();

        let uploads = UploadStore::new(dir.path().join("uploads")).await.unwrap();
        let state = Arc::new(AppStateInner {
            db,
            uploads,
            tokens: TokenIssuer::new("integration-test-secret".into()),
        });
        Self { _dir: dir, state }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = build_router(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = self.send(request).await;
        (status, parse(&bytes))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, bytes) = self.send(request).await;
        (status, parse(&bytes))
    }

    async fn multipart(
        &self,
        method: &str,
        uri: &str,
        fields: &[(&str, &str)],
        avatar: Option<(&str, &[u8])>,
    ) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, avatar)))
            .unwrap();
        self.send(request).await
    }

    /// Create a group owned by U1 and return its id.
    async fn create_group(&self, name: &str, key: &str) -> i64 {
        let (status, body) = self
            .multipart(
                "POST",
                "/groups/insertGroup",
                &[("userIdNumber", "U1"), ("name", name), ("groupKey", key)],
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        parse(&body)["groupId"].as_i64().unwrap()
    }

    fn avatar_on_disk(&self, public_path: &str) -> bool {
        let name = Path::new(public_path).file_name().unwrap();
        self.state.uploads.dir().join(name).exists()
    }
}

fn parse(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

fn multipart_body(fields: &[(&str, &str)], avatar: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = avatar {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// -- Auth --

#[tokio::test]
async fn login_returns_user_and_session_token() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "alicepw"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["idNumber"], json!("U1"));
    assert_eq!(body["user"]["firstName"], json!("Alice"));
    assert!(body["sessionToken"].as_str().unwrap().contains('.'));
    // The stored password never goes on the wire.
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "wrong"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid email or password."));
}

#[tokio::test]
async fn login_reports_an_unknown_email() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "nobody@example.com", "password": "x"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("User not found. Please register first."));
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json("POST", "/auth/login", json!({"email": "alice@example.com"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Email and password are required."));
}

#[tokio::test]
async fn google_sign_in_probes_existence_only() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json("POST", "/auth/googleSignIn", json!({"email": "bob@example.com"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], json!(true));
    assert_eq!(body["user"]["idNumber"], json!("U2"));
    assert!(body.get("sessionToken").is_none());

    let (status, body) = app
        .json("POST", "/auth/googleSignIn", json!({"email": "nobody@example.com"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], json!(false));
    assert!(body.get("user").is_none());
}

// -- Groups --

#[tokio::test]
async fn creating_a_group_seeds_the_owner_membership() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app
        .get(&format!("/group-members/fetchMembers/?groupId={group_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["idNumber"], json!("U1"));
    assert_eq!(results[0]["firstName"], json!("Alice"));

    let (_, body) = app
        .get(&format!("/group-members/fetchMemberCount/?groupId={group_id}"))
        .await;
    assert_eq!(body["count"], json!(1));
}

#[tokio::test]
async fn a_failed_group_create_writes_nothing() {
    let app = TestApp::new().await;
    let (status, body) = app
        .multipart(
            "POST",
            "/groups/insertGroup",
            &[("userIdNumber", "U1"), ("name", "Team A")],
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["error"], json!("Missing required fields"));

    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    assert_eq!(groups.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn group_listings_split_joined_and_available() {
    let app = TestApp::new().await;
    let mine = app.create_group("Mine", "key-mine").await;

    // U2 owns a second group that U1 has not joined.
    let (status, body) = app
        .multipart(
            "POST",
            "/groups/insertGroup",
            &[("userIdNumber", "U2"), ("name", "Other"), ("groupKey", "key-other")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let other = parse(&body)["groupId"].as_i64().unwrap();

    let (_, filtered) = app.get("/groups/fetchFilteredGroups/U1").await;
    let filtered = filtered.as_array().unwrap().to_vec();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["group_id"].as_i64(), Some(mine));

    let (_, available) = app.get("/groups/fetchAvailableGroups/U1").await;
    let available = available.as_array().unwrap().to_vec();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["group_id"].as_i64(), Some(other));

    let (_, all) = app.get("/groups/fetchAllgroups").await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_a_missing_group_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json("DELETE", "/groups/deleteGroup/999", Value::Null)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Group not found."));
}

#[tokio::test]
async fn deleting_a_group_removes_its_avatar_file() {
    let app = TestApp::new().await;
    let (status, body) = app
        .multipart(
            "POST",
            "/groups/insertGroup",
            &[("userIdNumber", "U1"), ("name", "Team A"), ("groupKey", "abc123")],
            Some(("crest.png", b"png-bytes")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let group_id = parse(&body)["groupId"].as_i64().unwrap();

    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    let avatar = groups[0]["avatar"].as_str().unwrap().to_string();
    assert!(app.avatar_on_disk(&avatar));

    let (status, body) = app
        .json("DELETE", &format!("/groups/deleteGroup/{group_id}"), Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        json!("Group and its avatar deleted successfully.")
    );
    assert!(!app.avatar_on_disk(&avatar));
}

#[tokio::test]
async fn updating_a_group_replaces_the_avatar_on_disk() {
    let app = TestApp::new().await;
    let (_, body) = app
        .multipart(
            "POST",
            "/groups/insertGroup",
            &[("userIdNumber", "U1"), ("name", "Team A"), ("groupKey", "abc123")],
            Some(("old.png", b"old-bytes")),
        )
        .await;
    let group_id = parse(&body)["groupId"].as_i64().unwrap();
    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    let old_avatar = groups[0]["avatar"].as_str().unwrap().to_string();

    let (status, body) = app
        .multipart(
            "PUT",
            &format!("/groups/updateGroup/{group_id}"),
            &[("name", "Team B"), ("groupKey", "def456")],
            Some(("new.png", b"new-bytes")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8_lossy(&body), "Group updated successfully.");

    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    assert_eq!(groups[0]["group_name"], json!("Team B"));
    let new_avatar = groups[0]["avatar"].as_str().unwrap().to_string();
    assert_ne!(new_avatar, old_avatar);
    assert!(app.avatar_on_disk(&new_avatar));
    assert!(!app.avatar_on_disk(&old_avatar));
}

#[tokio::test]
async fn updating_a_group_without_an_avatar_keeps_the_old_one() {
    let app = TestApp::new().await;
    let (_, body) = app
        .multipart(
            "POST",
            "/groups/insertGroup",
            &[("userIdNumber", "U1"), ("name", "Team A"), ("groupKey", "abc123")],
            Some(("crest.png", b"png-bytes")),
        )
        .await;
    let group_id = parse(&body)["groupId"].as_i64().unwrap();
    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    let avatar = groups[0]["avatar"].as_str().unwrap().to_string();

    let (status, _) = app
        .multipart(
            "PUT",
            &format!("/groups/updateGroup/{group_id}"),
            &[("name", "Team B"), ("groupKey", "def456")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    assert_eq!(groups[0]["avatar"].as_str(), Some(avatar.as_str()));
    assert!(app.avatar_on_disk(&avatar));
}

#[tokio::test]
async fn updating_a_missing_group_is_404() {
    let app = TestApp::new().await;
    let (status, body) = app
        .multipart(
            "PUT",
            "/groups/updateGroup/999",
            &[("name", "Team B"), ("groupKey", "def456")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body)["error"], json!("Group not found."));
}

#[tokio::test]
async fn an_uploaded_avatar_is_served_statically() {
    let app = TestApp::new().await;
    app.multipart(
        "POST",
        "/groups/insertGroup",
        &[("userIdNumber", "U1"), ("name", "Team A"), ("groupKey", "abc123")],
        Some(("crest.png", b"png-bytes")),
    )
    .await;

    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    let avatar = groups[0]["avatar"].as_str().unwrap().to_string();

    let request = Request::builder().uri(avatar).body(Body::empty()).unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"png-bytes");
}

// -- Group members --

#[tokio::test]
async fn joining_by_key_rejects_a_second_attempt() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app
        .json(
            "POST",
            "/group-members/insertMemberByGroupKey",
            json!({"userIdNumber": "U2", "groupKey": "abc123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Member added to the group successfully"));

    let (status, body) = app
        .json(
            "POST",
            "/group-members/insertMemberByGroupKey",
            json!({"userIdNumber": "U2", "groupKey": "abc123"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("User is already a member of this group"));

    // The duplicate attempt must not grow the membership.
    let (_, body) = app
        .get(&format!("/group-members/fetchMemberCount/?groupId={group_id}"))
        .await;
    assert_eq!(body["count"], json!(2));
}

#[tokio::test]
async fn joining_with_an_unknown_key_is_400() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json(
            "POST",
            "/group-members/insertMemberByGroupKey",
            json!({"userIdNumber": "U1", "groupKey": "no-such-key"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid group key"));
}

#[tokio::test]
async fn removing_a_member_twice_reports_404() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app
        .json(
            "DELETE",
            "/group-members/deleteMember",
            json!({"groupId": group_id, "memberId": "U1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Member removed successfully."));

    let (status, body) = app
        .json(
            "DELETE",
            "/group-members/deleteMember",
            json!({"groupId": group_id, "memberId": "U1"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Member not found."));
}

// -- Messages --

#[tokio::test]
async fn messages_round_trip_with_sender_details() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app
        .json(
            "POST",
            &format!("/messages/group/{group_id}/newMessage"),
            json!({"userId": "U1", "text": "hello"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messageId"].as_i64().is_some());

    let (status, _) = app
        .json(
            "POST",
            &format!("/messages/group/{group_id}/newSystemMessage"),
            json!({"userId": "U2", "text": "Bob joined"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!("/messages/group/{group_id}/fetchMessages"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let messages = body.as_array().unwrap().to_vec();
    assert_eq!(messages.len(), 2);
    // Newest first: the system message was posted second.
    assert_eq!(messages[0]["text"], json!("Bob joined"));
    assert_eq!(messages[0]["isSystem"], json!(1));
    assert_eq!(messages[0]["firstName"], json!("Bob"));
    assert_eq!(messages[1]["text"], json!("hello"));
    assert_eq!(messages[1]["isSystem"], json!(0));
    assert_eq!(messages[1]["firstName"], json!("Alice"));
}

#[tokio::test]
async fn posting_a_message_requires_sender_and_text() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app
        .json(
            "POST",
            &format!("/messages/group/{group_id}/newMessage"),
            json!({"userId": "U1"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Missing required fields"));
}

#[tokio::test]
async fn mark_seen_flags_only_the_latest_message() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    app.json(
        "POST",
        &format!("/messages/group/{group_id}/newMessage"),
        json!({"userId": "U1", "text": "first"}),
    )
    .await;
    app.json(
        "POST",
        &format!("/messages/group/{group_id}/newMessage"),
        json!({"userId": "U1", "text": "second"}),
    )
    .await;

    let (status, body) = app
        .json(
            "POST",
            &format!("/messages/group/{group_id}/markMessageAsSeen"),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (_, body) = app
        .get(&format!("/messages/group/{group_id}/fetchMessages"))
        .await;
    let messages = body.as_array().unwrap().to_vec();
    assert_eq!(messages[0]["text"], json!("second"));
    assert_eq!(messages[0]["isSeen"], json!(1));
    assert_eq!(messages[1]["isSeen"], json!(0));

    // The flag also shows up on the group summary.
    let (_, groups) = app.get("/groups/fetchAllgroups").await;
    assert_eq!(groups[0]["latest_message"], json!("second"));
    assert_eq!(groups[0]["latest_message_isSeen"], json!(1));
    assert_eq!(groups[0]["sender"], json!("Alice"));
}

#[tokio::test]
async fn mark_seen_on_an_empty_group_still_succeeds() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app
        .json(
            "POST",
            &format!("/messages/group/{group_id}/markMessageAsSeen"),
            Value::Null,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

// -- Users --

#[tokio::test]
async fn change_password_verifies_the_current_one() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            "PUT",
            "/users/changePassword",
            json!({"userId": 1, "currentPassword": "wrong", "newPassword": "next"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Incorrect current password."));

    let (status, body) = app
        .json(
            "PUT",
            "/users/changePassword",
            json!({"userId": 1, "currentPassword": "alicepw", "newPassword": "next"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    // The new password logs in; the old one no longer does.
    let (status, _) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "next"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "alicepw"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_user_preserves_the_password_when_absent() {
    let app = TestApp::new().await;

    let (status, bytes) = app
        .multipart(
            "PUT",
            "/users/updateUser/",
            &[
                ("id", "1"),
                ("firstName", "Alicia"),
                ("lastName", "Reyes"),
                ("email", "alice@example.com"),
            ],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&bytes)["message"], json!("User updated successfully"));

    let (status, body) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "alicepw"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["firstName"], json!("Alicia"));
}

#[tokio::test]
async fn update_user_replaces_the_avatar_file() {
    let app = TestApp::new().await;

    app.multipart(
        "PUT",
        "/users/updateUser/",
        &[
            ("id", "1"),
            ("firstName", "Alice"),
            ("lastName", "Reyes"),
            ("email", "alice@example.com"),
        ],
        Some(("me-old.png", b"old")),
    )
    .await;
    let (_, body) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "alicepw"}),
        )
        .await;
    let old_avatar = body["user"]["avatar"].as_str().unwrap().to_string();
    assert!(app.avatar_on_disk(&old_avatar));

    app.multipart(
        "PUT",
        "/users/updateUser/",
        &[
            ("id", "1"),
            ("firstName", "Alice"),
            ("lastName", "Reyes"),
            ("email", "alice@example.com"),
        ],
        Some(("me-new.png", b"new")),
    )
    .await;
    let (_, body) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "alicepw"}),
        )
        .await;
    let new_avatar = body["user"]["avatar"].as_str().unwrap().to_string();
    assert_ne!(new_avatar, old_avatar);
    assert!(app.avatar_on_disk(&new_avatar));
    assert!(!app.avatar_on_disk(&old_avatar));
}

#[tokio::test]
async fn updating_a_missing_user_is_404() {
    let app = TestApp::new().await;
    let (status, bytes) = app
        .multipart(
            "PUT",
            "/users/updateUser/",
            &[
                ("id", "999"),
                ("firstName", "Ghost"),
                ("lastName", "User"),
                ("email", "ghost@example.com"),
            ],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&bytes)["error"], json!("User not found"));
}

#[tokio::test]
async fn deleting_a_user_removes_their_memberships() {
    let app = TestApp::new().await;
    let group_id = app.create_group("Team A", "abc123").await;

    let (status, body) = app.json("DELETE", "/users/deleteUser/1", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("User deleted successfully"));

    let (_, body) = app
        .get(&format!("/group-members/fetchMemberCount/?groupId={group_id}"))
        .await;
    assert_eq!(body["count"], json!(0));

    let (status, _) = app.json("DELETE", "/users/deleteUser/1", Value::Null).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forgot_password_checks_the_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json("POST", "/users/forgotPassword", json!({"email": "alice@example.com"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Verification successful"));

    let (status, body) = app
        .json("POST", "/users/forgotPassword", json!({"email": "nobody@example.com"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Email not found"));

    let (status, body) = app.json("POST", "/users/forgotPassword", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Email is required."));
}

#[tokio::test]
async fn reset_password_overwrites_by_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            "PUT",
            "/users/resetPassword",
            json!({"email": "alice@example.com", "newPassword": "fresh"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Password reset successfully"));

    let (status, _) = app
        .json(
            "POST",
            "/auth/login",
            json!({"email": "alice@example.com", "password": "fresh"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json(
            "PUT",
            "/users/resetPassword",
            json!({"email": "nobody@example.com", "newPassword": "fresh"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Email not found"));

    let (status, body) = app
        .json("PUT", "/users/resetPassword", json!({"email": "alice@example.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("New password is required"));
}
