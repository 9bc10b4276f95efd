//! Router-level tests for note CRUD, access rules and error envelopes.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{admin, anonymous, user, Caller, TestApp};

#[tokio::test]
async fn test_root_reports_healthy() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/", anonymous(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Healthy" }));
}

#[tokio::test]
async fn test_health_includes_version() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", anonymous(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_note_sets_owner_and_trims_title() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/notes",
            user("u1"),
            Some(json!({ "title": "  Groceries  ", "content": " milk, eggs " })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Groceries");
    assert_eq!(body["content"], " milk, eggs ");
    assert_eq!(body["owner_id"], "u1");
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_create_note_rejects_blank_title() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/notes",
            user("u1"),
            Some(json!({ "title": "   ", "content": "text" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Validation failed");
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "title");
    assert_eq!(body["errors"][0]["message"], "Title must not be blank");
}

#[tokio::test]
async fn test_create_note_reports_every_invalid_field() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/notes",
            user("u1"),
            Some(json!({ "title": "x".repeat(201), "content": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "content"]);
}

#[tokio::test]
async fn test_create_note_accepts_boundary_lengths() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/notes",
            user("u1"),
            Some(json!({ "title": "t".repeat(200), "content": "c".repeat(10_000) })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::POST,
            "/notes",
            user("u1"),
            Some(json!({ "title": "t", "content": "c".repeat(10_001) })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_note_with_missing_field_is_validation_error() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/notes",
            user("u1"),
            Some(json!({ "title": "only title" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn test_get_note_hides_other_users_notes() {
    let app = TestApp::new().await;
    let id = app.create_note(user("u1"), "private", "mine").await;

    let (status, body) = app
        .send(Method::GET, &format!("/notes/{}", id), user("u1"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "private");

    let (status, body) = app
        .send(Method::GET, &format!("/notes/{}", id), user("u2"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Note not found", "code": "HTTP_ERROR" }));

    let (status, _) = app
        .send(Method::GET, &format!("/notes/{}", id), admin("root"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_role_header_is_case_insensitive() {
    let app = TestApp::new().await;
    let id = app.create_note(user("u1"), "t", "c").await;

    let caller = Caller {
        user_id: Some("root"),
        role: Some("ADMIN"),
    };
    let (status, _) = app
        .send(Method::GET, &format!("/notes/{}", id), caller, None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_note_without_owner_is_admin_only() {
    let app = TestApp::new().await;
    let id = app.create_note(anonymous(), "orphan", "no owner").await;

    let (status, _) = app
        .send(Method::GET, &format!("/notes/{}", id), anonymous(), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::GET, &format!("/notes/{}", id), admin("root"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["owner_id"].is_null());
}

#[tokio::test]
async fn test_get_missing_note_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/notes/999", admin("root"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Note not found");
}

#[tokio::test]
async fn test_non_integer_note_id_is_validation_error() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/notes/abc", user("u1"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "path");
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let app = TestApp::new().await;
    let id = app.create_note(user("u1"), "old title", "old content").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/notes/{}", id),
            user("u1"),
            Some(json!({ "title": " new title ", "reason": "rename" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "new title");
    assert_eq!(body["content"], "old content");
    assert_eq!(body["owner_id"], "u1");
}

#[tokio::test]
async fn test_update_without_fields_is_bad_request() {
    let app = TestApp::new().await;
    let id = app.create_note(user("u1"), "t", "c").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/notes/{}", id),
            user("u1"),
            Some(json!({ "reason": "nothing" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "detail": "No fields provided to update", "code": "HTTP_ERROR" })
    );
}

#[tokio::test]
async fn test_update_checks_validation_then_access_then_emptiness() {
    let app = TestApp::new().await;

    // invalid body on a missing note: validation wins
    let (status, _) = app
        .send(
            Method::PUT,
            "/notes/999",
            user("u1"),
            Some(json!({ "title": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // empty update on a missing note: not found wins
    let (status, _) = app
        .send(Method::PUT, "/notes/999", user("u1"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // empty update on someone else's note: still not found
    let id = app.create_note(user("u1"), "t", "c").await;
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/notes/{}", id),
            user("u2"),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_note_then_not_found() {
    let app = TestApp::new().await;
    let id = app.create_note(user("u1"), "t", "c").await;

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/notes/{}", id),
            user("u2"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/notes/{}?reason=cleanup", id),
            user("u1"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .send(Method::GET, &format!("/notes/{}", id), user("u1"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_scopes_by_caller() {
    let app = TestApp::new().await;
    app.create_note(user("u1"), "a", "c").await;
    app.create_note(user("u1"), "b", "c").await;
    app.create_note(user("u2"), "c", "c").await;

    let (status, body) = app.send(Method::GET, "/notes", user("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["offset"], 0);
    let titles: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["b", "a"]);

    let (_, body) = app.send(Method::GET, "/notes", admin("root"), None).await;
    assert_eq!(body["total"], 3);

    let (_, body) = app.send(Method::GET, "/notes", anonymous(), None).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_list_paginates() {
    let app = TestApp::new().await;
    for i in 0..5 {
        app.create_note(user("u1"), &format!("n{}", i), "c").await;
    }

    let (status, body) = app
        .send(Method::GET, "/notes?limit=2&offset=1", user("u1"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["offset"], 1);
    let titles: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["n3", "n2"]);
}

#[tokio::test]
async fn test_list_rejects_out_of_range_pagination() {
    let app = TestApp::new().await;
    for uri in [
        "/notes?limit=0",
        "/notes?limit=101",
        "/notes?offset=-1",
        "/notes?limit=abc",
    ] {
        let (status, body) = app.send(Method::GET, uri, user("u1"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "uri {}", uri);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_audit_trail_is_admin_only_and_ordered() {
    let app = TestApp::new().await;
    let id = app.create_note(user("u1"), "t", "c").await;
    app.send(
        Method::PUT,
        &format!("/notes/{}", id),
        user("u1"),
        Some(json!({ "content": "c2" })),
    )
    .await;
    app.send(
        Method::DELETE,
        &format!("/notes/{}?reason=done", id),
        user("u1"),
        None,
    )
    .await;

    let (status, body) = app
        .send(Method::GET, &format!("/notes/{}/audit", id), user("u1"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({ "detail": "Insufficient permissions for this operation", "code": "HTTP_ERROR" })
    );

    let (status, body) = app
        .send(Method::GET, &format!("/notes/{}/audit", id), admin("root"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["CREATE", "UPDATE", "DELETE"]);
    assert_eq!(body[1]["before_state"]["content"], "c");
    assert_eq!(body[1]["after_state"]["content"], "c2");
    assert_eq!(body[2]["reason"], "done");
}
