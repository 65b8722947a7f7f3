mod common;

use axum::http::StatusCode;
use common::{parse_body, AuthHeaders, TestApp};
use serde_json::{json, Value};

async fn setup_accounts(app: &TestApp) -> AuthHeaders {
    let admin = app.login_admin().await;

    for (id, name, email, role) in [
        ("TC1", "Ada Lovelace", "ada@school.test", "TEACHER"),
        ("TC2", "Grace Hopper", "grace@school.test", "TEACHER"),
        ("STU1", "Alan Turing", "alan@school.test", "STUDENT"),
        ("STU2", "Edsger Dijkstra", "edsger@school.test", "STUDENT"),
    ] {
        app.create_user(&admin, json!({
            "id": id, "name": name, "email": email,
            "password": "pw", "role": role
        })).await;
    }
    admin
}

fn entry<'a>(body: &'a Value, id: &str) -> &'a Value {
    body.as_array().unwrap().iter()
        .find(|u| u["id"] == id)
        .unwrap_or_else(|| panic!("no entry for {} in response", id))
}

#[tokio::test]
async fn test_bulk_assign_unions_links_for_all_students() {
    let app = TestApp::new().await;
    let admin = setup_accounts(&app).await;

    let response = app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1", "STU2"],
        "teacherIds": ["TC1", "TC2"]
    })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(entry(&body, "STU1")["teacherIds"], json!(["TC1", "TC2"]));
    assert_eq!(entry(&body, "STU2")["teacherIds"], json!(["TC1", "TC2"]));
}

#[tokio::test]
async fn test_bulk_assign_is_idempotent() {
    let app = TestApp::new().await;
    let admin = setup_accounts(&app).await;

    app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1"], "teacherIds": ["TC1"]
    })).await;

    // Re-assigning an existing link, plus one new teacher, never duplicates.
    let response = app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1"], "teacherIds": ["TC1", "TC2"]
    })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(entry(&body, "STU1")["teacherIds"], json!(["TC1", "TC2"]));
}

#[tokio::test]
async fn test_bulk_assign_returns_non_student_entries_untouched() {
    let app = TestApp::new().await;
    let admin = setup_accounts(&app).await;

    // TC2 is listed as if it were a student: it is skipped by the role
    // filter but still echoed back in the response.
    let response = app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1", "TC2"],
        "teacherIds": ["TC1"]
    })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(entry(&body, "STU1")["teacherIds"], json!(["TC1"]));
    assert_eq!(entry(&body, "TC2")["role"], "TEACHER");
    assert!(entry(&body, "TC2").get("teacherIds").is_none());

    // Ids with no record at all are silently absent from the response.
    let response = app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1", "GHOST"],
        "teacherIds": ["TC1"]
    })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bulk_assign_rejects_malformed_input() {
    let app = TestApp::new().await;
    let admin = setup_accounts(&app).await;

    for payload in [
        json!({"studentIds": "STU1", "teacherIds": ["TC1"]}),
        json!({"studentIds": ["STU1"], "teacherIds": 42}),
        json!({"studentIds": ["STU1"]}),
        json!({"studentIds": [1, 2], "teacherIds": ["TC1"]}),
    ] {
        let response = app.post("/api/users/bulk-assign", Some(&admin), payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_body(response).await["message"], "Invalid data format");
    }
}

#[tokio::test]
async fn test_bulk_assign_is_admin_only_and_skips_the_handshake() {
    let app = TestApp::new().await;
    let admin = setup_accounts(&app).await;
    let teacher = app.login("ada@school.test", "pw", "TEACHER").await;

    let response = app.post("/api/users/bulk-assign", Some(&teacher), json!({
        "studentIds": ["STU1"], "teacherIds": ["TC1"]
    })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1"], "teacherIds": ["TC1"]
    })).await;

    // The override creates no join request: the teacher's inbox stays empty,
    // and a submit from the now-linked student conflicts immediately.
    let response = app.get("/api/requests", Some(&teacher)).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 0);

    let student = app.login("alan@school.test", "pw", "STUDENT").await;
    let response = app.post("/api/requests", Some(&student), json!({"teacherId": "TC1"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["message"], "Already assigned to this teacher");
}
