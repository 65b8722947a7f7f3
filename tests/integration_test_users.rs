mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_admin_creates_teacher_and_student_accounts() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let teacher = app.create_user(&admin, json!({
        "id": "TC1",
        "name": "Ada Lovelace",
        "email": "ada@school.test",
        "password": "Teach#1",
        "role": "TEACHER",
        "subjects": ["Math", "Physics"],
        "allowInvite": true
    })).await;
    assert_eq!(teacher["role"], "TEACHER");
    assert_eq!(teacher["subjects"], json!(["Math", "Physics"]));
    assert_eq!(teacher["allowInvite"], true);
    assert!(teacher.get("password").is_none());
    assert!(teacher.get("passwordHash").is_none());

    let student = app.create_user(&admin, json!({
        "id": "STU1",
        "name": "Alan Turing",
        "email": "alan@school.test",
        "password": "Stud#1",
        "role": "STUDENT"
    })).await;
    assert_eq!(student["role"], "STUDENT");
    assert_eq!(student["teacherIds"], json!([]));

    // Both can log into their portals with the assigned credentials.
    app.login("ada@school.test", "Teach#1", "TEACHER").await;
    app.login("alan@school.test", "Stud#1", "STUDENT").await;
}

#[tokio::test]
async fn test_create_rejects_duplicate_id_and_email() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "STU1", "name": "Alan", "email": "alan@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;

    let response = app.post("/api/users", Some(&admin), json!({
        "id": "STU1", "name": "Other", "email": "other@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["message"], "User ID already exists");

    let response = app.post("/api/users", Some(&admin), json!({
        "id": "STU2", "name": "Other", "email": "alan@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["message"], "Email already registered");
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let response = app.post("/api/users", Some(&admin), json!({
        "id": "", "name": "Nameless", "email": "x@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["message"], "Missing required fields");
}

#[tokio::test]
async fn test_list_users_with_role_filter() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "TC1", "name": "Ada", "email": "ada@school.test",
        "password": "pw", "role": "TEACHER", "subjects": ["Math"]
    })).await;
    app.create_user(&admin, json!({
        "id": "STU1", "name": "Alan", "email": "alan@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;

    let response = app.get("/api/users?role=TEACHER", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    let teachers = body.as_array().unwrap();
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0]["id"], "TC1");

    let response = app.get("/api/users", Some(&admin)).await;
    let body = parse_body(response).await;
    // Seeded admin plus the two created accounts.
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_only_admins_manage_accounts() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "TC1", "name": "Ada", "email": "ada@school.test",
        "password": "pw", "role": "TEACHER"
    })).await;
    let teacher = app.login("ada@school.test", "pw", "TEACHER").await;

    let response = app.post("/api/users", Some(&teacher), json!({
        "id": "STU9", "name": "X", "email": "x@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.delete("/api/users/TC1", Some(&teacher)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_user_profile_fields() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "TC1", "name": "Ada", "email": "ada@school.test",
        "password": "pw", "role": "TEACHER", "subjects": ["Math"]
    })).await;

    let response = app.put("/api/users/TC1", Some(&admin), json!({
        "name": "Ada King",
        "subjects": ["Math", "CS"],
        "allowInvite": true
    })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["name"], "Ada King");
    assert_eq!(body["subjects"], json!(["Math", "CS"]));
    assert_eq!(body["allowInvite"], true);

    let response = app.put("/api/users/NOPE", Some(&admin), json!({"name": "X"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(response).await["message"], "User not found");
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "STU1", "name": "Alan", "email": "alan@school.test",
        "password": "old-pw", "role": "STUDENT"
    })).await;

    let response = app.put("/api/users/STU1", Some(&admin), json!({"password": "new-pw"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.post("/api/login", None, json!({
        "email": "alan@school.test", "password": "old-pw", "role": "STUDENT"
    })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    app.login("alan@school.test", "new-pw", "STUDENT").await;
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "STU1", "name": "Alan", "email": "alan@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;

    let response = app.delete("/api/users/STU1", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["message"], "User deleted successfully");

    // The account is gone for both the API and the login flow.
    let response = app.delete("/api/users/STU1", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.post("/api/login", None, json!({
        "email": "alan@school.test", "password": "pw", "role": "STUDENT"
    })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_delete_itself() {
    let app = TestApp::new().await;
    let admin = app.login_admin().await;

    let response = app.delete("/api/users/admin-001", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["message"], "Cannot delete yourself");
}
