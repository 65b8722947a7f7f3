mod common;

use axum::http::StatusCode;
use common::{parse_body, AuthHeaders, TestApp};
use serde_json::json;

async fn setup_school(app: &TestApp) -> (AuthHeaders, AuthHeaders, AuthHeaders) {
    let admin = app.login_admin().await;

    app.create_user(&admin, json!({
        "id": "TC1", "name": "Ada Lovelace", "email": "ada@school.test",
        "password": "pw", "role": "TEACHER"
    })).await;
    app.create_user(&admin, json!({
        "id": "STU1", "name": "Alan Turing", "email": "alan@school.test",
        "password": "pw", "role": "STUDENT"
    })).await;

    let teacher = app.login("ada@school.test", "pw", "TEACHER").await;
    let student = app.login("alan@school.test", "pw", "STUDENT").await;
    (admin, teacher, student)
}

#[tokio::test]
async fn test_notice_feed_follows_the_student_teacher_linkage() {
    let app = TestApp::new().await;
    let (admin, teacher, student) = setup_school(&app).await;

    let response = app.post("/api/notices", Some(&teacher), json!({
        "title": "Exam schedule",
        "content": "Finals start Monday.",
        "attachments": [{"name": "schedule.pdf", "data": "JVBERi0xLjQ="}]
    })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let notice = parse_body(response).await;
    assert_eq!(notice["teacherId"], "TC1");
    assert_eq!(notice["teacherName"], "Ada Lovelace");
    assert_eq!(notice["attachments"][0]["name"], "schedule.pdf");

    // Unlinked student: empty feed.
    let response = app.get("/api/notices", Some(&student)).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 0);

    // Link the student, and the notice appears.
    app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1"], "teacherIds": ["TC1"]
    })).await;
    let response = app.get("/api/notices", Some(&student)).await;
    let feed = parse_body(response).await;
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(feed[0]["title"], "Exam schedule");

    // The teacher's default feed is their own board.
    let response = app.get("/api/notices", Some(&teacher)).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_the_author_can_modify_a_notice() {
    let app = TestApp::new().await;
    let (admin, teacher, student) = setup_school(&app).await;

    app.create_user(&admin, json!({
        "id": "TC2", "name": "Grace Hopper", "email": "grace@school.test",
        "password": "pw", "role": "TEACHER"
    })).await;
    let other_teacher = app.login("grace@school.test", "pw", "TEACHER").await;

    let response = app.post("/api/notices", Some(&teacher), json!({
        "title": "Homework", "content": "Chapter 3."
    })).await;
    let notice_id = parse_body(response).await["id"].as_str().unwrap().to_string();

    // Students cannot post at all.
    let response = app.post("/api/notices", Some(&student), json!({
        "title": "x", "content": "y"
    })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.put(&format!("/api/notices/{}", notice_id), Some(&other_teacher), json!({
        "content": "Hijacked"
    })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.put(&format!("/api/notices/{}", notice_id), Some(&teacher), json!({
        "content": "Chapters 3 and 4."
    })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["content"], "Chapters 3 and 4.");
    assert_eq!(updated["title"], "Homework");

    let response = app.put("/api/notices/nope", Some(&teacher), json!({"content": "x"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(response).await["message"], "Notice not found");
}

#[tokio::test]
async fn test_delete_notice() {
    let app = TestApp::new().await;
    let (_admin, teacher, _student) = setup_school(&app).await;

    let response = app.post("/api/notices", Some(&teacher), json!({
        "title": "Old news", "content": "Outdated."
    })).await;
    let notice_id = parse_body(response).await["id"].as_str().unwrap().to_string();

    let response = app.delete(&format!("/api/notices/{}", notice_id), Some(&teacher)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["message"], "Notice deleted");

    let response = app.get("/api/notices", Some(&teacher)).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 0);

    let response = app.delete(&format!("/api/notices/{}", notice_id), Some(&teacher)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
