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
async fn test_upload_and_student_visibility() {
    let app = TestApp::new().await;
    let (admin, teacher, student) = setup_school(&app).await;

    let response = app.post("/api/papers", Some(&teacher), json!({
        "subject": "Math",
        "year": "2023",
        "title": "Midterm",
        "fileName": "midterm-2023.pdf",
        "fileData": "JVBERi0xLjQ="
    })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let paper = parse_body(response).await;
    assert_eq!(paper["teacherId"], "TC1");
    assert_eq!(paper["teacherName"], "Ada Lovelace");
    assert_eq!(paper["fileName"], "midterm-2023.pdf");

    // Students cannot upload.
    let response = app.post("/api/papers", Some(&student), json!({
        "subject": "Math", "year": "2023", "title": "x",
        "fileName": "x.pdf", "fileData": "AA=="
    })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Visibility follows the linkage, like notices.
    let response = app.get("/api/papers", Some(&student)).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 0);

    app.post("/api/users/bulk-assign", Some(&admin), json!({
        "studentIds": ["STU1"], "teacherIds": ["TC1"]
    })).await;
    let response = app.get("/api/papers", Some(&student)).await;
    let papers = parse_body(response).await;
    assert_eq!(papers.as_array().unwrap().len(), 1);
    assert_eq!(papers[0]["title"], "Midterm");
}

#[tokio::test]
async fn test_archive_is_sorted_newest_first() {
    let app = TestApp::new().await;
    let (_admin, teacher, _student) = setup_school(&app).await;

    for title in ["First", "Second", "Third"] {
        let response = app.post("/api/papers", Some(&teacher), json!({
            "subject": "Math", "year": "2023", "title": title,
            "fileName": format!("{}.pdf", title), "fileData": "AA=="
        })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        // Uploads get server timestamps; space them out.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app.get("/api/papers?teacherId=TC1", Some(&teacher)).await;
    let body = parse_body(response).await;
    let papers = body.as_array().unwrap();
    assert_eq!(papers.len(), 3);
    assert_eq!(papers[0]["title"], "Third");
    assert_eq!(papers[2]["title"], "First");
}

#[tokio::test]
async fn test_only_the_uploader_can_delete() {
    let app = TestApp::new().await;
    let (admin, teacher, _student) = setup_school(&app).await;

    app.create_user(&admin, json!({
        "id": "TC2", "name": "Grace Hopper", "email": "grace@school.test",
        "password": "pw", "role": "TEACHER"
    })).await;
    let other_teacher = app.login("grace@school.test", "pw", "TEACHER").await;

    let response = app.post("/api/papers", Some(&teacher), json!({
        "subject": "Math", "year": "2023", "title": "Midterm",
        "fileName": "midterm.pdf", "fileData": "AA=="
    })).await;
    let paper_id = parse_body(response).await["id"].as_str().unwrap().to_string();

    let response = app.delete(&format!("/api/papers/{}", paper_id), Some(&other_teacher)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.delete(&format!("/api/papers/{}", paper_id), Some(&teacher)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["message"], "Paper deleted");

    let response = app.delete(&format!("/api/papers/{}", paper_id), Some(&teacher)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(response).await["message"], "Paper not found");
}
