//! Integration tests for the roster API.
//!
//! Boots the real router on an ephemeral port backed by a temporary SQLite
//! database, then drives it end-to-end with the dashboard client.

use roster_backend::auth::models::UpdateProfileRequest;
use roster_backend::auth::{AuthState, JwtHandler, UserStore};
use roster_backend::dashboard::{ClientError, DashboardClient, MemorySessionStore, SessionStore};
use roster_backend::server::build_router;
use roster_backend::students::models::{CreateStudentRequest, UpdateStudentRequest};
use roster_backend::students::{StudentState, StudentStore};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    _db: NamedTempFile, // keeps the database file alive for the test's duration
}

async fn spawn_server() -> TestServer {
    let db = NamedTempFile::new().unwrap();
    let db_path = db.path().to_str().unwrap().to_string();

    let user_store = Arc::new(UserStore::new(&db_path).unwrap());
    let student_store = Arc::new(StudentStore::new(&db_path).unwrap());
    let jwt_handler = Arc::new(JwtHandler::new("integration-test-secret".to_string()));

    let app = build_router(
        AuthState::new(user_store, jwt_handler),
        StudentState::new(student_store),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        _db: db,
    }
}

fn client(server: &TestServer) -> DashboardClient {
    DashboardClient::new(
        server.base_url.clone(),
        Arc::new(MemorySessionStore::new()),
    )
}

fn new_student(full_name: &str, student_id: &str, email: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        full_name: Some(full_name.to_string()),
        student_id: Some(student_id.to_string()),
        email: Some(email.to_string()),
        ..Default::default()
    }
}

fn assert_api_error(err: ClientError, status: u16) -> String {
    match err {
        ClientError::Api {
            status: got,
            message,
        } => {
            assert_eq!(got, status, "unexpected status (message: {})", message);
            message
        }
        other => panic!("expected API error with status {}, got {:?}", status, other),
    }
}

#[tokio::test]
async fn test_register_validation() {
    let server = spawn_server().await;
    let c = client(&server);

    // Short password never creates a user
    let err = c
        .register("Jane Doe", "jane@example.com", "short")
        .await
        .unwrap_err();
    assert_api_error(err, 400);

    let err = c
        .login("jane@example.com", "short")
        .await
        .unwrap_err();
    assert_eq!(assert_api_error(err, 401), "Invalid credentials");

    // Missing fields are a 400, not a deserialization rejection
    let resp = reqwest::Client::new()
        .post(format!("{}/api/register", server.base_url))
        .json(&serde_json::json!({ "email": "jane@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let server = spawn_server().await;
    let c = client(&server);

    c.register("Jane Doe", "jane@example.com", "password123")
        .await
        .unwrap();

    // Second attempt fails even with a differently-cased email
    let err = c
        .register("Other Jane", "JANE@example.com", "password456")
        .await
        .unwrap_err();
    assert_eq!(assert_api_error(err, 409), "User already exists");
}

#[tokio::test]
async fn test_login_enumeration_resistance() {
    let server = spawn_server().await;
    let c = client(&server);

    c.register("Jane Doe", "jane@example.com", "password123")
        .await
        .unwrap();
    c.logout();

    // Correct pair succeeds and yields a usable session
    let user = c.login("jane@example.com", "password123").await.unwrap();
    assert_eq!(user.email, "jane@example.com");
    assert_eq!(c.me().await.unwrap().full_name, "Jane Doe");
    c.logout();

    // Wrong password and unknown email return the identical message
    let wrong_pw = c
        .login("jane@example.com", "wrongpassword")
        .await
        .unwrap_err();
    let unknown = c
        .login("nobody@example.com", "password123")
        .await
        .unwrap_err();
    assert_eq!(assert_api_error(wrong_pw, 401), "Invalid credentials");
    assert_eq!(assert_api_error(unknown, 401), "Invalid credentials");
}

#[tokio::test]
async fn test_missing_and_tampered_tokens() {
    let server = spawn_server().await;
    let c = client(&server);

    // No session at all
    let err = c.list_students().await.unwrap_err();
    assert_eq!(assert_api_error(err, 401), "Authorization required");

    // Tampered token clears the session
    c.register("Jane Doe", "jane@example.com", "password123")
        .await
        .unwrap();
    let mut session = c.session().unwrap();
    session.token.push('x');
    let store = Arc::new(MemorySessionStore::new());
    store.set(session);
    let tampered = DashboardClient::new(server.base_url.clone(), store);

    let err = tampered.list_students().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(tampered.session().is_none());
}

#[tokio::test]
async fn test_student_end_to_end() {
    let server = spawn_server().await;
    let c = client(&server);

    c.register("Owner", "owner@example.com", "password123")
        .await
        .unwrap();

    let created = c
        .create_student(&new_student("Jane Doe", "S1", "jane@x.com"))
        .await
        .unwrap();
    assert_eq!(created.full_name, "Jane Doe");
    assert_eq!(created.grade, ""); // defaults to empty string
    assert!(created.enrollment_date.is_none());

    let listed = c.list_students().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let fetched = c.get_student(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched, created);

    let message = c.delete_student(&created.id.to_string()).await.unwrap();
    assert_eq!(message, "Student deleted");
    assert!(c.list_students().await.unwrap().is_empty());

    // Deleting again is a 404
    let err = c.delete_student(&created.id.to_string()).await.unwrap_err();
    assert_eq!(assert_api_error(err, 404), "Student not found");
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let server = spawn_server().await;
    let c = client(&server);

    c.register("Owner", "owner@example.com", "password123")
        .await
        .unwrap();

    for i in 0..3 {
        c.create_student(&new_student(
            &format!("Student {}", i),
            &format!("S{}", i),
            &format!("s{}@x.com", i),
        ))
        .await
        .unwrap();
    }

    let names: Vec<String> = c
        .list_students()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.full_name)
        .collect();
    assert_eq!(names, vec!["Student 2", "Student 1", "Student 0"]);
}

#[tokio::test]
async fn test_ownership_scoping() {
    let server = spawn_server().await;

    let alice = client(&server);
    alice
        .register("Alice", "alice@example.com", "password123")
        .await
        .unwrap();
    let student = alice
        .create_student(&new_student("Jane Doe", "S1", "jane@x.com"))
        .await
        .unwrap();
    let id = student.id.to_string();

    let bob = client(&server);
    bob.register("Bob", "bob@example.com", "password123")
        .await
        .unwrap();

    // Alice's student is invisible and untouchable under Bob's token
    assert!(bob.list_students().await.unwrap().is_empty());

    let err = bob.get_student(&id).await.unwrap_err();
    assert_eq!(assert_api_error(err, 404), "Student not found");

    let update = UpdateStudentRequest {
        grade: Some("F".to_string()),
        ..Default::default()
    };
    let err = bob.update_student(&id, &update).await.unwrap_err();
    assert_api_error(err, 404);

    let err = bob.delete_student(&id).await.unwrap_err();
    assert_api_error(err, 404);

    // Untouched for Alice
    let intact = alice.get_student(&id).await.unwrap();
    assert_eq!(intact.grade, "");
}

#[tokio::test]
async fn test_partial_update_semantics() {
    let server = spawn_server().await;
    let c = client(&server);

    c.register("Owner", "owner@example.com", "password123")
        .await
        .unwrap();

    let created = c
        .create_student(&CreateStudentRequest {
            full_name: Some("Jane Doe".to_string()),
            student_id: Some("S1".to_string()),
            email: Some("Jane@X.com".to_string()),
            grade: Some("A".to_string()),
            enrollment_date: Some("2024-09-01".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(created.email, "jane@x.com"); // stored lowercased
    let id = created.id.to_string();

    // Updating only grade preserves everything else
    let updated = c
        .update_student(
            &id,
            &UpdateStudentRequest {
                grade: Some("B+".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.grade, "B+");
    assert_eq!(updated.full_name, "Jane Doe");
    assert_eq!(updated.email, "jane@x.com");
    assert_eq!(updated.enrollment_date, created.enrollment_date);

    // Clearing grade requires an explicit empty string
    let cleared = c
        .update_student(
            &id,
            &UpdateStudentRequest {
                grade: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.grade, "");
    assert_eq!(cleared.full_name, "Jane Doe");

    // Explicit JSON null also means "leave unchanged"
    let resp = reqwest::Client::new()
        .put(format!("{}/api/students/{}", server.base_url, id))
        .bearer_auth(c.session().unwrap().token)
        .json(&serde_json::json!({ "fullName": null, "studentId": "S2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["fullName"], "Jane Doe");
    assert_eq!(body["studentId"], "S2");

    // Blanking a required field fails validation on the merged document
    let err = c
        .update_student(
            &id,
            &UpdateStudentRequest {
                full_name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_api_error(err, 400);
}

#[tokio::test]
async fn test_profile_update() {
    let server = spawn_server().await;

    let other = client(&server);
    other
        .register("Other", "taken@example.com", "password123")
        .await
        .unwrap();

    let c = client(&server);
    c.register("Jane Doe", "jane@example.com", "password123")
        .await
        .unwrap();

    // Name-only update leaves email alone
    let user = c
        .update_profile(&UpdateProfileRequest {
            full_name: Some("Jane Smith".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(user.full_name, "Jane Smith");
    assert_eq!(user.email, "jane@example.com");

    // Cached session user tracks the change
    assert_eq!(c.session().unwrap().user.full_name, "Jane Smith");

    // Email conflicts with another account
    let err = c
        .update_profile(&UpdateProfileRequest {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(assert_api_error(err, 409), "Email already in use");

    // Short password rejected, empty password ignored
    let err = c
        .update_profile(&UpdateProfileRequest {
            password: Some("short".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_api_error(err, 400);

    c.update_profile(&UpdateProfileRequest {
        password: Some(String::new()),
        ..Default::default()
    })
    .await
    .unwrap();

    c.logout();
    c.login("jane@example.com", "password123").await.unwrap();

    // A real password change takes effect
    c.update_profile(&UpdateProfileRequest {
        password: Some("newpassword456".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();
    c.logout();

    let err = c
        .login("jane@example.com", "password123")
        .await
        .unwrap_err();
    assert_api_error(err, 401);
    c.login("jane@example.com", "newpassword456").await.unwrap();
}

#[tokio::test]
async fn test_health_check_is_public() {
    let server = spawn_server().await;

    let resp = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}
