mod common;

use common::TestContext;
use serde_json::json;
use stayline::application_port::{ApiError, BookingApi};
use stayline::domain_model::{BackgroundTask, TaskId, TaskKind, TaskStatus};
use stayline::poller::{TaskBoard, TaskPoller};
use stayline::session::{SessionContext, SessionState};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn profile() -> serde_json::Value {
    json!({
        "user_id": "9a4e2c11-5d1b-4f0a-9d3c-0e7b6a5f4c21",
        "username": "amina",
        "email": "amina@example.com",
        "first_name": "Amina",
        "last_name": "Okafor",
        "role": "guest",
        "email_verified": true,
    })
}

fn session(ctx: &TestContext) -> SessionContext {
    SessionContext::new(Arc::new(ctx.api.clone()), ctx.vault.clone(), &ctx.events)
}

#[tokio::test]
async fn login_obtains_tokens_then_profile() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({"username": "amina", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a-1", "refresh": "r-1"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profiles/me/"))
        .and(header("Authorization", "Bearer a-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = session(&ctx);
    let user = session.login("amina", "pw").await.unwrap();
    assert_eq!(user.display_name(), "Amina Okafor");
    assert_eq!(session.snapshot().state(), SessionState::Authenticated);
    assert_eq!(ctx.access_token().await.as_deref(), Some("a-1"));
    assert_eq!(ctx.refresh_token().await.as_deref(), Some("r-1"));
    session.shutdown().await;
}

#[tokio::test]
async fn bad_password_reports_invalid_credentials() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&ctx.server)
        .await;

    let session = session(&ctx);
    assert_eq!(session.login("amina", "nope").await.unwrap_err(), ApiError::InvalidCredentials);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.state(), SessionState::Error);
    assert_eq!(ctx.access_token().await, None);
    session.shutdown().await;
}

#[tokio::test]
async fn failed_refresh_signs_the_session_out() {
    let ctx = TestContext::signed_in("a-1", "r-1").await;
    Mock::given(method("GET"))
        .and(path("/api/profiles/me/"))
        .and(header("Authorization", "Bearer a-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let session = session(&ctx);
    assert_eq!(session.initialize().await.state(), SessionState::Authenticated);

    let mut changes = session.subscribe();
    assert_eq!(ctx.api.list_bookings().await.unwrap_err(), ApiError::SessionExpired);
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.snapshot().state(), SessionState::Anonymous);
    session.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn expired_profile_during_login_keeps_the_error() {
    for _ in 0..10 {
        let ctx = TestContext::new().await;
        Mock::given(method("POST"))
            .and(path("/api/token/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access": "a-1", "refresh": "r-1"})),
            )
            .mount(&ctx.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profiles/me/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let session = session(&ctx);
        assert_eq!(session.login("amina", "pw").await.unwrap_err(), ApiError::SessionExpired);
        tokio::time::sleep(Duration::from_millis(30)).await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.state(), SessionState::Error);
        assert!(snapshot.error.as_deref().is_some_and(|m| !m.is_empty()));
        assert_eq!(ctx.access_token().await, None);
        session.shutdown().await;
    }
}

#[tokio::test]
async fn poller_follows_a_task_until_it_is_ready() {
    let ctx = TestContext::signed_in("a-1", "r-1").await;
    Mock::given(method("GET"))
        .and(path("/api/email-task-status/mail-7/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "STARTED", "ready": false})),
        )
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/email-task-status/mail-7/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "SUCCESS", "ready": true, "result": "sent"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let poller = TaskPoller::new(
        Arc::new(ctx.api.clone()),
        TaskBoard::default(),
        Duration::from_millis(25),
    );
    let id = TaskId("mail-7".to_string());
    poller.track(BackgroundTask::submitted(
        id.clone(),
        TaskKind::BookingConfirmation,
        "confirmation",
    ));
    poller.set_auto_refresh(true);

    tokio::time::timeout(Duration::from_secs(2), async {
        while !poller.all_ready() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    // a ready task is never queried again
    tokio::time::sleep(Duration::from_millis(100)).await;
    poller.shutdown().await;
    assert_eq!(poller.get(&id).unwrap().status, TaskStatus::Success);
}
