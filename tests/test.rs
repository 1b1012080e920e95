mod common;

use crate::common::{client, TestNotices};
use chrono::{Duration, Utc};
use ecohub::{
    common::{newtypes::UserId, NotificationKind},
    config::ApiConfig,
    frontend::{
        api::{ApiClient, NotificationApi},
        store::{EventStore, NotificationStore},
        utils::errors::FrontendError,
    },
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::{
    matchers::{method, path},
    Mock,
    MockServer,
    ResponseTemplate,
};

fn notifications_json() -> Value {
    json!([
        {
            "_id": "n1",
            "type": "follow",
            "isRead": false,
            "createdAt": "2024-05-01T10:00:00Z",
            "sender": { "_id": "u1", "username": "alice" }
        },
        {
            "_id": "n2",
            "type": "comment",
            "isRead": false,
            "createdAt": "2024-05-01T09:00:00Z",
            "sender": { "_id": "u2", "username": "bob" },
            "post": { "_id": "p1" },
            "content": "Nice garden!"
        },
        {
            "_id": "n3",
            "type": "poll_closed",
            "createdAt": "2024-05-01T08:00:00Z"
        }
    ])
}

async fn mock_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(notifications_json()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_notifications() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_list(&server).await;

    let notifications = client(&server).list_notifications().await?;
    assert_eq!(3, notifications.len());
    assert_eq!(NotificationKind::Follow, notifications[0].kind);
    assert_eq!(Some("alice"), notifications[0].sender.as_ref().map(|s| s.name.as_str()));
    assert_eq!(Some("Nice garden!"), notifications[1].kind.message());
    assert_eq!("poll_closed", notifications[2].kind.as_str());
    assert!(!notifications[2].is_read);
    Ok(())
}

#[tokio::test]
async fn test_mark_as_read() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/notifications/n1/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let notices = Arc::new(TestNotices::default());
    let store = NotificationStore::new(Arc::new(client(&server)), notices.clone());
    store.fetch_all().await?;
    assert_eq!(3, store.unread_count());

    assert!(store.mark_as_read(&"n1".into()).await);
    assert!(!store.mark_as_read(&"n1".into()).await);
    assert_eq!(2, store.unread_count());
    assert!(notices.errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_mark_all_as_read_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/notifications/read-all"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let notices = Arc::new(TestNotices::default());
    let store = NotificationStore::new(Arc::new(client(&server)), notices.clone());
    store.fetch_all().await?;

    let err = store.mark_all_as_read().await.expect_err("request should fail");
    assert_eq!(Some(500), err.status());
    assert_eq!(3, store.unread_count());
    assert_eq!(vec!["Database unavailable".to_string()], notices.errors());
    Ok(())
}

#[tokio::test]
async fn test_mark_all_as_read() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/notifications/read-all"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notices = Arc::new(TestNotices::default());
    let store = NotificationStore::new(Arc::new(client(&server)), notices.clone());
    store.fetch_all().await?;
    store.mark_all_as_read().await?;
    assert_eq!(0, store.unread_count());
    assert_eq!(
        vec!["All notifications marked as read".to_string()],
        notices.successes()
    );
    Ok(())
}

#[tokio::test]
async fn test_remove_notification() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mock_list(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/notifications/n2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = NotificationStore::new(
        Arc::new(client(&server)),
        Arc::new(TestNotices::default()),
    );
    store.fetch_all().await?;
    store.remove(&"n2".into()).await?;
    let ids: Vec<_> = store.notifications().into_iter().map(|n| n.id.0).collect();
    assert_eq!(vec!["n1", "n3"], ids);
    assert_eq!(2, store.unread_count());
    Ok(())
}

#[tokio::test]
async fn test_invalid_response() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_notifications().await.expect_err("request should fail");
    assert!(err.to_string().starts_with("Invalid response from server"));
    Ok(())
}

#[tokio::test]
async fn test_backend_unreachable() -> anyhow::Result<()> {
    // nothing listens on the discard port
    let config = ApiConfig {
        base_url: "http://127.0.0.1:9/api".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let notices = Arc::new(TestNotices::default());
    let store = NotificationStore::new(Arc::new(ApiClient::new(&config)?), notices.clone());

    let err = store.fetch_all().await.expect_err("request should fail");
    assert!(matches!(err, FrontendError::NoResponse(_)));
    assert!(store.notifications().is_empty());
    assert!(!store.is_loading());
    // polling failures are not shown to the user
    assert!(notices.errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_join_event() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let start = Utc::now() + Duration::days(3);
    let organizer = json!({ "_id": "org", "username": "greenpeace" });
    let me = json!({ "_id": "me", "username": "me" });
    let event = |participants: Vec<Value>| {
        json!({
            "_id": "e1",
            "title": "Beach cleanup",
            "location": "North beach",
            "startDate": start,
            "organizer": organizer,
            "participants": participants,
            "maxParticipants": 10,
            "status": "upcoming",
            "ecoPoints": 50,
            "createdAt": "2024-05-01T08:00:00Z"
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event(vec![
            organizer.clone()
        ])])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/events/e1/join"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(event(vec![organizer.clone(), me.clone()])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let notices = Arc::new(TestNotices::default());
    let store = EventStore::new(
        Arc::new(client(&server)),
        notices.clone(),
        UserId::from("me"),
    );
    store.fetch_all().await?;
    assert!(store.joined_events().is_empty());

    store.join(&"e1".into()).await?;
    assert_eq!(1, store.joined_events().len());
    assert_eq!(vec!["You joined Beach cleanup".to_string()], notices.successes());

    // joining twice is rejected before reaching the backend
    let err = store.join(&"e1".into()).await.expect_err("request should fail");
    assert_eq!(
        FrontendError::Validation("You already joined this event".to_string()),
        err
    );
    Ok(())
}
