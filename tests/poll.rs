use httpmock::prelude::*;
use serde_json::json;
use std::time::{Duration, Instant};
use vanish_client::{Client, PollOptions};

fn page(total: u64, ids: &[&str]) -> serde_json::Value {
    let data: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "from": "sender@example.com",
                "subject": "Code",
                "textPreview": "Your code is 123456",
                "receivedAt": "2024-01-15T10:30:00Z",
                "hasAttachments": false
            })
        })
        .collect();
    json!({"data": data, "total": total})
}

#[tokio::test]
async fn returns_immediately_when_new_mail_present() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/mailbox/")
                .query_param("limit", "1");
            then.status(200).json_body(page(1, &["e1"]));
        })
        .await;

    let client = Client::new(server.base_url()).unwrap();
    let options = PollOptions::new()
        .timeout(Duration::from_secs(60))
        .interval(Duration::from_secs(30));

    let started = Instant::now();
    let email = client
        .poll_for_emails("box@vanish.host", &options)
        .await
        .unwrap();

    assert_eq!(email.map(|e| e.id), Some("e1".to_string()));
    assert!(started.elapsed() < Duration::from_secs(5));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn times_out_within_deadline_when_interval_is_longer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/mailbox/");
            then.status(200).json_body(page(0, &[]));
        })
        .await;

    let client = Client::new(server.base_url()).unwrap();
    let options = PollOptions::new()
        .timeout(Duration::from_millis(300))
        .interval(Duration::from_secs(100));

    let started = Instant::now();
    let email = client
        .poll_for_emails("box@vanish.host", &options)
        .await
        .unwrap();

    assert!(email.is_none());
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(started.elapsed() < Duration::from_secs(5));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn ignores_mail_already_counted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/mailbox/");
            then.status(200).json_body(page(2, &["e2"]));
        })
        .await;

    let client = Client::new(server.base_url()).unwrap();
    let options = PollOptions::new()
        .timeout(Duration::from_millis(250))
        .interval(Duration::from_millis(100))
        .initial_count(2);

    let email = client
        .poll_for_emails("box@vanish.host", &options)
        .await
        .unwrap();

    assert!(email.is_none());
    assert!(mock.hits_async().await >= 2);
}

#[tokio::test]
async fn total_above_count_without_data_keeps_waiting() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/mailbox/");
            then.status(200).json_body(page(1, &[]));
        })
        .await;

    let client = Client::new(server.base_url()).unwrap();
    let options = PollOptions::new()
        .timeout(Duration::from_millis(200))
        .interval(Duration::from_millis(50));

    let email = client
        .poll_for_emails("box@vanish.host", &options)
        .await
        .unwrap();

    assert!(email.is_none());
}

#[tokio::test]
async fn zero_timeout_makes_no_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/mailbox/");
            then.status(200).json_body(page(1, &["e1"]));
        })
        .await;

    let client = Client::new(server.base_url()).unwrap();
    let options = PollOptions::new().timeout(Duration::ZERO);

    let email = client
        .poll_for_emails("box@vanish.host", &options)
        .await
        .unwrap();

    assert!(email.is_none());
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn errors_abort_the_poll_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/mailbox/");
            then.status(500)
                .json_body(json!({"error": "internal failure"}));
        })
        .await;

    let client = Client::new(server.base_url()).unwrap();
    let options = PollOptions::new()
        .timeout(Duration::from_secs(60))
        .interval(Duration::from_millis(10));

    let err = client
        .poll_for_emails("box@vanish.host", &options)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.message(), "internal failure");
    mock.assert_hits_async(1).await;
}
