//! Slack webhook notifier against a mock server

mod common;

use common::*;
use feed_server::export::{
    FeedExportJob, NativeType, Notification, Notifier, NotifyError, SlackNotifier,
    StaticProductSource,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_slack_notifier_posts_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        SlackNotifier::new(format!("{}/hook", server.uri()), Duration::from_secs(5)).unwrap();
    notifier
        .notify(&Notification::success("integrations", "Successfully pushed"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["channel"], "integrations");
    assert_eq!(body["attachments"][0]["title"], "OpenAI Product Feed");
    assert_eq!(body["attachments"][0]["text"], "Successfully pushed");
    assert_eq!(body["attachments"][0]["color"], "green");
}

#[tokio::test]
async fn test_slack_notifier_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("invalid_payload"))
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = notifier
        .notify(&Notification::failure("integrations", "boom"))
        .await
        .unwrap_err();

    match err {
        NotifyError::Rejected { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "invalid_payload");
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_failed_job_posts_exactly_one_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let artifacts = tempfile::tempdir().unwrap();
    let notifier =
        SlackNotifier::new(format!("{}/hook", server.uri()), Duration::from_secs(5)).unwrap();
    let job = FeedExportJob::new(
        Arc::new(StaticProductSource::new(vec![product("p1", NativeType::Digital)])),
        Arc::new(RecordingTransport::failing(1)),
        Arc::new(notifier),
        export_config("tsv", artifacts.path(), complete_delivery()),
    )
    .with_clock(fixed_clock);

    assert!(job.run().await.is_err());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["attachments"][0]["color"], "red");
    assert_eq!(
        body["attachments"][0]["text"],
        "Failed to push OpenAI product feed: Transport error: Connection failed"
    );
    assert!(dir_is_empty(artifacts.path()));
}
