use super::common::*;
use crate::leads::{EmailStage, LeadRequest, LeadServiceError, Timeline};
use std::sync::Arc;

#[tokio::test]
async fn capture_sends_confirmation_then_notification() {
    let mailer = Arc::new(MemoryMailer::default());
    let service = build_service(mailer.clone());

    let lead = service
        .capture(minimal_request())
        .await
        .expect("minimal lead captured");

    assert_eq!(lead.name, "Jo");
    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);

    assert_eq!(sent[0].to, "jo@example.com");
    assert_eq!(sent[0].from, settings().sender);
    assert_eq!(
        sent[0].subject,
        "Your Powering Forwards Report - Farm Energy Analysis"
    );
    assert!(sent[0].html.contains("Hi Jo,"));

    assert_eq!(sent[1].to, "sales@example.nz");
    assert_eq!(
        sent[1].subject,
        "New Lead: Jo (Not specified farm, Not specified)"
    );
}

#[tokio::test]
async fn capture_renders_labels_for_known_codes() {
    let mailer = Arc::new(MemoryMailer::default());
    let service = build_service(mailer.clone());

    service
        .capture(full_request())
        .await
        .expect("full lead captured");

    let sent = mailer.sent();
    assert!(sent[0]
        .html
        .contains("Sheep&#x2F;Beef farms in the Otago region"));
    assert_eq!(
        sent[1].subject,
        "New Lead: Hemi Walker (Sheep/Beef farm, Otago)"
    );
    assert!(sent[1].html.contains("Within the next year"));
    assert!(sent[1].html.contains("027 555 0199"));
}

#[tokio::test]
async fn capture_keeps_unknown_timeline_code() {
    let mailer = Arc::new(MemoryMailer::default());
    let service = build_service(mailer.clone());

    let lead = service
        .capture(LeadRequest {
            timeline: Some("after-calving".to_string()),
            ..minimal_request()
        })
        .await
        .expect("lead captured");

    assert_eq!(lead.timeline, Some(Timeline::Other("after-calving".to_string())));
    assert!(mailer.sent()[1]
        .html
        .contains("<strong>Timeline:</strong> after-calving"));
}

#[tokio::test]
async fn capture_rejects_invalid_contact_without_sending() {
    let mailer = Arc::new(MemoryMailer::default());
    let service = build_service(mailer.clone());

    let result = service
        .capture(LeadRequest {
            name: "J".to_string(),
            ..minimal_request()
        })
        .await;

    match result {
        Err(LeadServiceError::Validation(error)) => {
            assert!(error.details().contains_key("name"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn confirmation_failure_skips_notification() {
    let mailer = Arc::new(FlakyMailer::failing_after(0));
    let service = build_service(mailer.clone());

    let result = service.capture(minimal_request()).await;

    assert!(matches!(
        result,
        Err(LeadServiceError::Delivery {
            stage: EmailStage::Confirmation,
            ..
        })
    ));
    assert_eq!(mailer.attempts().len(), 1);
}

#[tokio::test]
async fn notification_failure_is_reported_after_confirmation_sent() {
    let mailer = Arc::new(FlakyMailer::failing_after(1));
    let service = build_service(mailer.clone());

    let result = service.capture(minimal_request()).await;

    assert!(matches!(
        result,
        Err(LeadServiceError::Delivery {
            stage: EmailStage::Notification,
            ..
        })
    ));
    let attempts = mailer.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].to, "jo@example.com");
}
