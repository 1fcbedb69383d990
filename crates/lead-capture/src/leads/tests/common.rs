use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use serde_json::Value;

use crate::leads::mailer::{EmailError, EmailSender, OutboundEmail};
use crate::leads::{LeadRequest, LeadService, LeadSettings, LeadTemplates};

pub(super) fn settings() -> LeadSettings {
    LeadSettings {
        sender: "Powering Forwards <reports@example.nz>".to_string(),
        notification_recipient: "sales@example.nz".to_string(),
        calculator_url: "https://calc.example.nz".to_string(),
    }
}

pub(super) fn minimal_request() -> LeadRequest {
    LeadRequest {
        name: "Jo".to_string(),
        email: "jo@example.com".to_string(),
        ..LeadRequest::default()
    }
}

pub(super) fn full_request() -> LeadRequest {
    LeadRequest {
        name: "Hemi Walker".to_string(),
        email: "hemi@farm.example.nz".to_string(),
        phone: Some("027 555 0199".to_string()),
        farm_type: Some("sheepBeef".to_string()),
        region: Some("Otago".to_string()),
        timeline: Some("next-year".to_string()),
    }
}

pub(super) fn build_service<E: EmailSender + 'static>(sender: Arc<E>) -> Arc<LeadService<E>> {
    Arc::new(LeadService::new(
        sender,
        LeadTemplates::new().expect("templates parse"),
        settings(),
    ))
}

pub(super) fn json_post(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Records every email it is asked to send.
#[derive(Default)]
pub(super) struct MemoryMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailSender for MemoryMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        self.sent.lock().expect("mailer mutex poisoned").push(email);
        Ok(())
    }
}

/// Accepts the first `succeed_first` emails, then rejects the rest.
pub(super) struct FlakyMailer {
    succeed_first: usize,
    attempts: Mutex<Vec<OutboundEmail>>,
}

impl FlakyMailer {
    pub(super) fn failing_after(succeed_first: usize) -> Self {
        Self {
            succeed_first,
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn attempts(&self) -> Vec<OutboundEmail> {
        self.attempts.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailSender for FlakyMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        let mut attempts = self.attempts.lock().expect("mailer mutex poisoned");
        attempts.push(email);
        if attempts.len() > self.succeed_first {
            return Err(EmailError::Rejected {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}
