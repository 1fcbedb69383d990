//! HTTP client for a Resend-compatible email delivery API.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::EmailConfig;
use crate::leads::mailer::{EmailError, EmailSender, OutboundEmail};

#[derive(Clone)]
pub struct ResendClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl ResendClient {
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            config.timeout,
        )
    }
}

impl EmailSender for ResendClient {
    #[tracing::instrument(
        name = "Sending email through delivery API",
        skip(self, email),
        fields(subject = %email.subject)
    )]
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        let url = format!("{}/emails", self.base_url);
        let request_body = SendEmailRequest {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "email accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{any, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    struct SendEmailBodyMatcher;

    impl wiremock::Match for SendEmailBodyMatcher {
        fn matches(&self, request: &Request) -> bool {
            match serde_json::from_slice::<Value>(&request.body) {
                Ok(body) => {
                    body.get("from").is_some()
                        && body["to"].is_array()
                        && body.get("subject").is_some()
                        && body.get("html").is_some()
                }
                Err(_) => false,
            }
        }
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Powering Forwards <reports@example.nz>".to_string(),
            to: "jo@example.com".to_string(),
            subject: "Subject".to_string(),
            html: "<p>Hello</p>".to_string(),
        }
    }

    fn client(base_url: String) -> ResendClient {
        ResendClient::new(base_url, "re_test_key".to_string(), Duration::from_millis(200))
            .expect("client builds")
    }

    #[tokio::test]
    async fn send_posts_expected_request() {
        let mock_server = MockServer::start().await;

        Mock::given(header_exists("Authorization"))
            .and(header("Authorization", "Bearer re_test_key"))
            .and(header("Content-Type", "application/json"))
            .and(path("/emails"))
            .and(method("POST"))
            .and(SendEmailBodyMatcher)
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        client(mock_server.uri())
            .send(email())
            .await
            .expect("email accepted");
    }

    #[tokio::test]
    async fn send_fails_on_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = client(mock_server.uri()).send(email()).await;

        match outcome {
            Err(EmailError::Rejected { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_times_out_on_slow_api() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = client(mock_server.uri()).send(email()).await;

        assert!(matches!(outcome, Err(EmailError::Transport(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = client("https://api.example.com/".to_string());
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
