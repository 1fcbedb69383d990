use std::future::Future;

use serde::{Deserialize, Serialize};

/// One HTML email ready for the delivery API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound delivery seam so the lead service can be exercised without the network.
pub trait EmailSender: Send + Sync {
    fn send(&self, email: OutboundEmail) -> impl Future<Output = Result<(), EmailError>> + Send;
}

/// Delivery failure reported by an [`EmailSender`].
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email service rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
