use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{LeadRequest, LeadSubmission};
use super::mailer::{EmailError, EmailSender, OutboundEmail};
use super::templates::{ConfirmationTemplate, LeadTemplates, NotificationTemplate};
use super::validation::LeadValidationError;
use crate::config::{EmailConfig, LeadConfig};

/// Addresses and links stamped onto every lead email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSettings {
    pub sender: String,
    pub notification_recipient: String,
    pub calculator_url: String,
}

impl LeadSettings {
    pub fn from_config(email: &EmailConfig, leads: &LeadConfig) -> Self {
        Self {
            sender: email.sender.clone(),
            notification_recipient: email.notification_recipient.clone(),
            calculator_url: leads.calculator_url.clone(),
        }
    }
}

/// Which of the two lead emails a delivery failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStage {
    Confirmation,
    Notification,
}

impl fmt::Display for EmailStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailStage::Confirmation => write!(f, "confirmation"),
            EmailStage::Notification => write!(f, "notification"),
        }
    }
}

/// Validates a lead and forwards it as a visitor confirmation plus a sales notification.
///
/// The emails go out one after the other. A notification failure after a
/// delivered confirmation is still reported as a failure; nothing is retried
/// or rolled back.
pub struct LeadService<E> {
    sender: Arc<E>,
    templates: LeadTemplates,
    settings: LeadSettings,
}

impl<E> LeadService<E>
where
    E: EmailSender + 'static,
{
    pub fn new(sender: Arc<E>, templates: LeadTemplates, settings: LeadSettings) -> Self {
        Self {
            sender,
            templates,
            settings,
        }
    }

    pub fn settings(&self) -> &LeadSettings {
        &self.settings
    }

    #[tracing::instrument(
        name = "Capturing report lead",
        skip(self, request),
        fields(lead_email = %request.email.trim())
    )]
    pub async fn capture(&self, request: LeadRequest) -> Result<LeadSubmission, LeadServiceError> {
        let lead = request.validate()?;

        let confirmation = self.confirmation_email(&lead)?;
        self.deliver(EmailStage::Confirmation, confirmation).await?;

        let notification = self.notification_email(&lead)?;
        self.deliver(EmailStage::Notification, notification).await?;

        info!(
            farm_type = lead.farm_type_label(),
            region = lead.region_label(),
            timeline = lead.timeline_label(),
            "lead captured"
        );
        Ok(lead)
    }

    fn confirmation_email(&self, lead: &LeadSubmission) -> Result<OutboundEmail, LeadServiceError> {
        let template = ConfirmationTemplate::for_lead(lead, &self.settings.calculator_url);
        Ok(OutboundEmail {
            from: self.settings.sender.clone(),
            to: lead.email.clone(),
            subject: template.subject(),
            html: self.templates.render(&template)?,
        })
    }

    fn notification_email(&self, lead: &LeadSubmission) -> Result<OutboundEmail, LeadServiceError> {
        let template =
            NotificationTemplate::for_lead(lead, &self.settings.calculator_url, Utc::now());
        Ok(OutboundEmail {
            from: self.settings.sender.clone(),
            to: self.settings.notification_recipient.clone(),
            subject: template.subject(),
            html: self.templates.render(&template)?,
        })
    }

    async fn deliver(&self, stage: EmailStage, email: OutboundEmail) -> Result<(), LeadServiceError> {
        self.sender
            .send(email)
            .await
            .map_err(|source| LeadServiceError::Delivery { stage, source })
    }
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] LeadValidationError),
    #[error("failed to render lead email")]
    Template(#[from] tera::Error),
    #[error("failed to deliver {stage} email")]
    Delivery {
        stage: EmailStage,
        #[source]
        source: EmailError,
    },
}
