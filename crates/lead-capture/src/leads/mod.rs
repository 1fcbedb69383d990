//! Report lead intake: validation, email rendering, and delivery of the
//! visitor confirmation and sales notification.

pub mod domain;
pub mod mailer;
pub mod router;
pub mod service;
pub mod templates;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{FarmType, LeadRequest, LeadSubmission, Region, Timeline};
pub use mailer::{EmailError, EmailSender, OutboundEmail};
pub use router::{lead_router, LEAD_ROUTE};
pub use service::{EmailStage, LeadService, LeadServiceError, LeadSettings};
pub use templates::LeadTemplates;
pub use validation::LeadValidationError;
