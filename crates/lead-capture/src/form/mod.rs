//! Client side of the report download page: holds the form fields, posts one
//! lead per submit, and fetches the report PDF once the lead is accepted.

mod client;

use std::future::Future;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::leads::LeadRequest;

pub use client::HttpFormBackend;

/// Shown to the visitor whenever submission fails, whatever the cause.
pub const FORM_ERROR_MESSAGE: &str = "There was an error. Please try again.";
pub const REPORT_FILE_NAME: &str = "powering-forwards-report.pdf";

/// Field values as the visitor currently has them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub farm_type: String,
    pub region: String,
    pub timeline: String,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            farm_type: "dairy".to_string(),
            region: "Southland".to_string(),
            timeline: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    FarmType,
    Region,
    Timeline,
}

impl LeadForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::FarmType => &mut self.farm_type,
            FormField::Region => &mut self.region,
            FormField::Timeline => &mut self.timeline,
        };
        *slot = value.into();
    }

    /// Blank optional fields are omitted from the payload.
    pub fn to_request(&self) -> LeadRequest {
        fn optional(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        LeadRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: optional(&self.phone),
            farm_type: optional(&self.farm_type),
            region: optional(&self.region),
            timeline: optional(&self.timeline),
        }
    }
}

/// Where the downloaded report ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Network side of the form, split out so state handling can be tested offline.
pub trait FormBackend: Send + Sync {
    fn submit_lead(
        &self,
        request: &LeadRequest,
    ) -> impl Future<Output = Result<(), FormError>> + Send;

    fn download_report(&self) -> impl Future<Output = Result<DownloadedReport, FormError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("lead endpoint responded {status}: {}", .message.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, message: Option<String> },
    #[error("report download returned {content_type} instead of a PDF")]
    NotPdf { content_type: String },
    #[error("could not save report: {0}")]
    Io(#[from] std::io::Error),
}

/// Drives one form: field state, the `submitted` flag, and the visible error.
pub struct LeadFormController<B> {
    backend: B,
    form: LeadForm,
    submitted: bool,
    error: Option<&'static str>,
}

impl<B: FormBackend> LeadFormController<B> {
    pub fn new(backend: B) -> Self {
        Self::with_form(backend, LeadForm::default())
    }

    pub fn with_form(backend: B, form: LeadForm) -> Self {
        Self {
            backend,
            form,
            submitted: false,
            error: None,
        }
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Post the lead; on success clear the form and fetch the report.
    ///
    /// A failed post keeps the entered values and sets the visible error. A
    /// failed download after an accepted lead leaves `submitted` set.
    pub async fn submit(&mut self) -> Result<DownloadedReport, FormError> {
        self.error = None;
        let request = self.form.to_request();

        if let Err(err) = self.backend.submit_lead(&request).await {
            warn!(error = %err, "lead submission failed");
            self.error = Some(FORM_ERROR_MESSAGE);
            return Err(err);
        }

        self.submitted = true;
        self.form = LeadForm::default();

        let report = self.backend.download_report().await?;
        info!(path = %report.path.display(), bytes = report.bytes, "report downloaded");
        Ok(report)
    }
}
