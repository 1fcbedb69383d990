use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tera::Tera;

use super::domain::LeadSubmission;

/// A Tera template with its registered name and source.
///
/// Names end in `.html` so Tera escapes every interpolated value.
pub trait EmailTemplate: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

macro_rules! email_templates {
    ($( $ident:ident ( $path:literal ), )*) => {
        $(
            impl EmailTemplate for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../../templates/", $path));
            }
        )*

        const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

email_templates! {
    ConfirmationTemplate("lead_confirmation.html"),
    NotificationTemplate("lead_notification.html"),
}

/// Body of the thank-you email sent to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationTemplate {
    pub name: String,
    pub farm_type: String,
    pub region: String,
    pub calculator_url: String,
}

/// Body of the internal new-lead email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationTemplate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub farm_type: String,
    pub region: String,
    pub timeline: String,
    pub received_at: String,
    pub calculator_url: String,
}

impl ConfirmationTemplate {
    pub fn for_lead(lead: &LeadSubmission, calculator_url: &str) -> Self {
        Self {
            name: lead.name.clone(),
            farm_type: lead.farm_type_label().to_string(),
            region: lead.region_label().to_string(),
            calculator_url: calculator_url.to_string(),
        }
    }

    pub fn subject(&self) -> String {
        "Your Powering Forwards Report - Farm Energy Analysis".to_string()
    }
}

impl NotificationTemplate {
    pub fn for_lead(
        lead: &LeadSubmission,
        calculator_url: &str,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone_label().to_string(),
            farm_type: lead.farm_type_label().to_string(),
            region: lead.region_label().to_string(),
            timeline: lead.timeline_label().to_string(),
            received_at: received_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            calculator_url: calculator_url.to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "New Lead: {} ({} farm, {})",
            self.name, self.farm_type, self.region
        )
    }
}

/// Preloaded template set shared across requests.
#[derive(Debug, Clone)]
pub struct LeadTemplates {
    tera: Arc<Tera>,
}

impl LeadTemplates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn render<T: EmailTemplate>(&self, template: &T) -> Result<String, tera::Error> {
        let context = tera::Context::from_serialize(template)?;
        self.tera.render(T::NAME, &context)
    }
}
