use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::LeadValidationError;

/// Rendered in emails when an optional field was left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// JSON body posted by the report download form.
///
/// Every field defaults so that a missing `name` or `email` surfaces as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

#[derive(Debug, Validate)]
struct RequiredContact {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    name: String,
    #[validate(email(message = "Invalid email address"))]
    email: String,
}

impl LeadRequest {
    /// Trim, validate the required contact fields, and classify the optional codes.
    pub fn validate(self) -> Result<LeadSubmission, LeadValidationError> {
        let contact = RequiredContact {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        };
        contact.validate()?;
        let RequiredContact { name, email } = contact;

        Ok(LeadSubmission {
            name,
            email,
            phone: non_blank(self.phone),
            farm_type: non_blank(self.farm_type).map(|code| FarmType::parse(&code)),
            region: non_blank(self.region).map(|code| Region::parse(&code)),
            timeline: non_blank(self.timeline).map(|code| Timeline::parse(&code)),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// A lead that passed validation. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub farm_type: Option<FarmType>,
    pub region: Option<Region>,
    pub timeline: Option<Timeline>,
}

impl LeadSubmission {
    pub fn phone_label(&self) -> &str {
        self.phone.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    pub fn farm_type_label(&self) -> &str {
        self.farm_type
            .as_ref()
            .map(FarmType::label)
            .unwrap_or(NOT_SPECIFIED)
    }

    pub fn region_label(&self) -> &str {
        self.region
            .as_ref()
            .map(Region::label)
            .unwrap_or(NOT_SPECIFIED)
    }

    pub fn timeline_label(&self) -> &str {
        self.timeline
            .as_ref()
            .map(Timeline::label)
            .unwrap_or(NOT_SPECIFIED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmType {
    Dairy,
    SheepBeef,
    Other(String),
}

impl FarmType {
    pub fn parse(code: &str) -> Self {
        match code {
            "dairy" => Self::Dairy,
            "sheepBeef" => Self::SheepBeef,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Dairy => "dairy",
            Self::SheepBeef => "sheepBeef",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Dairy => "Dairy",
            Self::SheepBeef => "Sheep/Beef",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    Southland,
    Otago,
    Canterbury,
    WestCoast,
    Other(String),
}

impl Region {
    pub fn parse(code: &str) -> Self {
        match code {
            "Southland" => Self::Southland,
            "Otago" => Self::Otago,
            "Canterbury" => Self::Canterbury,
            "West Coast" => Self::WestCoast,
            other => Self::Other(other.to_string()),
        }
    }

    /// Region codes double as their display labels.
    pub fn label(&self) -> &str {
        match self {
            Self::Southland => "Southland",
            Self::Otago => "Otago",
            Self::Canterbury => "Canterbury",
            Self::WestCoast => "West Coast",
            Self::Other(raw) => raw,
        }
    }
}

/// Self-reported installation horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timeline {
    NextMonth,
    NextThreeMonths,
    NextSixMonths,
    NextYear,
    Interested,
    Other(String),
}

impl Timeline {
    pub fn parse(code: &str) -> Self {
        match code {
            "next-month" => Self::NextMonth,
            "next-3-months" => Self::NextThreeMonths,
            "next-6-months" => Self::NextSixMonths,
            "next-year" => Self::NextYear,
            "interested" => Self::Interested,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::NextMonth => "next-month",
            Self::NextThreeMonths => "next-3-months",
            Self::NextSixMonths => "next-6-months",
            Self::NextYear => "next-year",
            Self::Interested => "interested",
            Self::Other(raw) => raw,
        }
    }

    /// Unrecognized codes render verbatim.
    pub fn label(&self) -> &str {
        match self {
            Self::NextMonth => "Within the next month",
            Self::NextThreeMonths => "Within 3 months",
            Self::NextSixMonths => "Within 6 months",
            Self::NextYear => "Within the next year",
            Self::Interested => "Just interested for now",
            Self::Other(raw) => raw,
        }
    }
}
