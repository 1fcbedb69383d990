use std::collections::BTreeMap;

use validator::ValidationErrors;

/// Client-side fault in a lead submission; always maps to 400.
#[derive(Debug, thiserror::Error)]
pub enum LeadValidationError {
    #[error("Name and a valid email are required")]
    Fields(#[from] ValidationErrors),
    #[error("Request body must be a JSON lead submission")]
    Body(String),
}

impl LeadValidationError {
    /// Messages keyed by offending field, sorted for stable responses.
    pub fn details(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            LeadValidationError::Fields(errors) => errors
                .field_errors()
                .into_iter()
                .map(|(field, failures)| {
                    let messages = failures
                        .iter()
                        .map(|failure| match &failure.message {
                            Some(message) => message.to_string(),
                            None => failure.code.to_string(),
                        })
                        .collect();
                    (field.to_string(), messages)
                })
                .collect(),
            LeadValidationError::Body(reason) => {
                BTreeMap::from([("body".to_string(), vec![reason.clone()])])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_errors_report_under_body_key() {
        let error = LeadValidationError::Body("expected value at line 1 column 1".to_string());
        let details = error.details();
        assert_eq!(details.len(), 1);
        assert_eq!(
            details["body"],
            vec!["expected value at line 1 column 1".to_string()]
        );
    }

    #[test]
    fn field_errors_fall_back_to_code() {
        let mut errors = ValidationErrors::new();
        errors.add("email", validator::ValidationError::new("email"));
        let details = LeadValidationError::from(errors).details();
        assert_eq!(details["email"], vec!["email".to_string()]);
    }
}
