//! Turns arbitrary capability errors into a message that can be shown to the
//! user.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde_json::Value;

pub const GENERIC_ERROR_DETAIL: &str = "An unknown error occurred";

/// Structured error response from a backend API.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub non_field_errors: Vec<String>,
    #[serde(default)]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    pub fn with_detail(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// The most specific human readable message carried by the response.
    pub fn message(&self) -> Option<String> {
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.trim().is_empty()) {
            return Some(detail.to_string());
        }
        if let Some(first) = self.non_field_errors.first() {
            return Some(first.clone());
        }
        self.field_errors.iter().find_map(|(field, messages)| {
            messages
                .first()
                .map(|message| format!("{}: {}", field, message))
        })
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.status, self.message()) {
            (Some(status), Some(message)) => write!(f, "HTTP {}: {}", status, message),
            (Some(status), None) => write!(f, "Request failed with status {}", status),
            (None, Some(message)) => write!(f, "{}", message),
            (None, None) => write!(f, "Request failed"),
        }
    }
}

impl StdError for ApiError {}

/// Best-effort detail extraction.
///
/// Looks for an [`ApiError`] anywhere in the source chain, then for a JSON
/// error body in the message, then uses the plain message. Falls back to
/// [`GENERIC_ERROR_DETAIL`] when nothing usable is found.
pub fn error_detail(error: &(dyn StdError + 'static)) -> String {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(message) = err.downcast_ref::<ApiError>().and_then(ApiError::message) {
            return message;
        }
        current = err.source();
    }

    let message = error.to_string();
    if let Some(detail) = detail_from_json(&message) {
        return detail;
    }

    let message = message.trim();
    if message.is_empty() {
        GENERIC_ERROR_DETAIL.to_string()
    } else {
        message.to_string()
    }
}

fn detail_from_json(message: &str) -> Option<String> {
    let value: Value = serde_json::from_str(message).ok()?;
    let object = value.as_object()?;

    for key in ["detail", "message"] {
        if let Some(text) = object
            .get(key)
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
        {
            return Some(text.to_string());
        }
    }

    object
        .get("non_field_errors")?
        .as_array()?
        .iter()
        .find_map(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilityError;

    #[derive(Debug)]
    struct Wrapped(ApiError);

    impl Display for Wrapped {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "transport failure")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn detail_of(err: CapabilityError) -> String {
        error_detail(err.as_ref())
    }

    #[test]
    fn test_api_error_detail() {
        let err: CapabilityError = Box::new(ApiError::with_detail(403, "Permission denied"));
        assert_eq!(detail_of(err), "Permission denied");
    }

    #[test]
    fn test_api_error_field_errors() {
        let mut api = ApiError {
            status: Some(400),
            ..Default::default()
        };
        api.field_errors
            .insert("name".to_string(), vec!["This field is required.".to_string()]);
        assert_eq!(detail_of(Box::new(api)), "name: This field is required.");
    }

    #[test]
    fn test_api_error_in_source_chain() {
        let err: CapabilityError =
            Box::new(Wrapped(ApiError::with_detail(409, "Object is locked")));
        assert_eq!(detail_of(err), "Object is locked");
    }

    #[test]
    fn test_json_body_detail() {
        let err: CapabilityError = r#"{"detail": "Not found."}"#.into();
        assert_eq!(detail_of(err), "Not found.");

        let err: CapabilityError = r#"{"non_field_errors": ["Protected object"]}"#.into();
        assert_eq!(detail_of(err), "Protected object");
    }

    #[test]
    fn test_plain_message() {
        let err: CapabilityError = "connection reset".into();
        assert_eq!(detail_of(err), "connection reset");
    }

    #[test]
    fn test_generic_fallback() {
        let err: CapabilityError = "  ".into();
        assert_eq!(detail_of(err), GENERIC_ERROR_DETAIL);
    }

    #[test]
    fn test_api_error_without_message_uses_status() {
        let err: CapabilityError = Box::new(ApiError {
            status: Some(500),
            ..Default::default()
        });
        assert_eq!(detail_of(err), "Request failed with status 500");
    }
}
