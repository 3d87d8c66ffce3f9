//! Structured error bodies returned by the portal API.
//!
//! The backend reports errors as `{"detail": "..."}` for plain HTTP errors
//! and `{"detail": [{"msg": "...", ...}]}` for validation failures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One validation failure entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationItem {
    /// Bare message.
    Text(String),
    /// Object with `msg` or `message`, plus location data we keep as-is.
    Object {
        /// Validation message.
        #[serde(default)]
        msg: Option<String>,
        /// Alternative message field.
        #[serde(default)]
        message: Option<String>,
        /// Remaining fields (`loc`, `type`, ...).
        #[serde(flatten)]
        rest: Map<String, Value>,
    },
}

impl ValidationItem {
    fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Object { msg: Some(msg), .. } | Self::Object { message: Some(msg), .. } => {
                msg.clone()
            }
            Self::Object { rest, .. } => Value::Object(rest.clone()).to_string(),
        }
    }
}

/// The `detail` field of an error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Single message.
    Text(String),
    /// Validation failures.
    Items(Vec<ValidationItem>),
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Detail, either a message or a list of validation failures.
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
    /// Fallback message field.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Creates a body with a single detail message.
    #[must_use]
    pub fn text(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(ErrorDetail::Text(detail.into())),
            message: None,
        }
    }

    /// Human-readable message for display.
    #[must_use]
    pub fn message(&self) -> String {
        match (&self.detail, &self.message) {
            (Some(ErrorDetail::Text(text)), _) => text.clone(),
            (Some(ErrorDetail::Items(items)), _) if !items.is_empty() => items
                .iter()
                .map(ValidationItem::text)
                .collect::<Vec<_>>()
                .join("; "),
            (_, Some(message)) => message.clone(),
            _ => "unknown error".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> ApiErrorBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_text_detail() {
        assert_eq!(parse(r#"{"detail":"Invalid credentials"}"#).message(), "Invalid credentials");
    }

    #[test]
    fn test_validation_items() {
        let body = parse(
            r#"{"detail":[
                {"loc":["body","email"],"msg":"field required","type":"missing"},
                {"message":"too short"},
                "plain"
            ]}"#,
        );
        assert_eq!(body.message(), "field required; too short; plain");
    }

    #[test]
    fn test_message_fallback() {
        assert_eq!(parse(r#"{"message":"API error"}"#).message(), "API error");
        assert_eq!(parse("{}").message(), "unknown error");
    }
}
