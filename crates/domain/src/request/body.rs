//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON document
    Json(Value),
    /// `application/x-www-form-urlencoded` fields, in order
    Form(Vec<(String, String)>),
    /// `multipart/form-data` parts, in order. The transport picks the
    /// boundary, so there is no fixed content type.
    Multipart(Vec<MultipartField>),
}

/// One part of a multipart body. File contents are held in memory so a
/// request can be sent again after a token refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MultipartField {
    /// Plain text value.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// Attached file.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        file_name: String,
        /// MIME type; guessed from `file_name` when absent.
        #[serde(default)]
        content_type: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl MultipartField {
    /// Text part.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// File part with an inferred content type.
    #[must_use]
    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Field name of the part.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Renames the part, keeping its content.
    #[must_use]
    pub fn renamed(mut self, field: impl Into<String>) -> Self {
        match &mut self {
            Self::Text { name, .. } | Self::File { name, .. } => *name = field.into(),
        }
        self
    }
}

impl RequestBody {
    /// Creates a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize>(value: &T) -> DomainResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Creates a form body.
    #[must_use]
    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns whether there is no body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None | Self::Multipart(_) => None,
            Self::Json(_) => Some("application/json"),
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_types() {
        assert_eq!(RequestBody::None.content_type(), None);
        assert_eq!(
            RequestBody::Json(Value::Null).content_type(),
            Some("application/json")
        );
        assert_eq!(
            RequestBody::form([("username", "a")]).content_type(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            RequestBody::Multipart(vec![MultipartField::text("file_name", "a")]).content_type(),
            None
        );
    }

    #[test]
    fn test_renamed_part_keeps_content() {
        let part = MultipartField::file("upload", "minutes.pdf", b"%PDF".to_vec()).renamed("file");
        assert_eq!(part.name(), "file");
        assert_eq!(
            part,
            MultipartField::File {
                name: "file".to_string(),
                file_name: "minutes.pdf".to_string(),
                content_type: None,
                bytes: b"%PDF".to_vec(),
            }
        );
    }

    #[test]
    fn test_json_from_struct() {
        #[derive(Serialize)]
        struct Payload {
            title: &'static str,
        }

        let body = RequestBody::json(&Payload { title: "Hi" });
        assert_eq!(body, Ok(RequestBody::Json(serde_json::json!({ "title": "Hi" }))));
    }
}
