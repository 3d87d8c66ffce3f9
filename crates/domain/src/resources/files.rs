//! Document repository metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::MultipartField;
use crate::response::ApiResponse;

/// Document repository a file belongs to. Access to each is role-gated
/// on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Statutes and rules.
    GoverningDocuments,
    /// Blank forms.
    Forms,
    /// Meeting minutes.
    Minutes,
    /// Meeting transcripts.
    Transcripts,
    /// Accounting reports.
    Accounting,
    /// Documents shared with specific users.
    PrivateDocuments,
    /// Everything else.
    Others,
}

impl FileType {
    /// Every repository, in display order.
    pub const ALL: [Self; 7] = [
        Self::GoverningDocuments,
        Self::Forms,
        Self::Minutes,
        Self::Transcripts,
        Self::Accounting,
        Self::PrivateDocuments,
        Self::Others,
    ];

    /// Wire name used in the `file_type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoverningDocuments => "governing_documents",
            Self::Forms => "forms",
            Self::Minutes => "minutes",
            Self::Transcripts => "transcripts",
            Self::Accounting => "accounting",
            Self::PrivateDocuments => "private_documents",
            Self::Others => "others",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownFileType(s.to_string()))
    }
}

/// Metadata of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Server-assigned id.
    #[serde(default)]
    pub id: Option<String>,
    /// Original file name.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Repository.
    pub file_type: FileType,
    /// Uploader.
    #[serde(default)]
    pub uploaded_by: Option<String>,
    /// Upload timestamp as sent by the server.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A document to upload into one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Display name stored with the document.
    pub file_name: String,
    /// Target repository.
    pub file_type: FileType,
    /// User ids allowed to read a private document.
    pub allowed_to: Vec<String>,
    /// The file itself.
    pub file: MultipartField,
}

impl FileUpload {
    /// Multipart parts in the order the upload form sends them.
    ///
    /// # Errors
    ///
    /// Private documents must name at least one reader, and the name must
    /// not be blank.
    pub fn into_fields(self) -> DomainResult<Vec<MultipartField>> {
        if self.file_name.trim().is_empty() {
            return Err(DomainError::InvalidUpload("file name is empty".to_string()));
        }
        if self.file_type == FileType::PrivateDocuments && self.allowed_to.is_empty() {
            return Err(DomainError::InvalidUpload(
                "private documents need at least one reader".to_string(),
            ));
        }

        let mut fields = vec![
            MultipartField::text("file_name", self.file_name),
            MultipartField::text("file_type", self.file_type.as_str()),
        ];
        fields.extend(self.allowed_to.into_iter().map(|id| MultipartField::text("allowed_to", id)));
        fields.push(self.file.renamed("file"));
        Ok(fields)
    }
}

/// A downloaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    /// Name suggested by the server, else the stored name, else `download`.
    pub file_name: String,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FileDownload {
    /// Takes the body of a successful `files/download` response.
    #[must_use]
    pub fn from_response(metadata: &FileMetadata, response: ApiResponse) -> Self {
        let file_name = response
            .header("Content-Disposition")
            .and_then(disposition_file_name)
            .or_else(|| metadata.file_name.clone())
            .unwrap_or_else(|| "download".to_string());
        Self {
            file_name,
            content_type: response.header("Content-Type").map(str::to_string),
            bytes: response.body,
        }
    }
}

/// File name from a `Content-Disposition` value; `filename*` (RFC 5987)
/// wins over `filename`.
fn disposition_file_name(value: &str) -> Option<String> {
    let params: Vec<(&str, &str)> = value
        .split(';')
        .filter_map(|param| param.split_once('='))
        .map(|(key, raw)| (key.trim(), raw.trim().trim_matches('"')))
        .collect();

    let extended = params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("filename*"))
        .map(|(_, raw)| raw.split_once("''").map_or(*raw, |(_, encoded)| encoded));
    let plain = params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("filename"))
        .map(|(_, raw)| *raw);

    let raw = extended.or(plain).filter(|raw| !raw.is_empty())?;
    Some(urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |name| name.into_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_type_names() {
        for file_type in FileType::ALL {
            assert_eq!(file_type.as_str().parse::<FileType>(), Ok(file_type));
        }
        assert!("secret".parse::<FileType>().is_err());
    }

    fn upload(file_type: FileType, allowed_to: &[&str]) -> FileUpload {
        FileUpload {
            file_name: "Minutes March".to_string(),
            file_type,
            allowed_to: allowed_to.iter().map(ToString::to_string).collect(),
            file: MultipartField::file("attachment", "march.pdf", b"%PDF".to_vec()),
        }
    }

    #[test]
    fn test_upload_fields_follow_form_order() {
        let fields = upload(FileType::PrivateDocuments, &["u1", "u2"]).into_fields().unwrap();
        let names: Vec<&str> = fields.iter().map(MultipartField::name).collect();
        assert_eq!(names, vec!["file_name", "file_type", "allowed_to", "allowed_to", "file"]);
        assert_eq!(fields[1], MultipartField::text("file_type", "private_documents"));
    }

    #[test]
    fn test_private_upload_needs_reader() {
        assert!(matches!(
            upload(FileType::PrivateDocuments, &[]).into_fields(),
            Err(DomainError::InvalidUpload(_))
        ));
        assert!(upload(FileType::Minutes, &[]).into_fields().is_ok());
    }

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(
            disposition_file_name(r#"attachment; filename="report.pdf""#).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            disposition_file_name("attachment; filename=x.pdf; filename*=UTF-8''%D0%BF%D1%80.pdf").as_deref(),
            Some("пр.pdf")
        );
        assert_eq!(disposition_file_name("inline"), None);
    }

    #[test]
    fn test_download_falls_back_to_stored_name() {
        let metadata = FileMetadata {
            id: Some("f1".to_string()),
            file_name: Some("statute.pdf".to_string()),
            file_type: FileType::GoverningDocuments,
            uploaded_by: None,
            created_at: None,
        };
        let download = FileDownload::from_response(&metadata, ApiResponse::new(200, vec![1, 2, 3]));
        assert_eq!(download.file_name, "statute.pdf");
        assert_eq!(download.bytes, vec![1, 2, 3]);
        assert_eq!(download.content_type, None);
    }
}
