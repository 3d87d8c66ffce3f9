//! Multipart bodies for uploads.

use std::path::Path;

use portal_application::ports::HttpClientError;
use portal_domain::MultipartField;
use reqwest::multipart::{Form, Part};

/// Reads `path` into a file part named `name`, with the content type
/// guessed from the extension.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub async fn attach_file(name: &str, path: &Path) -> std::io::Result<MultipartField> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    Ok(MultipartField::File {
        name: name.to_string(),
        content_type: Some(guess_mime(&file_name).to_string()),
        file_name,
        bytes,
    })
}

fn guess_mime(file_name: &str) -> mime::Mime {
    mime_guess::from_path(file_name).first_or(mime::APPLICATION_OCTET_STREAM)
}

/// Builds the reqwest form for `fields`, in order.
pub(crate) fn form(fields: &[MultipartField]) -> Result<Form, HttpClientError> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let mime = match content_type {
                    Some(declared) => declared
                        .parse::<mime::Mime>()
                        .map_err(|e| HttpClientError::InvalidBody(format!("{declared}: {e}")))?,
                    None => guess_mime(file_name),
                };
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime.as_ref())
                    .map_err(|e| HttpClientError::InvalidBody(format!("invalid MIME type: {e}")))?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_guess_mime_by_extension() {
        assert_eq!(guess_mime("minutes.pdf"), mime::APPLICATION_PDF);
        assert_eq!(guess_mime("harvest.JPG"), mime::IMAGE_JPEG);
        assert_eq!(guess_mime("members"), mime::APPLICATION_OCTET_STREAM);
    }

    #[tokio::test]
    async fn test_attach_file_reads_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("members.xlsx");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let field = attach_file("file", &path).await.unwrap();

        let MultipartField::File {
            name,
            file_name,
            content_type,
            bytes,
        } = field
        else {
            panic!("expected a file part");
        };
        assert_eq!(name, "file");
        assert_eq!(file_name, "members.xlsx");
        assert_eq!(
            content_type.as_deref(),
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        );
        assert_eq!(bytes, b"PK\x03\x04".to_vec());
    }

    #[test]
    fn test_form_rejects_bad_declared_type() {
        let fields = [MultipartField::File {
            name: "file".to_string(),
            file_name: "a.png".to_string(),
            content_type: Some("not a mime".to_string()),
            bytes: Vec::new(),
        }];
        assert!(matches!(form(&fields), Err(HttpClientError::InvalidBody(_))));
    }

    #[test]
    fn test_form_accepts_text_and_files() {
        let fields = [
            MultipartField::text("file_name", "Minutes 2024"),
            MultipartField::text("allowed_to", "u1"),
            MultipartField::file("file", "minutes.pdf", b"%PDF".to_vec()),
        ];
        let form = form(&fields).unwrap();
        assert!(form.boundary().len() > 8);
    }
}
