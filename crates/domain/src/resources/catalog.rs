use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Product name.
    pub name: String,
    /// Width.
    #[serde(default)]
    pub width: Option<f64>,
    /// Height.
    #[serde(default)]
    pub height: Option<f64>,
    /// Length.
    #[serde(default)]
    pub length: Option<f64>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// An image in the public gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Server-assigned id.
    pub id: String,
    /// Display name.
    pub image_name: String,
    /// Uploader.
    pub uploaded_by: String,
    /// Upload timestamp as sent by the server.
    pub created_at: String,
    /// Presigned download URL, when the server provides one.
    #[serde(default)]
    pub url: Option<String>,
}
