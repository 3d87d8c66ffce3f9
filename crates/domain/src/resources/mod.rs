//! Resource models exchanged with the portal endpoints.

mod catalog;
mod files;
mod news;
mod people;

pub use catalog::{GalleryImage, Product};
pub use files::{FileDownload, FileMetadata, FileType, FileUpload};
pub use news::NewsItem;
pub use people::{Member, MemberFilter, User};
