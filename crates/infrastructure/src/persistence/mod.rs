//! Token persistence.

mod file_system;
mod memory;
mod token_file;

pub use file_system::TokioFileSystem;
pub use memory::InMemoryTokenStorage;
pub use token_file::FileTokenStorage;
