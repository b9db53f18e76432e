pub mod document;
pub mod scan;

pub use document::{
    DocumentError, load_metadata_document, read_yaml, save_metadata_document, write_atomic,
};
pub use scan::FolderScanner;
