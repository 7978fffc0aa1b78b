//! EPUB container inspection: integrity validation, metadata and ISBN lookup

mod isbn;
mod metadata;
mod validator;

pub use isbn::{find_isbn, isbn_in};
pub use metadata::{read_metadata, BookMetadata};
pub use validator::{validate_archive, ArchiveValidator, DEFAULT_PROBE_LEN, REQUIRED_MEMBERS};
