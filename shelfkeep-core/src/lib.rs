//! Shelfkeep Core Library
//!
//! Housekeeping primitives for a personal e-book library: a title sanitizer
//! that strips promotional bracketed annotations while keeping volume and
//! edition markers, and an EPUB archive validator that runs before any
//! metadata tool touches a file.

pub mod archive;
pub mod error;
pub mod title;

pub use archive::{find_isbn, read_metadata, validate_archive, ArchiveValidator, BookMetadata};
pub use error::{EpubValidationError, ParseError, Result, ShelfError, ValidationErrorKind};
pub use title::{clean_title_strict, clean_title_structural, sanitize_with, SanitizeMode};

/// Clean a title with the default (structural) mode. Never fails; at worst
/// the input comes back unchanged.
pub fn sanitize(title: &str) -> String {
    title::clean_title_structural(title)
}
