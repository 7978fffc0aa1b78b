//! Error types for Shelfkeep Core

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Top-level error type for all Shelfkeep operations
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("Validation error: {0}")]
    Validation(#[from] EpubValidationError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while reading metadata out of a package
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Category of an archive validation failure.
///
/// Callers route remediation on this: `Corrupted` and `MissingRequired`
/// files are candidates for quarantine, the other two usually are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Archive unreadable or an entry fails to decompress
    Corrupted,
    /// A mandatory member is absent
    MissingRequired,
    /// The container cannot be parsed as an e-book package
    FormatError,
    /// The package parses but has no title
    MetadataMissing,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corrupted => "corrupted",
            Self::MissingRequired => "missing_required",
            Self::FormatError => "format_error",
            Self::MetadataMissing => "metadata_missing",
        }
    }

    /// Whether the file is structurally broken, as opposed to merely lacking metadata
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Corrupted | Self::MissingRequired)
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a failed archive validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}{}", detail_suffix(.detail))]
pub struct EpubValidationError {
    kind: ValidationErrorKind,
    message: String,
    detail: Option<String>,
}

impl EpubValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a detail string (entry name, missing member, parser message)
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::Corrupted, message)
    }

    pub fn missing_required(member: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MissingRequired, "Missing required member").with_detail(member)
    }

    pub fn format_error(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::FormatError, message)
    }

    pub fn metadata_missing(message: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::MetadataMissing, message)
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {}", detail),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_detail() {
        let err = EpubValidationError::corrupted("Archive is damaged").with_detail("unreadable");
        assert_eq!(err.to_string(), "Archive is damaged: unreadable");
    }

    #[test]
    fn test_display_without_detail() {
        let err = EpubValidationError::new(ValidationErrorKind::MissingRequired, "Member missing");
        assert_eq!(err.to_string(), "Member missing");
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_display_ignores_empty_detail() {
        let err = EpubValidationError::format_error("Cannot parse EPUB package").with_detail("");
        assert_eq!(err.to_string(), "Cannot parse EPUB package");
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(EpubValidationError::corrupted("Archive is damaged").with_detail("crc"));
        assert_eq!(err.to_string(), "Archive is damaged: crc");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_missing_required_carries_member() {
        let err = EpubValidationError::missing_required("mimetype");
        assert_eq!(err.kind(), ValidationErrorKind::MissingRequired);
        assert_eq!(err.detail(), Some("mimetype"));
    }

    #[test]
    fn test_structural_kinds() {
        assert!(ValidationErrorKind::Corrupted.is_structural());
        assert!(ValidationErrorKind::MissingRequired.is_structural());
        assert!(!ValidationErrorKind::FormatError.is_structural());
        assert!(!ValidationErrorKind::MetadataMissing.is_structural());
    }

    #[test]
    fn test_converts_into_top_level_error() {
        let err: ShelfError = EpubValidationError::format_error("bad package").into();
        assert!(matches!(err, ShelfError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: bad package");
    }
}
