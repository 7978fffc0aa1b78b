//! Package metadata reader

use crate::error::{ParseError, Result};
use epub::doc::EpubDoc;
use serde::Serialize;
use std::path::Path;

use super::isbn::isbn_in;

/// The subset of package metadata the housekeeping commands care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    pub title: String,
    pub creators: Vec<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub identifiers: Vec<String>,
    /// First identifier that carries an ISBN-13
    pub isbn: Option<String>,
}

/// Read metadata from the EPUB at `path`
pub fn read_metadata(path: impl AsRef<Path>) -> Result<BookMetadata> {
    let doc = EpubDoc::new(path.as_ref()).map_err(|e| ParseError::InvalidEpub(e.to_string()))?;

    let get_meta_all = |key: &str| -> Vec<String> {
        doc.metadata
            .iter()
            .filter(|item| item.property == key)
            .map(|item| item.value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    };
    let get_meta = |key: &str| -> Option<String> { get_meta_all(key).into_iter().next() };

    let title = get_meta("title").ok_or_else(|| ParseError::MissingField("title".to_string()))?;
    let identifiers = get_meta_all("identifier");
    let isbn = identifiers.iter().find_map(|id| isbn_in(id));

    Ok(BookMetadata {
        title,
        creators: get_meta_all("creator"),
        language: get_meta("language"),
        publisher: get_meta("publisher"),
        description: get_meta("description"),
        date: get_meta("date"),
        identifiers,
        isbn,
    })
}
