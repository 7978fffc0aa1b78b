//! ISBN discovery in book content
//!
//! Publishers often print the ISBN on a copyright page but leave it out of
//! the package metadata, so the content documents are scanned as well.

use crate::error::{ParseError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use zip::ZipArchive;

static ISBN13: Lazy<Regex> = Lazy::new(|| Regex::new(r"97[89][0-9]{10}").unwrap());

/// Extract an ISBN-13 from free text, ignoring hyphens
pub fn isbn_in(text: &str) -> Option<String> {
    let compact = text.replace('-', "");
    ISBN13.find(&compact).map(|m| m.as_str().to_string())
}

/// Search every non-package entry of the archive for a line mentioning an ISBN
pub fn find_isbn(path: impl AsRef<Path>) -> Result<Option<String>> {
    let file = File::open(path.as_ref())?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ParseError::InvalidArchive(e.to_string()))?;

    for i in 0..archive.len() {
        let entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry #{}: {}", i, e);
                continue;
            }
        };
        if entry.name().ends_with(".opf") {
            continue;
        }

        let name = entry.name().to_string();
        if let Some(isbn) = scan_lines(BufReader::new(entry)) {
            tracing::debug!(entry = %name, isbn = %isbn, "found ISBN in content");
            return Ok(Some(isbn));
        }
    }

    Ok(None)
}

fn scan_lines(mut reader: impl BufRead) -> Option<String> {
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let text = String::from_utf8_lossy(&line);
        if !text.to_lowercase().contains("isbn") {
            continue;
        }
        if let Some(isbn) = isbn_in(&text) {
            return Some(isbn);
        }
    }
}
