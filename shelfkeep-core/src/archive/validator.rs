//! EPUB archive integrity checks

use crate::error::EpubValidationError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// Bytes read from each entry to prove it decompresses
pub const DEFAULT_PROBE_LEN: u64 = 1024;

/// Members every EPUB container must carry, in reporting order
pub const REQUIRED_MEMBERS: [&str; 2] = ["mimetype", "META-INF/container.xml"];

type Archive = ZipArchive<BufReader<File>>;

/// Runs the four validation checks in order, stopping at the first failure
#[derive(Debug, Clone)]
pub struct ArchiveValidator {
    probe_len: u64,
}

impl ArchiveValidator {
    pub fn new() -> Self {
        Self {
            probe_len: DEFAULT_PROBE_LEN,
        }
    }

    /// Set how many bytes of each entry are read during the integrity check
    pub fn with_probe_len(mut self, probe_len: u64) -> Self {
        self.probe_len = probe_len;
        self
    }

    /// Validate the archive at `path`
    pub fn validate(&self, path: &Path) -> Result<(), EpubValidationError> {
        tracing::debug!(path = %path.display(), "validating archive");

        let result = check_exists(path)
            .and_then(|_| self.check_integrity(path))
            .and_then(|archive| check_required_members(&archive))
            .and_then(|_| check_metadata(path));

        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), kind = %e.kind(), "validation failed: {}", e);
        }
        result
    }

    /// Open the archive and read a prefix of every entry
    fn check_integrity(&self, path: &Path) -> Result<Archive, EpubValidationError> {
        let file = File::open(path).map_err(|e| {
            EpubValidationError::corrupted("Archive is damaged").with_detail(e.to_string())
        })?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            EpubValidationError::corrupted("Archive is damaged").with_detail(e.to_string())
        })?;

        let mut buf = Vec::new();
        for i in 0..archive.len() {
            let name = entry_name(&mut archive, i);
            let mut entry = archive.by_index(i).map_err(|e| {
                EpubValidationError::corrupted("Archive is damaged")
                    .with_detail(format!("cannot open entry {}: {}", name, e))
            })?;

            buf.clear();
            entry
                .by_ref()
                .take(self.probe_len)
                .read_to_end(&mut buf)
                .map_err(|e| {
                    EpubValidationError::corrupted("Archive is damaged")
                        .with_detail(format!("entry data is damaged {}: {}", name, e))
                })?;
        }

        tracing::debug!(entries = archive.len(), "archive entries readable");
        Ok(archive)
    }
}

impl Default for ArchiveValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an archive with default settings
pub fn validate_archive(path: impl AsRef<Path>) -> Result<(), EpubValidationError> {
    ArchiveValidator::new().validate(path.as_ref())
}

fn check_exists(path: &Path) -> Result<(), EpubValidationError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EpubValidationError::corrupted("File does not exist")
            .with_detail(path.display().to_string()))
    }
}

/// Name of entry `i`, read from the central directory without decompressing
fn entry_name(archive: &mut Archive, i: usize) -> String {
    archive
        .by_index_raw(i)
        .map(|entry| entry.name().to_string())
        .unwrap_or_else(|_| format!("#{}", i))
}

fn check_required_members(archive: &Archive) -> Result<(), EpubValidationError> {
    for member in REQUIRED_MEMBERS {
        let present = archive
            .file_names()
            .any(|name| name.strip_prefix("./").unwrap_or(name) == member);
        if !present {
            return Err(EpubValidationError::missing_required(member));
        }
    }
    Ok(())
}

/// The package must parse and expose a non-blank title
fn check_metadata(path: &Path) -> Result<(), EpubValidationError> {
    let doc = epub::doc::EpubDoc::new(path).map_err(|e| {
        EpubValidationError::format_error("Cannot parse EPUB package").with_detail(e.to_string())
    })?;

    let has_title = doc
        .metadata
        .iter()
        .any(|item| item.property == "title" && !item.value.trim().is_empty());

    if has_title {
        Ok(())
    } else {
        Err(EpubValidationError::metadata_missing("Missing book title")
            .with_detail("no title found in package metadata"))
    }
}
