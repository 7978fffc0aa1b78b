//! File discovery and remediation helpers shared by the batch commands

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Give up looking for a free `name(n).ext` after this many attempts
const MAX_RENAME_ATTEMPTS: usize = 10_000;

pub fn is_epub(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("epub"))
        .unwrap_or(false)
}

/// Collect EPUB files under `input`. A single file is accepted as-is if it
/// has an `.epub` extension.
pub fn collect_epubs(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let input_path = Path::new(input);

    if !input_path.exists() {
        bail!("Path does not exist: {}", input);
    }

    if input_path.is_file() {
        if !is_epub(input_path) {
            bail!("Not an EPUB file: {}", input);
        }
        return Ok(vec![input_path.to_path_buf()]);
    }

    walk_files(input_path, recursive, is_epub)
}

/// Files in `dir` accepted by `keep`, sorted by path
pub fn walk_files(
    dir: &Path,
    recursive: bool,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).max_depth(max_depth) {
        let entry = entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
        if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    Ok(files)
}

/// Move `src` into `dst_dir`, appending `(1)`, `(2)`, ... to the stem if the
/// name is taken. Returns the final path.
pub fn move_with_conflict_handling(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    if dst_dir.exists() && !dst_dir.is_dir() {
        bail!("{} exists but is not a directory", dst_dir.display());
    }
    fs::create_dir_all(dst_dir)
        .with_context(|| format!("Failed to create directory {}", dst_dir.display()))?;

    let target = free_target(src, dst_dir)?;
    relocate(src, &target)?;
    Ok(target)
}

/// Rename `src` to `target`, falling back to copy and remove
pub fn relocate(src: &Path, target: &Path) -> Result<()> {
    if fs::rename(src, target).is_err() {
        // Rename fails across filesystems
        fs::copy(src, target)
            .with_context(|| format!("Failed to copy {} to {}", src.display(), target.display()))?;
        fs::remove_file(src).with_context(|| format!("Failed to remove {}", src.display()))?;
    }
    Ok(())
}

/// Where `src` would land in `dst_dir`
pub fn free_target(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .context("Could not determine file name")?
        .to_string_lossy()
        .into_owned();

    let target = dst_dir.join(&file_name);
    if !target.exists() {
        return Ok(target);
    }

    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.clone());
    let ext = src
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..MAX_RENAME_ATTEMPTS)
        .map(|i| dst_dir.join(format!("{}({}){}", stem, i, ext)))
        .find(|candidate| !candidate.exists())
        .with_context(|| {
            format!(
                "No free file name for {} after {} attempts",
                file_name, MAX_RENAME_ATTEMPTS
            )
        })
}

/// Delete a file, asking on stdin first unless `confirm` is false. The prompt
/// goes to stderr so stdout stays clean for `--json`.
pub fn delete_file(path: &Path, confirm: bool) -> Result<bool> {
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }

    if confirm {
        eprint!("Delete {}? (y/N): ", path.display());
        io::stderr().flush()?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        let answer = answer.trim().to_lowercase();
        if answer != "y" && answer != "yes" {
            return Ok(false);
        }
    }

    fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))?;
    Ok(true)
}
