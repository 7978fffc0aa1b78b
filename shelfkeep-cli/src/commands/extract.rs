//! Extract command implementation
//!
//! Finds the ISBN printed in each book's content and writes it into the
//! package metadata with the external metadata tool.

use super::files::collect_epubs;
use super::progress_bar;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use shelfkeep_core::find_isbn;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct ExtractOptions {
    pub recursive: bool,
    pub dry_run: bool,
    pub skip_errors: bool,
    pub ebook_meta: String,
    pub jobs: usize,
}

#[derive(Default)]
struct ExtractSummary {
    written: usize,
    not_found: usize,
    skipped: usize,
    failed: usize,
}

/// Write ISBNs found in book content back into the metadata
pub fn extract(input: &str, opts: ExtractOptions) -> Result<()> {
    let files = collect_epubs(input, opts.recursive)?;

    if files.is_empty() {
        println!("No EPUB files found in {}", input);
        return Ok(());
    }

    println!("Found {} EPUB files", files.len());

    let pb = progress_bar(files.len(), false);

    rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs)
        .build_global()
        .ok(); // Ignore if already configured

    let found: Vec<(PathBuf, Result<Option<String>, String>)> = files
        .par_iter()
        .map(|path| {
            let isbn = find_isbn(path).map_err(|e| e.to_string());
            pb.inc(1);
            (path.clone(), isbn)
        })
        .collect();

    pb.finish_and_clear();

    let mut summary = ExtractSummary::default();
    for (path, isbn) in found {
        let isbn = match isbn {
            Ok(Some(isbn)) => isbn,
            Ok(None) => {
                tracing::debug!("No ISBN in {:?}", path);
                summary.not_found += 1;
                continue;
            }
            Err(reason) => {
                summary.skipped += 1;
                println!("SKIP  {}", path.display());
                println!("      {}", reason);
                continue;
            }
        };

        println!("{}", path.display());
        println!("      isbn: {}", isbn);

        if opts.dry_run {
            summary.written += 1;
            continue;
        }

        match write_isbn(&opts.ebook_meta, &path, &isbn) {
            Ok(()) => {
                tracing::info!("Wrote ISBN {} to {:?}", isbn, path);
                summary.written += 1;
            }
            Err(e) => {
                tracing::error!("Failed to update {:?}: {:#}", path, e);
                println!("      failed: {:#}", e);
                summary.failed += 1;
            }
        }
    }

    let verb = if opts.dry_run { "To write" } else { "Written" };
    println!("\nExtract complete:");
    println!("  {}: {}", verb, summary.written);
    println!("  No ISBN:   {}", summary.not_found);
    println!("  Skipped:   {}", summary.skipped);
    println!("  Failed:    {}", summary.failed);

    if summary.failed > 0 {
        bail!("Failed to update {} files", summary.failed);
    }
    if summary.skipped > 0 && !opts.skip_errors {
        bail!(
            "{} files could not be read (use --skip-errors to ignore)",
            summary.skipped
        );
    }

    Ok(())
}

fn write_isbn(tool: &str, path: &Path, isbn: &str) -> Result<()> {
    let output = Command::new(tool)
        .arg(path)
        .arg(format!("--isbn={}", isbn))
        .output()
        .with_context(|| format!("Failed to run {}", tool))?;

    if !output.status.success() {
        bail!(
            "{} exited with {}: {}",
            tool,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(())
}
