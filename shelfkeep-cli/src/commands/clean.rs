//! Clean command implementation
//!
//! Validates each EPUB, reads its title, and hands the sanitized title to an
//! external metadata tool (calibre's `ebook-meta` by default).

use super::files::collect_epubs;
use super::progress_bar;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use shelfkeep_core::{read_metadata, sanitize_with, validate_archive, SanitizeMode};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct CleanOptions {
    pub recursive: bool,
    pub mode: SanitizeMode,
    pub dry_run: bool,
    pub skip_errors: bool,
    pub ebook_meta: String,
    pub jobs: usize,
}

/// Per-file result of the parallel planning phase
enum Plan {
    Rename { old: String, new: String },
    Unchanged,
    Skipped(String),
}

#[derive(Default)]
struct CleanSummary {
    updated: usize,
    unchanged: usize,
    skipped: usize,
    failed: usize,
}

/// Sanitize the titles of EPUB files in place
pub fn clean(input: &str, opts: CleanOptions) -> Result<()> {
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

    let plans: Vec<(PathBuf, Plan)> = files
        .par_iter()
        .map(|path| {
            let plan = plan_file(path, opts.mode);
            pb.inc(1);
            (path.clone(), plan)
        })
        .collect();

    pb.finish_and_clear();

    let mut summary = CleanSummary::default();
    for (path, plan) in plans {
        match plan {
            Plan::Unchanged => summary.unchanged += 1,
            Plan::Skipped(reason) => {
                summary.skipped += 1;
                println!("SKIP  {}", path.display());
                println!("      {}", reason);
            }
            Plan::Rename { old, new } => {
                println!("{}", path.display());
                println!("      old: {}", old);
                println!("      new: {}", new);

                if opts.dry_run {
                    summary.updated += 1;
                    continue;
                }

                match write_title(&opts.ebook_meta, &path, &new) {
                    Ok(()) => {
                        tracing::info!("Updated title of {:?}", path);
                        summary.updated += 1;
                    }
                    Err(e) => {
                        tracing::error!("Failed to update {:?}: {:#}", path, e);
                        println!("      failed: {:#}", e);
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    let verb = if opts.dry_run { "To update" } else { "Updated" };
    println!("\nClean complete:");
    println!("  {}: {}", verb, summary.updated);
    println!("  Unchanged: {}", summary.unchanged);
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

fn plan_file(path: &Path, mode: SanitizeMode) -> Plan {
    if let Err(e) = validate_archive(path) {
        return Plan::Skipped(format!("[{}] {}", e.kind(), e));
    }

    let metadata = match read_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => return Plan::Skipped(e.to_string()),
    };

    let new = sanitize_with(&metadata.title, mode);
    if new == metadata.title {
        tracing::debug!("Title of {:?} already clean", path);
        Plan::Unchanged
    } else {
        Plan::Rename {
            old: metadata.title,
            new,
        }
    }
}

/// Write a new title with the external metadata tool
fn write_title(tool: &str, path: &Path, title: &str) -> Result<()> {
    let output = Command::new(tool)
        .arg(path)
        .arg("-t")
        .arg(title)
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
