//! Check command implementation

use super::files::{collect_epubs, delete_file, free_target, move_with_conflict_handling};
use super::progress_bar;
use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use shelfkeep_core::{validate_archive, EpubValidationError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What to do with structurally broken files
pub enum Remedy {
    None,
    MoveTo(PathBuf),
    Delete { force: bool },
}

pub struct CheckOptions {
    pub recursive: bool,
    pub only_errors: bool,
    pub remedy: Remedy,
    pub dry_run: bool,
    pub jobs: usize,
    pub json: bool,
}

/// Outcome of applying a remedy to one file
enum Action {
    Moved(PathBuf),
    WouldMove(PathBuf),
    Deleted,
    WouldDelete,
    Declined,
    Failed(String),
}

impl Action {
    fn is_handled(&self) -> bool {
        matches!(self, Action::Moved(_) | Action::Deleted)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Moved(target) => write!(f, "moved to {}", target.display()),
            Action::WouldMove(target) => write!(f, "would move to {}", target.display()),
            Action::Deleted => f.write_str("deleted"),
            Action::WouldDelete => f.write_str("would delete"),
            Action::Declined => f.write_str("kept, deletion declined"),
            Action::Failed(reason) => f.write_str(reason),
        }
    }
}

#[derive(Serialize)]
struct FileReport {
    path: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<EpubValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
}

#[derive(Serialize, Default)]
struct CheckSummary {
    total: usize,
    passed: usize,
    failed: usize,
    handled: usize,
}

/// Validate EPUB files and optionally quarantine broken ones
pub fn check(input: &str, opts: CheckOptions) -> Result<()> {
    let files = collect_epubs(input, opts.recursive)?;

    if files.is_empty() {
        if opts.json {
            let output = serde_json::json!({ "files": [], "summary": CheckSummary::default() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("No EPUB files found in {}", input);
        }
        return Ok(());
    }

    if !opts.json {
        println!("Found {} EPUB files to check", files.len());
    }

    let pb = progress_bar(files.len(), opts.json);
    let passed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs)
        .build_global()
        .ok(); // Ignore if already configured

    let results: Vec<(PathBuf, Result<(), EpubValidationError>)> = files
        .par_iter()
        .map(|path| {
            pb.set_message(file_label(path));
            let result = validate_archive(path);
            match &result {
                Ok(()) => passed.fetch_add(1, Ordering::Relaxed),
                Err(_) => failed.fetch_add(1, Ordering::Relaxed),
            };
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();

    pb.finish_and_clear();

    let mut summary = CheckSummary {
        total: files.len(),
        passed: passed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        handled: 0,
    };

    // Remediation runs on this thread so prompts and moves never interleave
    let mut reports = Vec::with_capacity(results.len());
    for (path, result) in results {
        let report = match result {
            Ok(()) => FileReport {
                path: path.display().to_string(),
                ok: true,
                error: None,
                action: None,
            },
            Err(err) => {
                let action = if err.kind().is_structural() {
                    remediate(&path, &opts)
                } else {
                    None
                };
                if action.as_ref().is_some_and(Action::is_handled) {
                    summary.handled += 1;
                }
                FileReport {
                    path: path.display().to_string(),
                    ok: false,
                    error: Some(err),
                    action: action.map(|a| a.to_string()),
                }
            }
        };

        if !opts.json {
            print_report(&report, opts.only_errors);
        }
        reports.push(report);
    }

    if opts.json {
        let output = serde_json::json!({ "files": reports, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("\nCheck complete:");
        println!("  Total:   {}", summary.total);
        println!("  Passed:  {}", summary.passed);
        println!("  Failed:  {}", summary.failed);
        if summary.handled > 0 {
            println!("  Handled: {}", summary.handled);
        }
    }

    if summary.failed > 0 {
        bail!("{} of {} files failed validation", summary.failed, summary.total);
    }

    Ok(())
}

/// Apply the configured remedy to a structurally broken file
fn remediate(path: &Path, opts: &CheckOptions) -> Option<Action> {
    let action = match &opts.remedy {
        Remedy::None => return None,
        Remedy::MoveTo(dir) if opts.dry_run => {
            Action::WouldMove(free_target(path, dir).unwrap_or_else(|_| dir.clone()))
        }
        Remedy::MoveTo(dir) => match move_with_conflict_handling(path, dir) {
            Ok(target) => {
                tracing::info!("Moved {:?} -> {:?}", path, target);
                Action::Moved(target)
            }
            Err(e) => {
                tracing::error!("Failed to move {:?}: {:#}", path, e);
                Action::Failed(format!("move failed: {:#}", e))
            }
        },
        Remedy::Delete { .. } if opts.dry_run => Action::WouldDelete,
        Remedy::Delete { force } => match delete_file(path, !force) {
            Ok(true) => {
                tracing::info!("Deleted {:?}", path);
                Action::Deleted
            }
            Ok(false) => Action::Declined,
            Err(e) => {
                tracing::error!("Failed to delete {:?}: {:#}", path, e);
                Action::Failed(format!("delete failed: {:#}", e))
            }
        },
    };
    Some(action)
}

fn print_report(report: &FileReport, only_errors: bool) {
    match &report.error {
        None if only_errors => {}
        None => println!("PASS  {}", report.path),
        Some(err) => {
            println!("FAIL  {}", report.path);
            println!("      [{}] {}", err.kind(), err);
            if let Some(action) = &report.action {
                println!("      {}", action);
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
