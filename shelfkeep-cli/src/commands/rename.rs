//! Rename command implementation
//!
//! Renames files to a numbered template such as `book-@n`, keeping each
//! file's extension, optionally moving them into another directory.

use super::files::{relocate, walk_files};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the sequence number
const SEQUENCE_PLACEHOLDER: &str = "@n";

pub struct RenameOptions {
    pub template: String,
    pub formats: Vec<String>,
    pub recursive: bool,
    pub output: Option<PathBuf>,
    pub start: usize,
    pub dry_run: bool,
}

/// Rename the files in `input` in path order
pub fn rename(input: &str, opts: RenameOptions) -> Result<()> {
    if !opts.template.contains(SEQUENCE_PLACEHOLDER) {
        bail!(
            "Template '{}' has no {} placeholder",
            opts.template,
            SEQUENCE_PLACEHOLDER
        );
    }

    let dir = Path::new(input);
    if !dir.is_dir() {
        bail!("Not a directory: {}", input);
    }

    let formats = normalize_formats(&opts.formats);
    let files = walk_files(dir, opts.recursive, |path| matches_format(path, &formats))?;

    if files.is_empty() {
        println!("No files found in {}", input);
        return Ok(());
    }

    let plan = plan_renames(&files, &opts)?;

    if let Some(output) = &opts.output {
        if !opts.dry_run {
            fs::create_dir_all(output)
                .with_context(|| format!("Failed to create directory {}", output.display()))?;
        }
    }

    let verb = match (&opts.output, opts.dry_run) {
        (Some(_), true) => "would move",
        (Some(_), false) => "moved",
        (None, true) => "would rename",
        (None, false) => "renamed",
    };

    for (src, target) in &plan {
        if !opts.dry_run {
            relocate(src, target)?;
            tracing::debug!("Renamed {:?} -> {:?}", src, target);
        }
        println!("{}  {} -> {}", verb, src.display(), target.display());
    }

    println!("\n{} files {}", plan.len(), verb);
    Ok(())
}

/// Pair each file with its new path, refusing to overwrite anything
fn plan_renames(files: &[PathBuf], opts: &RenameOptions) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen = HashSet::new();
    let mut plan = Vec::with_capacity(files.len());

    for (i, src) in files.iter().enumerate() {
        let name = build_name(&opts.template, opts.start + i, src);
        let dir = match &opts.output {
            Some(output) => output.as_path(),
            None => src.parent().unwrap_or_else(|| Path::new(".")),
        };
        let target = dir.join(name);

        if !seen.insert(target.clone()) {
            bail!("Two files would be renamed to {}", target.display());
        }
        if target != *src && target.exists() {
            bail!("Target already exists: {}", target.display());
        }
        plan.push((src.clone(), target));
    }

    Ok(plan)
}

/// Fill the template with `index` and append the extension of `file`
fn build_name(template: &str, index: usize, file: &Path) -> String {
    let mut name = template.replace(SEQUENCE_PLACEHOLDER, &index.to_string());
    if let Some(ext) = file.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    name
}

fn normalize_formats(formats: &[String]) -> Vec<String> {
    formats
        .iter()
        .map(|f| f.trim_start_matches('.').to_lowercase())
        .filter(|f| !f.is_empty())
        .collect()
}

/// An empty format list accepts every file
fn matches_format(path: &Path, formats: &[String]) -> bool {
    if formats.is_empty() {
        return true;
    }
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| formats.contains(&ext))
}
