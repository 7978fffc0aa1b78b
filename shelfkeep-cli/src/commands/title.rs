//! Title command implementation

use anyhow::Result;
use serde::Serialize;
use shelfkeep_core::{sanitize_with, SanitizeMode};

#[derive(Serialize)]
struct TitleResult<'a> {
    original: &'a str,
    cleaned: String,
    changed: bool,
}

/// Sanitize titles given on the command line
pub fn title(titles: &[String], mode: SanitizeMode, json: bool) -> Result<()> {
    let results: Vec<TitleResult<'_>> = titles
        .iter()
        .map(|original| {
            let cleaned = sanitize_with(original, mode);
            TitleResult {
                changed: cleaned != *original,
                original,
                cleaned,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            println!("{}", result.cleaned);
        }
    }

    Ok(())
}
