//! CLI command implementations

mod check;
mod clean;
mod extract;
mod files;
mod info;
mod rename;
mod title;

pub use check::{check, CheckOptions, Remedy};
pub use clean::{clean, CleanOptions};
pub use extract::{extract, ExtractOptions};
pub use info::info;
pub use rename::{rename, RenameOptions};
pub use title::title;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for the batch commands; hidden when output must stay machine-readable
fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}
