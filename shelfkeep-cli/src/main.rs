//! Shelfkeep CLI - housekeeping for a personal e-book library

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use shelfkeep_core::SanitizeMode;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Title cleaning strategy
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Regex pass removing long spans without volume or edition markers
    Strict,
    /// Keep the base title plus up to two allowlisted annotations
    Structural,
}

impl From<Mode> for SanitizeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Strict => SanitizeMode::Strict,
            Mode::Structural => SanitizeMode::Structural,
        }
    }
}

#[derive(Parser)]
#[command(name = "shelfkeep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check EPUB files for corruption and missing structure
    Check {
        /// EPUB file or directory
        path: String,

        /// Search subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Only list files that failed
        #[arg(long)]
        only_errors: bool,

        /// Move corrupted files into this directory
        #[arg(long, conflicts_with = "delete")]
        move_to: Option<PathBuf>,

        /// Delete corrupted files
        #[arg(long)]
        delete: bool,

        /// Delete without asking (requires --delete)
        #[arg(long, requires = "delete")]
        force: bool,

        /// Report what would happen without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean decorative annotations from EPUB titles
    Clean {
        /// EPUB file or directory
        path: String,

        /// Search subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Cleaning strategy
        #[arg(short, long, value_enum, default_value_t = Mode::Structural)]
        mode: Mode,

        /// Print the new titles without writing them
        #[arg(long)]
        dry_run: bool,

        /// Do not fail when some books cannot be read
        #[arg(long)]
        skip_errors: bool,

        /// Metadata tool used to write titles
        #[arg(long, env = "SHELFKEEP_EBOOK_META", default_value = "ebook-meta")]
        ebook_meta: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Write ISBNs found in book content into the metadata
    Extract {
        /// EPUB file or directory
        path: String,

        /// Search subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Print the ISBNs without writing them
        #[arg(long)]
        dry_run: bool,

        /// Do not fail when some books cannot be read
        #[arg(long)]
        skip_errors: bool,

        /// Metadata tool used to write ISBNs
        #[arg(long, env = "SHELFKEEP_EBOOK_META", default_value = "ebook-meta")]
        ebook_meta: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Rename files in a directory to a numbered template
    Rename {
        /// Directory containing the files
        path: String,

        /// Name template; @n is replaced by the sequence number
        #[arg(short, long, default_value = "file-@n")]
        template: String,

        /// Only rename files with this extension (repeatable)
        #[arg(short, long = "format")]
        formats: Vec<String>,

        /// Search subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Move renamed files into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First sequence number
        #[arg(long, default_value = "1")]
        start: usize,

        /// Print the new names without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Clean titles given on the command line
    Title {
        /// Titles to clean
        #[arg(required = true)]
        titles: Vec<String>,

        /// Cleaning strategy
        #[arg(short, long, value_enum, default_value_t = Mode::Structural)]
        mode: Mode,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display metadata of an EPUB file
    Info {
        /// Input file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "shelfkeep_cli=debug,shelfkeep_core=debug"
    } else {
        "shelfkeep_cli=info,shelfkeep_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Check {
            path,
            recursive,
            only_errors,
            move_to,
            delete,
            force,
            dry_run,
            jobs,
            json,
        } => {
            let remedy = match (move_to, delete) {
                (Some(dir), _) => commands::Remedy::MoveTo(dir),
                (None, true) => commands::Remedy::Delete { force },
                (None, false) => commands::Remedy::None,
            };
            commands::check(
                &path,
                commands::CheckOptions {
                    recursive,
                    only_errors,
                    remedy,
                    dry_run,
                    jobs,
                    json,
                },
            )
        }

        Commands::Clean {
            path,
            recursive,
            mode,
            dry_run,
            skip_errors,
            ebook_meta,
            jobs,
        } => commands::clean(
            &path,
            commands::CleanOptions {
                recursive,
                mode: mode.into(),
                dry_run,
                skip_errors,
                ebook_meta,
                jobs,
            },
        ),

        Commands::Extract {
            path,
            recursive,
            dry_run,
            skip_errors,
            ebook_meta,
            jobs,
        } => commands::extract(
            &path,
            commands::ExtractOptions {
                recursive,
                dry_run,
                skip_errors,
                ebook_meta,
                jobs,
            },
        ),

        Commands::Rename {
            path,
            template,
            formats,
            recursive,
            output,
            start,
            dry_run,
        } => commands::rename(
            &path,
            commands::RenameOptions {
                template,
                formats,
                recursive,
                output,
                start,
                dry_run,
            },
        ),

        Commands::Title { titles, mode, json } => commands::title(&titles, mode.into(), json),

        Commands::Info { input, json } => commands::info(&input, json),
    }
}
