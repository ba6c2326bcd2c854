//! Payslip name CLI.
//!
//! Reads `pdftotext` output (one page per form feed), extracts the employee
//! name of every page and optionally resolves each one against an employee
//! directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use holerite::directory::deliverable;
use holerite::{
    extractor_from, Blacklist, Directory, DirectoryMatcher, FormFeedPages, MatchResult,
    MatchStats, NameExtractor, PayslipBatch, Settings, Suggestion,
};

/// Payslip name extraction tool
///
/// Finds the employee name on each payslip page and matches it against an
/// employee directory.
#[derive(Parser)]
#[command(name = "holerite")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(clap::Args)]
struct CommonArgs {
    /// Page text file, pages separated by form feeds
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Extra blacklist JSON, merged into the built-in one
    #[arg(short, long, value_name = "FILE")]
    blacklist: Option<PathBuf>,

    /// Settings JSON (thresholds, tie-break policy)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one name per page and print display names and filename stems
    Extract {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Extract names and match them against an employee directory
    Match {
        #[command(flatten)]
        common: CommonArgs,

        /// Employee directory JSON: [{"name", "email"?, "slack_id"?}]
        #[arg(short, long, value_name = "FILE")]
        directory: PathBuf,
    },
}

/// Command handler holding the loaded settings and extractor.
struct PayslipHandler {
    settings: Settings,
    extractor: NameExtractor,
    json: bool,
}

impl PayslipHandler {
    /// Loads settings and blacklist, falling back to the built-in defaults.
    fn new(common: &CommonArgs) -> Result<Self> {
        let settings = match &common.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let mut blacklist = Blacklist::default();
        if let Some(path) = &common.blacklist {
            let extra = Blacklist::load(path)
                .with_context(|| format!("Failed to load blacklist from {}", path.display()))?;
            blacklist.merge(&extra);
        }
        tracing::debug!(
            "blacklist v{}: {} phrases, {} words",
            blacklist.version(),
            blacklist.phrase_count(),
            blacklist.word_count()
        );

        Ok(Self {
            extractor: extractor_from(&settings, blacklist),
            settings,
            json: common.json,
        })
    }

    fn read_batch(&self, input: &Path) -> Result<PayslipBatch> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        let source = FormFeedPages::load(input)
            .with_context(|| format!("Failed to read pages from {}", input.display()))?;
        PayslipBatch::extract(&source, &self.extractor).with_context(|| "Name extraction failed")
    }

    /// Prints page number, display name and filename stem per page.
    fn extract(&self, input: &Path) -> Result<()> {
        let batch = self.read_batch(input)?;
        let rows = extract_rows(&batch);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for row in &rows {
                println!("{}\t{}\t{}", row.page_number, row.display_name, row.filename);
            }
        }
        Ok(())
    }

    /// Prints status, score, employee and suggestions per page.
    fn match_directory(&self, input: &Path, directory: &Path) -> Result<()> {
        let batch = self.read_batch(input)?;
        let directory = Directory::load(directory)
            .with_context(|| format!("Failed to load directory from {}", directory.display()))?;
        let matcher = DirectoryMatcher::new(directory, self.settings.matching.clone());

        let results = batch.match_directory(&matcher);
        let rows: Vec<MatchRow> = results
            .iter()
            .map(|result| MatchRow {
                suggestions: matcher.suggest_for(result),
                result,
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for row in &rows {
                println!("{}", format_match_line(row));
            }
            let stats = MatchStats::from_results(&results);
            eprintln!(
                "{} pages: {} matched, {} not found, {} without name; {} deliverable",
                stats.total,
                stats.matched,
                stats.not_found,
                stats.no_name,
                deliverable(&results).count()
            );
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct ExtractRow {
    page_number: usize,
    name: Option<String>,
    display_name: String,
    filename: String,
}

#[derive(serde::Serialize)]
struct MatchRow<'a> {
    #[serde(flatten)]
    result: &'a MatchResult,
    suggestions: Vec<Suggestion>,
}

fn extract_rows(batch: &PayslipBatch) -> Vec<ExtractRow> {
    batch
        .pages()
        .iter()
        .zip(batch.display_names())
        .zip(batch.filename_stems())
        .map(|((page, display_name), filename)| ExtractRow {
            page_number: page.page_number,
            name: page.name.clone(),
            display_name,
            filename,
        })
        .collect()
}

/// `page<TAB>status<TAB>score<TAB>employee[<TAB>did you mean: A (87), B (60)]`
fn format_match_line(row: &MatchRow<'_>) -> String {
    let result = row.result;
    let employee = result
        .employee
        .as_ref()
        .map_or("-", |employee| employee.name.as_str());
    let mut line = format!(
        "{}\t{}\t{}\t{}",
        result.page_number, result.status, result.score, employee
    );

    if !row.suggestions.is_empty() {
        let names: Vec<String> = row
            .suggestions
            .iter()
            .map(|s| format!("{} ({})", s.employee.name, s.similarity))
            .collect();
        line.push_str("\tdid you mean: ");
        line.push_str(&names.join(", "));
    }
    line
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Extract { common } => {
            PayslipHandler::new(common)?.extract(&common.input)?;
        }
        Commands::Match { common, directory } => {
            PayslipHandler::new(common)?.match_directory(&common.input, directory)?;
        }
    }

    Ok(())
}
