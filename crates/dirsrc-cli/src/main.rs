//! CLI entry point for the dirsrc artifact index.
//!
//! This binary indexes a directory of FHIR-style conformance artifacts and
//! answers lookups against it.
//!
//! # Usage
//!
//! ```bash
//! dirsrc [OPTIONS] <COMMAND>
//!
//! # List every discovered file, walking subdirectories
//! dirsrc --path ./package -r names
//!
//! # Resolve a profile by canonical url
//! dirsrc -p ./package canonical http://hl7.org/fhir/StructureDefinition/Patient
//!
//! # Write a JSON report of summaries, parse errors and statistics
//! dirsrc -p ./package report --output report.json
//! ```
//!
//! A canonical url conflict in the source makes every summary-based command
//! fail with a non-zero exit status and a report naming each offending file.

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use dirsrc_core::{ArtifactSummary, DiscoverySettings, DuplicateFilePreference, ErrorInfo, ResourceKind, parse_mask};
use dirsrc_index::{DirectorySource, IndexStatsSnapshot};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Index a directory of conformance artifacts and query it.
///
/// Files are discovered by mask, XML/JSON twins are collapsed per the format
/// preference, and every resource is summarized without being fully parsed.
#[derive(Parser)]
#[command(name = "dirsrc", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Root directory (or single file) to index.
    ///
    /// Defaults to the directory containing this executable, or the current
    /// directory if that cannot be determined.
    #[arg(short, long, global = true, env = "DIRSRC_PATH")]
    path: Option<Utf8PathBuf>,

    /// Walk subdirectories.
    #[arg(short, long, global = true)]
    recursive: bool,

    /// File name masks, separated by `|` (e.g. "*.xml|*.json").
    #[arg(long, global = true)]
    mask: Option<String>,

    /// Keep only files matching this glob, relative to the root. Repeatable.
    #[arg(long = "include", global = true)]
    includes: Vec<String>,

    /// Drop files matching this glob, relative to the root. Repeatable.
    #[arg(long = "exclude", global = true)]
    excludes: Vec<String>,

    /// Which member of an XML/JSON pair to index.
    #[arg(long, global = true, value_enum)]
    prefer: Option<Preference>,

    /// JSON settings file; command-line flags override its values.
    #[arg(long, global = true, env = "DIRSRC_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Harvest files on a single thread.
    #[arg(long, global = true)]
    sequential: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the file name of every discovered artifact.
    Names,

    /// List resource uris.
    Uris {
        /// Restrict to a resource kind (generic, conformance, value-set,
        /// concept-map, naming-system).
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ResourceKind>,
    },

    /// List canonical urls of conformance resources.
    Canonicals {
        /// Restrict to a resource kind.
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<ResourceKind>,
    },

    /// Show the resource with the given resource uri.
    Resolve {
        /// Resource uri (e.g. "Patient/example" or a bundle entry's fullUrl).
        uri: String,
    },

    /// Show the conformance resource with the given canonical url.
    Canonical {
        /// Canonical url, optionally suffixed with "|version".
        uri: String,
    },

    /// Show the value set defining the given code system.
    ValueSet {
        /// Code system url.
        system: String,
    },

    /// List concept maps by source and/or target.
    ConceptMaps {
        /// Source value set or uri.
        #[arg(long)]
        source: Option<String>,

        /// Target value set or uri.
        #[arg(long)]
        target: Option<String>,
    },

    /// Show the naming system declaring the given unique id.
    NamingSystem {
        /// Unique id (uri, oid, ...).
        id: String,
    },

    /// Print the full path of every discovered file with the given name.
    Locate {
        /// File name (or trailing path) to look for, ignoring case.
        name: String,
    },

    /// List documents that failed to parse.
    Errors,

    /// Generate a JSON report of summaries, parse errors and statistics.
    Report {
        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

/// Duplicate-format preference.
#[derive(Clone, Copy, ValueEnum)]
enum Preference {
    /// Prefer the XML member.
    Xml,
    /// Prefer the JSON member.
    Json,
    /// Keep both members.
    Both,
}

impl From<Preference> for DuplicateFilePreference {
    fn from(preference: Preference) -> Self {
        match preference {
            Preference::Xml => Self::PreferXml,
            Preference::Json => Self::PreferJson,
            Preference::Both => Self::KeepBoth,
        }
    }
}

fn parse_kind(value: &str) -> Result<ResourceKind, String> {
    value.parse::<ResourceKind>()
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Logs go to stderr so that command output on stdout stays parseable.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},globset=warn,ignore=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Builds [`DiscoverySettings`] from the config file (if any) and flags.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
fn build_settings(cli: &Cli) -> color_eyre::Result<DiscoverySettings> {
    let mut settings = match &cli.config {
        Some(path) => DiscoverySettings::from_json_file(path)?,
        None => DiscoverySettings::default(),
    };

    if let Some(path) = &cli.path {
        settings.root.clone_from(path);
    }
    if cli.recursive {
        settings.recursive = true;
    }
    if let Some(mask) = &cli.mask {
        settings.masks = parse_mask(mask);
    }
    if !cli.includes.is_empty() {
        settings.includes.clone_from(&cli.includes);
    }
    if !cli.excludes.is_empty() {
        settings.excludes.clone_from(&cli.excludes);
    }
    if let Some(preference) = cli.prefer {
        settings.format_preference = preference.into();
    }
    if cli.sequential {
        settings.parallel = false;
    }

    Ok(settings)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs one query command against `source`, writing to `out`.
///
/// # Errors
///
/// Returns an error if the query fails (including canonical conflicts) or
/// output cannot be written.
fn run_command(source: &DirectorySource, command: &Commands, out: &mut dyn Write) -> color_eyre::Result<()> {
    match command {
        Commands::Names => write_lines(out, source.list_artifact_names()?)?,
        Commands::Uris { kind } => write_lines(out, source.list_resource_uris(*kind)?)?,
        Commands::Canonicals { kind } => write_lines(out, source.list_canonical_uris(*kind)?)?,
        Commands::Resolve { uri } => write_summary(out, source.resolve_by_uri(uri)?, uri)?,
        Commands::Canonical { uri } => write_summary(out, source.resolve_by_canonical_uri(uri)?, uri)?,
        Commands::ValueSet { system } => write_summary(out, source.find_value_set_by_system(system)?, system)?,
        Commands::NamingSystem { id } => write_summary(out, source.find_naming_system(id)?, id)?,
        Commands::ConceptMaps { source: from, target } => {
            let maps = source.find_concept_maps(from.as_deref(), target.as_deref())?;
            writeln!(out, "{}", serde_json::to_string_pretty(&maps)?)?;
        }
        Commands::Locate { name } => {
            let paths = source.find_artifact_paths(name)?;
            if paths.len() > 1 {
                warn!(name = %name, matches = paths.len(), "Name matches more than one file");
            }
            write_lines(out, paths.iter().map(ToString::to_string))?;
        }
        Commands::Errors => write_lines(out, source.errors()?.iter().map(ToString::to_string))?,
        Commands::Report { output } => run_report(source, output.as_ref(), out)?,
    }
    Ok(())
}

/// Generates the JSON report.
///
/// # Errors
///
/// Returns an error if the index cannot be built or writing fails.
fn run_report(source: &DirectorySource, output: Option<&Utf8PathBuf>, out: &mut dyn Write) -> color_eyre::Result<()> {
    #[derive(serde::Serialize)]
    struct Report<'a> {
        root: Utf8PathBuf,
        stats: IndexStatsSnapshot,
        summaries: &'a [ArtifactSummary],
        errors: &'a [ErrorInfo],
    }

    info!(root = %source.root(), "Generating report");
    let set = source.summaries()?;
    let report = Report {
        root: source.root(),
        stats: source.stats(),
        summaries: set.summaries(),
        errors: set.errors(),
    };
    let content = serde_json::to_string_pretty(&report)?;

    if let Some(output_path) = output {
        std::fs::write(output_path.as_std_path(), &content)?;
        info!(path = %output_path, "Report written");
    } else {
        writeln!(out, "{content}")?;
    }
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn write_lines<I, S>(out: &mut dyn Write, lines: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: std::fmt::Display,
{
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_summary(out: &mut dyn Write, summary: Option<ArtifactSummary>, key: &str) -> color_eyre::Result<()> {
    match summary {
        Some(summary) => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
        None => warn!(key = %key, "No matching resource"),
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Resolve settings and open the source
    let settings = build_settings(&cli)?;
    let source = DirectorySource::with_default_root(settings)?;

    // 5. Route to the command
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run_command(&source, &cli.command, &mut handle)
}
