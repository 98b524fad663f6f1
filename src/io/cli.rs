//! Command-line interface for generating, analysing and scaffolding trait sets

use crate::algorithm::composition::Composition;
use crate::algorithm::executor::{Composer, ComposerConfig, ExhaustionPolicy};
use crate::analysis::statistics::{BatchReport, TraitTally};
use crate::io::configuration::{DEFAULT_COUNT, DEFAULT_MAX_ATTEMPTS, DEFAULT_SEED, MAX_REDRAWS};
use crate::io::error::{Result, WithContext};
use crate::io::progress::ProgressManager;
use crate::io::rules_file::RulesFile;
use crate::io::scaffold::{read_trait_directory, scaffold_rules};
use crate::rules::{RuleSet, Validation};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "traitloom")]
#[command(
    author,
    version,
    about = "Compose weighted trait sets under exclusion, requirement and cascade rules"
)]
/// Command-line arguments for the composition tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Generate compositions from a rules file
    Generate(GenerateArgs),
    /// Tally option occurrences in previously generated compositions
    Analyze(AnalyzeArgs),
    /// Write a starter rules file from a directory of trait layers
    Scaffold(ScaffoldArgs),
}

/// Arguments for `generate`
#[derive(Args)]
// Each flag toggles an independent engine or output behaviour
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateArgs {
    /// Rules file (JSON)
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Number of compositions to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Whole-attempt ceiling per composition
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Retry without an attempt ceiling
    #[arg(long, conflicts_with = "max_attempts")]
    pub unbounded: bool,

    /// Draws per category before it is left empty
    #[arg(long, default_value_t = MAX_REDRAWS)]
    pub max_redraws: usize,

    /// Restart the attempt when a category runs out of redraws
    #[arg(long)]
    pub restart_on_exhaustion: bool,

    /// Fill cascaded categories without the inclusion gate
    #[arg(long)]
    pub ungated_cascades: bool,

    /// Fail on rules that reference unknown categories or options
    #[arg(long)]
    pub strict: bool,

    /// Emit metadata attribute lists instead of flat category maps
    #[arg(long)]
    pub attributes: bool,

    /// Anchor categories, overriding the rules file
    #[arg(long, value_delimiter = ',')]
    pub anchors: Vec<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Engine configuration from the rules file and command-line overrides
    pub fn composer_config(&self, file: &RulesFile) -> ComposerConfig {
        let mut config = ComposerConfig::from_rules_file(file);
        if !self.anchors.is_empty() {
            config.anchors.clone_from(&self.anchors);
        }
        config.max_redraws = self.max_redraws;
        config.gate_cascaded_attributes = !self.ungated_cascades;
        config.max_attempts = (!self.unbounded).then_some(self.max_attempts);
        config.exhaustion = if self.restart_on_exhaustion {
            ExhaustionPolicy::Restart
        } else {
            ExhaustionPolicy::Skip
        };
        config
    }

    const fn validation(&self) -> Validation {
        if self.strict {
            Validation::Strict
        } else {
            Validation::Lenient
        }
    }
}

/// Arguments for `analyze`
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Rules file the compositions were generated from
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// JSON array of compositions
    #[arg(value_name = "COMPOSITIONS")]
    pub input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `scaffold`
#[derive(Args)]
pub struct ScaffoldArgs {
    /// Directory holding one sub-directory per category
    #[arg(value_name = "TRAITS")]
    pub traits: PathBuf,

    /// Where to write the rules file
    #[arg(short, long, default_value = "traits-configuration.json")]
    pub output: PathBuf,

    /// Random seed for the generated weights
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Destination name reported for errors while writing to stdout
const STDOUT: &str = "<stdout>";

/// Run the parsed command
///
/// # Errors
///
/// Returns an error if loading, composing or writing fails
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Generate(args) => generate(args, cli.quiet),
        Command::Analyze(args) => analyze(args),
        Command::Scaffold(args) => scaffold(args),
    }
}

fn generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let file = RulesFile::load(&args.rules)?;
    let rules = RuleSet::compile(&file, args.validation())?;
    let mut composer = Composer::new(&rules, args.composer_config(&file), args.seed)?;

    let mut progress = if quiet {
        ProgressManager::hidden(args.count)
    } else {
        ProgressManager::new(args.count)
    };

    let mut batch = Vec::with_capacity(args.count);
    for _ in 0..args.count {
        batch.push(composer.compose()?);
        progress.record(composer.attempts());
    }
    progress.finish();
    tracing::info!(
        count = progress.completed(),
        mean_attempts = progress.mean_attempts(),
        "generation finished"
    );

    if args.attributes {
        let attributes: Vec<_> = batch.iter().map(Composition::attributes).collect();
        write_json(&attributes, args.output.as_deref())
    } else {
        write_json(&batch, args.output.as_deref())
    }
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let file = RulesFile::load(&args.rules)?;
    let text = std::fs::read_to_string(&args.input).with_path(&args.input, "read compositions")?;
    let batch: Vec<Composition> =
        serde_json::from_str(&text).with_path(&args.input, "parse compositions")?;

    let report = BatchReport::new(&file.breakdown, TraitTally::from_batch(&batch));
    write_json(&report, args.output.as_deref())
}

fn scaffold(args: &ScaffoldArgs) -> Result<()> {
    let listing = read_trait_directory(&args.traits)?;
    let file = scaffold_rules(&listing, args.seed);
    file.save(&args.output)?;
    tracing::info!(
        categories = listing.len(),
        path = %args.output.display(),
        "rules file written"
    );
    Ok(())
}

/// Write `value` as pretty JSON to `output`, or to stdout when `None`
///
/// # Errors
///
/// Returns a file system error naming the destination if serialization or
/// the write fails
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let text = serde_json::to_string_pretty(value)
                .map_err(std::io::Error::from)
                .with_path(path, "serialize output")?;
            std::fs::write(path, text).with_path(path, "write output")
        }
        None => {
            let stdout = Path::new(STDOUT);
            let mut handle = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut handle, value)
                .map_err(std::io::Error::from)
                .with_path(stdout, "write output")?;
            writeln!(handle).with_path(stdout, "write output")
        }
    }
}
