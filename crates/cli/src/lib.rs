use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use labeler_rollup::{
    Emitter, LabelRecord, LabelWriter, LabelingContext, LabelingSummary, OutputFormat,
    RollupEngine,
};
use labeler_taxonomy::{load_taxonomy, Taxonomy};
use labeler_text::{load_examples, read_word_list, NeighborTable, Normalizer, SynonymGenerator};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

mod config;
mod flags;

pub use config::{LabelerConfig, DEFAULT_CONFIG_FILE};
use flags::StemmerFlag;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "labeler")]
#[command(about = "Build taxonomy-labeled query data for text classifiers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./labeler.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll categories up to the minimum support and write labeled queries
    Label(LabelArgs),

    /// Write synonym lines for a word list from nearest-neighbor data
    Synonyms(SynonymsArgs),

    /// Show category count, root and depth of a taxonomy
    Inspect(InspectArgs),
}

#[derive(Args)]
struct LabelArgs {
    /// Category export (XML, or JSON when the file ends in .json)
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Training queries (CSV)
    #[arg(long)]
    examples: Option<PathBuf>,

    /// Output file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Minimum number of queries per category label
    #[arg(long)]
    min_support: Option<usize>,

    /// Label prefix (default: __label__)
    #[arg(long)]
    label_prefix: Option<String>,

    #[arg(long, value_enum)]
    stemmer: Option<StemmerFlag>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SynonymsArgs {
    /// Nearest-neighbor table (JSON)
    #[arg(long)]
    neighbors: Option<PathBuf>,

    /// Word list, one word per line
    #[arg(long)]
    words: Option<PathBuf>,

    /// Output file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Similarity below which a neighbor is not a synonym
    #[arg(long)]
    threshold: Option<f32>,
}

#[derive(Args)]
struct InspectArgs {
    /// Category export (XML, or JSON when the file ends in .json)
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct LabelOutput<'a> {
    output: &'a Path,
    summary: &'a LabelingSummary,
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    categories: usize,
    root: &'a str,
    max_depth: usize,
    leaves: usize,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Label(args) => args.json,
        Commands::Inspect(args) => args.json,
        Commands::Synonyms(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = LabelerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Label(args) => {
            apply_label_args(&mut config, &args);
            config.validate()?;
            run_label(&config, args.json)
        }
        Commands::Synonyms(args) => {
            apply_synonyms_args(&mut config, args);
            config.validate()?;
            run_synonyms(&config)
        }
        Commands::Inspect(args) => {
            if let Some(taxonomy) = args.taxonomy {
                config.input.taxonomy = taxonomy;
            }
            run_inspect(&config, args.json)
        }
    }
}

fn apply_label_args(config: &mut LabelerConfig, args: &LabelArgs) {
    if let Some(taxonomy) = &args.taxonomy {
        config.input.taxonomy = taxonomy.clone();
    }
    if let Some(examples) = &args.examples {
        config.input.examples = examples.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(min_support) = args.min_support {
        config.rollup.min_support = min_support;
    }
    if let Some(prefix) = &args.label_prefix {
        config.output.label_prefix = prefix.clone();
    }
    if let Some(stemmer) = args.stemmer {
        config.text.stemmer = stemmer.as_domain();
    }
}

fn apply_synonyms_args(config: &mut LabelerConfig, args: SynonymsArgs) {
    if let Some(neighbors) = args.neighbors {
        config.synonyms.neighbors = neighbors;
    }
    if let Some(words) = args.words {
        config.synonyms.words = words;
    }
    if let Some(output) = args.output {
        config.synonyms.output = output;
    }
    if let Some(threshold) = args.threshold {
        config.synonyms.threshold = threshold;
    }
}

fn open_taxonomy(path: &Path) -> Result<Taxonomy> {
    load_taxonomy(path).with_context(|| format!("Failed to load taxonomy {}", path.display()))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_records(path: &Path, format: OutputFormat, records: &[LabelRecord]) -> Result<usize> {
    let mut writer = LabelWriter::new(create_output(path)?, format);
    writer
        .write_all(records)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    let written = writer
        .finish()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(written)
}

fn run_label(config: &LabelerConfig, json: bool) -> Result<()> {
    let taxonomy = open_taxonomy(&config.input.taxonomy)?;
    let context = LabelingContext::new(
        taxonomy,
        Normalizer::new(config.text.stemmer)?,
        RollupEngine::new(config.rollup.min_support),
        Emitter::new(config.output.label_prefix.clone()),
    );

    let raw = load_examples(&config.input.examples, &config.input.columns()).with_context(|| {
        format!("Failed to load examples {}", config.input.examples.display())
    })?;
    log::info!(
        "Loaded {} examples from {}",
        raw.len(),
        config.input.examples.display()
    );

    let outcome = context.label(raw).context("Category rollup failed")?;
    let written = write_records(&config.output.path, config.output.format(), &outcome.records)?;
    log::info!("Wrote {written} labeled queries to {}", config.output.path.display());

    let summary = &outcome.summary;
    if json {
        let output = LabelOutput {
            output: &config.output.path,
            summary,
        };
        print_stdout(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_stdout(&format!(
            "labeled={} labels={} dropped_on_load={} excluded_root={} excluded_unknown={} rounds={} promotions={} min_support={} output={}",
            summary.emitted,
            summary.labels,
            summary.dropped_on_load,
            summary.excluded_root,
            summary.excluded_unknown,
            summary.rounds,
            summary.promotions,
            summary.min_support,
            config.output.path.display()
        ))?;
    }

    Ok(())
}

fn run_synonyms(config: &LabelerConfig) -> Result<()> {
    let settings = &config.synonyms;
    let table = NeighborTable::load(&settings.neighbors).with_context(|| {
        format!("Failed to load neighbors {}", settings.neighbors.display())
    })?;
    let words_file = File::open(&settings.words)
        .with_context(|| format!("Failed to open word list {}", settings.words.display()))?;
    let words = read_word_list(words_file)?;

    log::info!("Writing output to {}", settings.output.display());
    let generator = SynonymGenerator::new(settings.threshold);
    let written = generator
        .write_synonyms(&table, &words, create_output(&settings.output)?)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;

    print_stdout(&format!(
        "words={} synonym_lines={} threshold={} output={}",
        words.len(),
        written,
        settings.threshold,
        settings.output.display()
    ))
}

fn run_inspect(config: &LabelerConfig, json: bool) -> Result<()> {
    let taxonomy = open_taxonomy(&config.input.taxonomy)?;
    let leaves = taxonomy
        .categories()
        .filter(|c| taxonomy.children(&c.id).is_empty())
        .count();
    let output = InspectOutput {
        categories: taxonomy.len(),
        root: &taxonomy.root().id,
        max_depth: taxonomy.max_depth(),
        leaves,
    };

    if json {
        print_stdout(&serde_json::to_string_pretty(&output)?)
    } else {
        print_stdout(&format!(
            "categories={} root={} max_depth={} leaves={}",
            output.categories, output.root, output.max_depth, output.leaves
        ))
    }
}
