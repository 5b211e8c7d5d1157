//! language-proximity CLI
//!
//! Loads the word, topic and language proximity graphs and prints comparison
//! tables, listings and renderer data.
//!
//! Usage:
//!   language-proximity [OPTIONS] <COMMAND>

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use language_proximity::{
    Level, ProximityConfig, ProximityService, capitalize_first, graph_to_view, load_config,
    load_config_file, write_json, write_list, write_table, write_table_json,
};

/// language-proximity - Compare how close languages are, word by word
#[derive(Parser, Debug)]
#[command(name = "language-proximity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (default: search for .proximity.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory that relative data paths resolve against
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Verbose output (repeat for debug logs)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the proximity table for a main language
    Table(TableArgs),

    /// List graph ids of a level
    List {
        /// Level to list (word, topic, language)
        #[arg(short, long, default_value = "language")]
        level: Level,
    },

    /// List the topics word graphs are grouped by
    Topics,

    /// List the languages offered for selection
    Languages,

    /// Print one graph as JSON for an external renderer
    Graph {
        /// Graph id (case-insensitive)
        id: String,

        /// Level the graph belongs to
        #[arg(short, long, default_value = "word")]
        level: Level,
    },
}

#[derive(Parser, Debug)]
struct TableArgs {
    /// Main language (default: analysis.main_language from config)
    #[arg(short, long)]
    lang: Option<String>,

    /// Restrict to the words of one topic
    #[arg(short, long)]
    topic: Option<String>,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Heat-map cell backgrounds (24-bit ANSI)
    #[arg(long)]
    color: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ProximityConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => {
            let start = match &cli.base_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            load_config(&start)?
        }
    };

    // CLI overrides config
    if let Some(dir) = &cli.base_dir {
        config.base_dir = dir.clone();
    }

    debug!(base_dir = %config.base_dir.display(), "configuration resolved");
    Ok(config)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    let load = || ProximityService::from_config(&config);
    let mut out = stdout();

    match &cli.command {
        Commands::Table(args) => run_table(&load()?, &config, args)?,
        Commands::List { level } => {
            let title = format!("{} graphs", capitalize_first(level.as_str()));
            write_list(&title, &load()?.list_graph_ids(*level), &mut out)?;
        }
        Commands::Topics => write_list("Topics", &load()?.list_topics(), &mut out)?,
        Commands::Languages => write_list("Languages", &config.analysis.languages, &mut out)?,
        Commands::Graph { id, level } => {
            let service = load()?;
            match service.get_graph_record(id, *level) {
                Some(record) => write_json(&graph_to_view(record, *level), &mut out)?,
                None => return Err(format!("No {} graph named '{}'", level, id).into()),
            }
        }
    }

    Ok(())
}

fn run_table(
    service: &ProximityService,
    config: &ProximityConfig,
    args: &TableArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let lang = args
        .lang
        .as_deref()
        .unwrap_or(&config.analysis.main_language)
        .trim()
        .to_lowercase();
    if lang.is_empty() {
        return Err("main language must not be empty".into());
    }
    if !config.analysis.languages.iter().any(|l| *l == lang) {
        warn!(language = %lang, "language is not among the configured languages");
    }

    let table = service.query_proximity(&lang, args.topic.as_deref());

    // Generate output
    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(stdout()),
    };

    let mut writer = output;

    if args.json {
        write_table_json(&table, service.heat_mapper(), &mut writer)?;
    } else {
        write_table(&table, service.heat_mapper(), args.color, &mut writer)?;
    }
    writer.flush()?;

    // Notify about output file
    if let Some(path) = &args.output {
        eprintln!("Table written to: {}", path.display());
    }

    Ok(())
}
