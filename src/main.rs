//! Dactrie - command-line entrypoint.
//!
//! Builds a double-array trie from a word list and answers exact, prefix and
//! statistics queries against it. Logging and the trie configuration come from
//! the layered application configuration.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;

use dactrie_lib::config::{self, AppConfig, ConfigLoader};
use dactrie_lib::data_structures::double_array_trie::{Alphabet, Datrie};
use dactrie_lib::error::{DactrieError, DactrieResult};
use dactrie_lib::utils;

/// Command line arguments for Dactrie.
#[derive(Parser, Debug)]
#[clap(name = "dactrie", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Look up exact keys
    Query {
        /// Word list to build the trie from
        #[clap(short, long, value_parser)]
        words: PathBuf,

        /// Keys to look up
        #[clap(required = true)]
        keys: Vec<String>,
    },

    /// List stored keys starting with a prefix
    Prefix {
        /// Word list to build the trie from
        #[clap(short, long, value_parser)]
        words: PathBuf,

        /// Prefix to enumerate
        prefix: String,
    },

    /// Print occupancy statistics
    Stats {
        /// Word list to build the trie from
        #[clap(short, long, value_parser)]
        words: PathBuf,

        /// Emit JSON instead of text
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
fn init_logging(log: &config::LogConfig) -> DactrieResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| DactrieError::custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn build(config: &AppConfig, words: &Path) -> DactrieResult<Datrie<Alphabet<char>, u64>> {
    let alphabet = config.alphabet.build()?;
    let entries = utils::load_word_list(words)?;
    utils::build_trie(alphabet, config.trie.clone(), &entries)
}

fn run(args: Args) -> DactrieResult<()> {
    let config = ConfigLoader::new(args.config.as_deref(), config::ENV_PREFIX).load()?;
    init_logging(&config.log)?;

    match args.command {
        Command::Query { words, keys } => {
            let trie = build(&config, &words)?;
            for key in keys {
                match trie.get_str(&key) {
                    Some(value) => println!("{key}\t{value}"),
                    None => println!("{key}\t-"),
                }
            }
        }
        Command::Prefix { words, prefix } => {
            let trie = build(&config, &words)?;
            let prefix: Vec<char> = prefix.chars().collect();
            for (key, value) in trie.iter_prefix(&prefix) {
                println!("{}\t{value}", key.into_iter().collect::<String>());
            }
        }
        Command::Stats { words, json } => {
            let trie = build(&config, &words)?;
            let stats = trie.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("keys             {}", stats.keys);
                println!("states           {}", stats.states);
                println!("occupied states  {}", stats.occupied_states);
                println!("free states      {}", stats.free_states);
                println!("tail cells       {}", stats.tail_cells);
                println!("tail tombstones  {}", stats.tail_tombstones);
            }
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            println!("configuration ok");
        }
        Command::GenConfig { output } => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&AppConfig::default())
                .map_err(|e| DactrieError::custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
        }
    }

    Ok(())
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}
