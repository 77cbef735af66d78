//! Compile character records into image-generation prompts.
//!
//! Records are JSON files in the legacy form's camelCase shape. Enhancement
//! reads the API key from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Compile a record in its own dialect
//! neogenesis compile hero.json
//!
//! # Start from a preset, force Midjourney, prepend the preamble
//! neogenesis compile --preset "gothic vampire" --format midjourney --preamble
//!
//! # Six-angle character sheet as one clipboard block
//! cat hero.json | neogenesis sheet - --bundle
//!
//! # LLM-enhanced prompt, saved to history
//! neogenesis enhance hero.json
//!
//! # Seven-image design kit
//! neogenesis enhance hero.json --kit
//! ```

use std::io::{self, Read};
use std::process;

use clap::{Args, Parser, Subcommand};
use neogenesis::config::{Config, api_key};
use neogenesis::enhance::GeneratedPrompt;
use neogenesis::history::HistoryStore;
use neogenesis::params::{CharacterParams, Dialect, MediaMode};
use neogenesis::preamble::{ELITE_PREAMBLE, with_preamble};
use neogenesis::presets::{find_preset, presets};
use neogenesis::{character_sheet, compile, render_bundle};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

/// Compile character records into image-generation prompts.
#[derive(Parser)]
#[command(name = "neogenesis", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a record into a prompt
    Compile {
        #[command(flatten)]
        record: RecordArgs,

        /// Put the instructional preamble ahead of the prompt
        #[arg(long)]
        preamble: bool,
    },
    /// Compile the six-angle character sheet of a record
    Sheet {
        #[command(flatten)]
        record: RecordArgs,

        /// Print one clipboard-ready block instead of separate entries
        #[arg(long)]
        bundle: bool,
    },
    /// List or show curated presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Ask an LLM for an enhanced prompt
    Enhance {
        #[command(flatten)]
        record: RecordArgs,

        /// Generate the seven-image design kit
        #[arg(long, conflicts_with = "inventory")]
        kit: bool,

        /// Generate an inventory sprite-sheet prompt
        #[arg(long)]
        inventory: bool,

        /// Model to use (overrides NEOGENESIS_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Do not prepend the instructional preamble
        #[arg(long)]
        no_preamble: bool,

        /// Do not save the result to history
        #[arg(long)]
        no_history: bool,
    },
    /// Show or clear saved enhancement results
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List preset names
    List,
    /// Print a preset applied to an empty record, as JSON
    Show { name: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved results, newest first
    List {
        /// Print raw JSON entries
        #[arg(long)]
        json: bool,
    },
    /// Delete all saved results
    Clear,
}

/// Where the record comes from and what to override on it.
#[derive(Args)]
struct RecordArgs {
    /// Record JSON file, or `-` for stdin. Omit for an empty record.
    input: Option<String>,

    /// Apply a curated preset before the overrides below
    #[arg(long)]
    preset: Option<String>,

    /// Output dialect: midjourney or generic
    #[arg(long)]
    format: Option<Dialect>,

    /// Media mode: image or video
    #[arg(long)]
    mode: Option<MediaMode>,
}

// ── Helpers ────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(level),
        )
        .init();
}

fn read_input(input: &str) -> Result<String, String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).map_err(|e| format!("failed to read '{input}': {e}"))
    }
}

fn load_record(args: &RecordArgs) -> Result<CharacterParams, String> {
    let mut params = match &args.input {
        Some(input) => CharacterParams::from_json(&read_input(input)?)?,
        None => CharacterParams::default(),
    };
    if let Some(name) = &args.preset {
        let preset = find_preset(name).ok_or_else(|| format!("unknown preset '{name}'"))?;
        debug!("Applying preset {}", preset.name);
        params = preset.apply(&params)?;
    }
    if let Some(format) = args.format {
        params.prompt_format = format;
    }
    if let Some(mode) = args.mode {
        params.mode = mode;
    }
    Ok(params)
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn print_generated(output: &GeneratedPrompt) {
    println!("{}", output.prompt);
    if !output.negative_prompt.trim().is_empty() {
        println!("\nNegative prompt: {}", output.negative_prompt);
    }
}

// ── Commands ───────────────────────────────────────────────────────

async fn run(cli: Cli) -> Result<(), String> {
    let config = Config::from_env();

    match cli.command {
        Command::Compile { record, preamble } => {
            let params = load_record(&record)?;
            let prompt = compile(&params);
            if preamble {
                println!("{}", with_preamble(ELITE_PREAMBLE, &prompt));
            } else {
                println!("{prompt}");
            }
        }
        Command::Sheet { record, bundle } => {
            let params = load_record(&record)?;
            let sheet = character_sheet(&params);
            if bundle {
                println!("{}", render_bundle(&sheet, params.prompt_format));
            } else {
                for entry in &sheet {
                    println!("[{}]\n{}\n", entry.label, entry.prompt);
                }
            }
        }
        Command::Preset { action } => match action {
            PresetAction::List => {
                for preset in presets() {
                    println!("{}", preset.name);
                }
            }
            PresetAction::Show { name } => {
                let preset = find_preset(&name).ok_or_else(|| format!("unknown preset '{name}'"))?;
                let params = preset.apply(&CharacterParams::default())?;
                let json = serde_json::to_string_pretty(&params)
                    .map_err(|e| format!("failed to serialize preset: {e}"))?;
                println!("{json}");
            }
        },
        Command::Enhance {
            record,
            kit,
            inventory,
            model,
            no_preamble,
            no_history,
        } => {
            let params = load_record(&record)?;
            let mut config = config;
            if let Some(model) = model {
                config.model = model;
            }
            if no_preamble {
                config.preamble = false;
            }
            let enhancer = config.build_enhancer(api_key()?)?;

            if kit {
                let entries = enhancer.design_kit(&params).await?;
                println!("{}", render_bundle(&entries, params.prompt_format));
            } else if inventory {
                let output = enhancer.inventory(&params).await?;
                print_generated(&output);
            } else {
                let output = enhancer.enhance(&params).await?;
                print_generated(&output);
                if !no_history {
                    let store = HistoryStore::open(&config.history_path);
                    store.add(output, &params)?;
                    info!("Saved to {}", store.path().display());
                }
            }
        }
        Command::History { action } => {
            let store = HistoryStore::open(&config.history_path);
            match action {
                HistoryAction::List { json } => {
                    let entries = store.list();
                    if json {
                        let text = serde_json::to_string_pretty(&entries)
                            .map_err(|e| format!("failed to serialize history: {e}"))?;
                        println!("{text}");
                    } else if entries.is_empty() {
                        eprintln!("History is empty.");
                    } else {
                        for (i, entry) in entries.iter().enumerate() {
                            println!("#{} {}", i + 1, format_timestamp(entry.timestamp));
                            print_generated(&entry.output);
                            println!();
                        }
                    }
                }
                HistoryAction::Clear => {
                    store.clear()?;
                    eprintln!("History cleared.");
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
