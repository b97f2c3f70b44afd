//! recast CLI
//!
//! Generate Puppeteer/Playwright scripts from recorded browser sessions and
//! manage stored recordings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use recast::prelude::*;

#[derive(Parser)]
#[command(name = "recast")]
#[command(about = "Compile recorded browser sessions into Puppeteer and Playwright scripts")]
#[command(version)]
struct Cli {
    /// Log optimizer and generator details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate scripts from a recording
    Generate {
        /// Recording file (.json or .jsonl) or stored recording name
        file: String,

        #[arg(short, long, value_enum, default_value = "both")]
        target: Target,

        /// Options file (TOML). Defaults to ~/.recast/config.toml when present
        #[arg(long)]
        config: Option<PathBuf>,

        /// Wrap the script in an async IIFE
        #[arg(long)]
        wrap_async: bool,

        /// Launch a visible browser
        #[arg(long)]
        headed: bool,

        #[arg(long)]
        no_wait_for_navigation: bool,

        #[arg(long)]
        no_wait_for_selector: bool,

        #[arg(long)]
        no_blank_lines: bool,

        /// Playwright: wait for network idle after each click
        #[arg(long)]
        network_idle: bool,

        /// Fail on events no generator understands
        #[arg(long)]
        strict: bool,

        /// Print a JSON envelope instead of plain scripts
        #[arg(long)]
        json: bool,
    },

    /// Print the optimized event list
    Optimize {
        file: String,
    },

    /// Copy a recording into storage
    Import {
        file: String,

        /// Name to store it under
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List stored recordings
    List,

    /// Show recording info
    Show {
        file: String,

        /// Show all events
        #[arg(long)]
        all: bool,
    },

    /// Delete a stored recording
    Delete {
        file: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Puppeteer,
    Playwright,
    Both,
}

#[derive(Serialize)]
struct Output<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Error>,
}

impl<T: Serialize> Output<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }
    fn err(e: Error) -> Output<()> {
        Output { success: false, data: None, error: Some(e) }
    }
}

fn print_json<T: Serialize>(output: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            file,
            target,
            config,
            wrap_async,
            headed,
            no_wait_for_navigation,
            no_wait_for_selector,
            no_blank_lines,
            network_idle,
            strict,
            json,
        } => {
            let mut options = load_options(config.as_deref())?;
            options.wrap_async |= wrap_async;
            options.headless &= !headed;
            options.wait_for_navigation &= !no_wait_for_navigation;
            options.wait_for_selector_on_click &= !no_wait_for_selector;
            options.blank_lines_between_blocks &= !no_blank_lines;
            options.wait_for_network_idle_after_click |= network_idle;
            generate(&file, target, options, strict, json)?;
        }
        Commands::Optimize { file } => {
            let recording = open(&file)?;
            print_json(&optimize(&recording.events))?;
        }
        Commands::Import { file, name } => {
            import(&file, name)?;
        }
        Commands::List => {
            list()?;
        }
        Commands::Show { file, all } => {
            show(&file, all)?;
        }
        Commands::Delete { file } => {
            let storage = RecordingStorage::new()?;
            storage.delete(&file)?;
            println!("Deleted: {}", file);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit config file, else the one in the storage dir when it exists
fn load_options(path: Option<&Path>) -> Result<GeneratorOptions> {
    if let Some(path) = path {
        return Ok(GeneratorOptions::load(path)?);
    }
    let default_path = std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".recast").join("config.toml"));
    match default_path {
        Some(p) if p.exists() => {
            tracing::debug!(path = %p.display(), "loading options");
            Ok(GeneratorOptions::load(&p)?)
        }
        _ => Ok(GeneratorOptions::default()),
    }
}

/// A path on disk wins over a stored recording of the same name
fn open(file: &str) -> Result<Recording> {
    let path = Path::new(file);
    if path.exists() {
        return read_recording(path);
    }
    let storage = RecordingStorage::new()?;
    storage
        .load(file)
        .with_context(|| format!("no file or stored recording named {}", file))
}

fn generate(file: &str, target: Target, options: GeneratorOptions, strict: bool, json: bool) -> Result<()> {
    let recording = open(file)?;

    if strict {
        if let Err(e) = validate(&recording.events) {
            if json {
                print_json(&Output::<()>::err(e))?;
                std::process::exit(1);
            }
            return Err(e.into());
        }
    }

    let playwright_first = options.show_playwright_first;
    let code = CodeGenerator::with_options(options).generate(&recording.events);

    if json {
        return print_json(&Output::ok(&code));
    }

    match target {
        Target::Puppeteer => print!("{}", code.puppeteer),
        Target::Playwright => print!("{}", code.playwright),
        Target::Both => {
            for (i, (library, script)) in code.ordered(playwright_first).iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("// ---- {} ----", library);
                print!("{}", script);
            }
        }
    }
    Ok(())
}

fn import(file: &str, name: Option<String>) -> Result<()> {
    let mut recording = read_recording(Path::new(file))?;
    if let Some(name) = name {
        recording.name = name;
    }
    let storage = RecordingStorage::new()?;
    let path = storage.save(&recording)?;
    println!("Saved {} events: {}", recording.len(), path.display());
    Ok(())
}

fn list() -> Result<()> {
    let storage = RecordingStorage::new()?;
    let files = storage.list()?;

    if files.is_empty() {
        println!("No recordings saved.");
    } else {
        for f in files {
            println!("{}", f);
        }
    }

    Ok(())
}

fn show(file: &str, all: bool) -> Result<()> {
    let recording = open(file)?;
    let optimized = optimize(&recording.events);

    println!("Name: {}", recording.name);
    if let Some(at) = recording.recorded_at {
        println!("Recorded: {}", at.to_rfc3339());
    }
    println!("Events: {} ({} after optimizing)", recording.len(), optimized.len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for e in &recording.events {
        *counts.entry(e.action.as_str()).or_default() += 1;
    }

    println!("\nSummary:");
    for (action, count) in &counts {
        println!("  {}: {}", action, count);
    }

    if all {
        println!("\nEvents:");
        for (i, e) in recording.events.iter().enumerate() {
            println!("{}: {}", i, serde_json::to_string(e)?);
        }
    }

    Ok(())
}
