// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! WhisperLens: chat screenshot tone analysis
//!
//! Interactive session shell plus one-shot analysis from the command line.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use whisperlens::analyzers::AnalysisOption;
use whisperlens::config::AppConfig;
use whisperlens::{shell, App, Result};

/// WhisperLens CLI - chat screenshot tone analysis
#[derive(Parser, Debug)]
#[command(name = "whisperlens")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "0.1.0")]
#[command(about = "Analyze the tone and intent behind chat screenshots", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive session (default)
    Shell,

    /// Analyze a set of screenshots once
    Analyze {
        /// Screenshots, in conversation order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Analysis option (response-advice, tone-analysis, hidden-intentions, relationship-dynamics)
        #[arg(short, long)]
        option: Option<AnalysisOption>,

        /// Context for the analysis
        #[arg(long, default_value = "")]
        comment: String,

        /// Print the saved history record instead of the bare result
        #[arg(long)]
        save: bool,
    },

    /// List analysis options
    Options,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Shell) | None => shell::run(App::new(&config)).await,
        Some(Commands::Analyze { images, option, comment, save }) => {
            run_analyze(config, images, option, comment, save, &cli.format).await
        }
        Some(Commands::Options) => run_options(&cli.format),
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
    }
}

/// Run one import / analyze / save cycle
async fn run_analyze(
    config: AppConfig,
    images: Vec<PathBuf>,
    option: Option<AnalysisOption>,
    comment: String,
    save: bool,
    format: &str,
) -> Result<()> {
    let mut app = App::new(&config);
    app.session_mut().set_onboarded(true);

    let requested = images.len();
    let added = app.import(images).await;
    if added.len() < requested {
        warn!("Imported {} of {} screenshots", added.len(), requested);
    }

    if let Some(option) = option {
        app.session_mut().set_selected_analysis_option(option);
    }

    app.start_analysis(comment)?;
    let result = app.run_analysis().await?;

    if save {
        if let Some(entry) = app.save_result() {
            match format {
                "json" => println!("{}", serde_json::to_string_pretty(&entry)?),
                _ => {
                    println!("{} [{}]", entry.tone.label(), entry.selected_option.title());
                    println!("{}", entry.advice);
                    println!("Saved as {} ({} screenshot(s))", entry.id, entry.images.len());
                }
            }
        }
        return Ok(());
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            println!("Ton détecté: {}", result.tone.label());
            println!("{}", result.advice);
        }
    }

    Ok(())
}

/// List the analysis options
fn run_options(format: &str) -> Result<()> {
    match format {
        "json" => {
            let output: Vec<serde_json::Value> = AnalysisOption::ALL
                .iter()
                .map(|o| {
                    serde_json::json!({
                        "tag": o.tag(),
                        "title": o.title(),
                        "description": o.description(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            for option in AnalysisOption::ALL {
                println!("{:<22} {} - {}", option.tag(), option.title(), option.description());
            }
        }
    }
    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            info!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Analysis delay: {} ms", config.analysis.delay_ms);
            println!("  Default option: {}", config.analysis.default_option);
            println!("  Selection limit: {}", config.acquisition.selection_limit);
        }
    }

    Ok(())
}
