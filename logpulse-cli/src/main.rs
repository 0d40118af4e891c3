//! Logpulse CLI - access-log aggregation and dashboard reporting

#![deny(warnings)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use logpulse_core::config;
use logpulse_core::html::render_html_report;
use logpulse_core::{aggregate_file, render_json, render_text, ResolvedConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

mod serve;

#[derive(Parser)]
#[command(name = "logpulse")]
#[command(about = "Access-log aggregation: top clients, hourly traffic, HTML dashboards")]
#[command(version = env!("LOGPULSE_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate an access log and render the result
    Analyze {
        /// Path to the access log (overrides config file)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Keep only the top N client addresses (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file path (for HTML format, default: logpulse-report.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the dashboard over HTTP, re-aggregating on every request
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,

        /// Path to the access log (overrides config file)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Keep only the top N client addresses (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running an aggregation
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            log,
            format,
            top,
            config: config_path,
            output,
        } => {
            let resolved = resolve_config(config_path.as_deref(), log, top)?;
            if let Some(ref path) = resolved.config_path {
                eprintln!("Using config: {}", path.display());
            }

            let summary = aggregate_file(&resolved.source_path, resolved.top_n)?;

            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&summary));
                }
                OutputFormat::Json => {
                    println!("{}", render_json(&summary));
                }
                OutputFormat::Html => {
                    let html = render_html_report(&summary, &resolved.title);
                    let output_path =
                        output.unwrap_or_else(|| PathBuf::from("logpulse-report.html"));
                    write_html_report(&output_path, &html)?;
                    eprintln!("HTML report written to: {}", output_path.display());
                }
            }
        }
        Commands::Serve {
            addr,
            log,
            top,
            config: config_path,
        } => {
            let resolved = resolve_config(config_path.as_deref(), log, top)?;
            serve::run(addr, resolved)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let cwd = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&cwd, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let cwd = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&cwd, path.as_deref())
                    .context("failed to load configuration")?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Values:");
                println!("  log file: {}", resolved.source_path.display());
                println!("  top: {}", resolved.top_n);
                println!("  title: {}", resolved.title);
            }
        },
    }

    Ok(())
}

/// Load config and apply CLI overrides (flags win over file values)
fn resolve_config(
    config_path: Option<&Path>,
    log: Option<PathBuf>,
    top: Option<usize>,
) -> anyhow::Result<ResolvedConfig> {
    let cwd = std::env::current_dir()?;
    let mut resolved =
        config::load_and_resolve(&cwd, config_path).context("failed to load configuration")?;

    if let Some(log) = log {
        resolved.source_path = log;
    }
    if let Some(top) = top {
        if top == 0 {
            anyhow::bail!("--top must be at least 1");
        }
        resolved.top_n = top;
    }

    Ok(resolved)
}

/// Write HTML report to file with atomic write pattern
fn write_html_report(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }

    // Atomic write (temp + rename pattern)
    let temp_path = path.with_extension("html.tmp");
    std::fs::write(&temp_path, html)
        .with_context(|| format!("failed to write temporary file: {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
