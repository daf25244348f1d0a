//! Staticgate - allow-listed static file routes
//!
//! This is the main entry point for the Staticgate CLI. It loads a route
//! configuration and pushes single requests through it, writing the
//! response head to stderr and the body to stdout or a file.

mod routes;

use anyhow::Context;
use clap::{Parser, Subcommand};
use routes::RouteTable;
use staticgate_core::RecordedResponse;
use staticgate_core::config::{ConfigLoader, HandlerConfig, RouteConfig, StaticGateConfig};
use staticgate_static::ServeStaticConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "staticgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and list its routes
    Check {
        /// Path to the configuration (.json or .toml)
        config: PathBuf,

        /// Print the configuration rebuilt from the mounted handlers
        #[arg(long)]
        dump: bool,
    },

    /// Dispatch one request through the configured routes
    Get {
        /// Path to the configuration (.json or .toml)
        config: PathBuf,

        /// Request path, e.g. /static/report.txt?download=1
        path: String,

        /// Write the body to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve one request from a directory without a configuration file
    #[command(name = "serve-file")]
    ServeFile {
        /// Base directory
        #[arg(long)]
        root: PathBuf,

        /// Allowed extension (repeatable)
        #[arg(long = "ext", required = true)]
        extensions: Vec<String>,

        /// Request path relative to the base directory
        path: String,

        /// Write the body to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for response bodies
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { config, dump } => check(&config, dump),
        Commands::Get { config, path, output } => {
            let config = ConfigLoader::load(&config)?;
            let table = RouteTable::from_config(&config)?;
            get(&table, &path, output.as_deref())
        }
        Commands::ServeFile {
            root,
            extensions,
            path,
            output,
        } => {
            let root = root
                .canonicalize()
                .with_context(|| format!("Cannot open base directory {}", root.display()))?;
            let config = StaticGateConfig {
                routes: vec![RouteConfig {
                    path: "/".to_string(),
                    handler: ServeStaticConfig::new(root, extensions).to_args().into(),
                }],
            };
            let table = RouteTable::from_config(&config)?;
            get(&table, &path, output.as_deref())
        }
    }
}

fn check(path: &Path, dump: bool) -> anyhow::Result<ExitCode> {
    let config = ConfigLoader::load(path)?;
    let table = RouteTable::from_config(&config)?;
    if table.is_empty() {
        tracing::warn!("⚠️ {} defines no routes", path.display());
    }

    let mut problems = 0;
    for route in &config.routes {
        println!("{:<24} {}", route.path, route.handler.kind());

        if let HandlerConfig::ServeStatic { args } = &route.handler {
            if let Err(e) = ServeStaticConfig::from(args.clone()).validate() {
                problems += 1;
                tracing::error!(route = %route.path, "{}", e);
            }
        }
    }

    if dump {
        println!("{}", ConfigLoader::to_json(&table.to_config())?);
    }

    tracing::info!("✅ {} route(s) loaded, {} with problems", table.len(), problems);
    Ok(if problems == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn get(table: &RouteTable, path: &str, output: Option<&Path>) -> anyhow::Result<ExitCode> {
    let mut response = RecordedResponse::new();
    table.dispatch(path, &[], &mut response);

    let status = response.status.unwrap_or(http::StatusCode::OK);

    let mut head = std::io::stderr().lock();
    writeln!(head, "HTTP/1.1 {}", status)?;
    let mut headers: Vec<_> = response.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        writeln!(head, "{}: {}", name, value)?;
    }

    let body = response.into_body();
    match output {
        Some(file) => std::fs::write(file, &body)
            .with_context(|| format!("Failed to write body to {}", file.display()))?,
        None => std::io::stdout().lock().write_all(&body)?,
    }

    Ok(if status.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
