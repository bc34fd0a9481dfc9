//! llmsieve CLI
//!
//! Commands:
//!   serve   - Start HTTP server
//!   routes  - List routes
//!   extract - Run the extractor on saved model output
//!   run     - Call the configured provider for one route
//!   config  - Show or initialize configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use llmsieve::{build_provider, Config, RouteError, RouteOutput, RoutePipeline, RouteRegistry, RouteSpec};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "llmsieve")]
#[command(about = "LLM routes with tolerant structured-response extraction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default from config, 8005)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (default from config, 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
    },

    /// List routes
    Routes,

    /// Extract a route's result from raw model output (no model call)
    Extract {
        /// Route name
        route: String,

        /// File with the raw model output (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Call the configured provider for one route
    Run {
        /// Route name
        route: String,

        /// Request body as JSON, e.g. '{"text": "I love it"}'
        body: String,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve { port, host } => {
            let mut config = Config::resolve()?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            llmsieve::run_server(config).await?;
        }

        Commands::Routes => {
            let registry = RouteRegistry::builtin();
            println!("{} routes:\n", registry.len());
            for route in registry.iter() {
                let summary = route.summary();
                println!("  {} - {}", summary.name.cyan().bold(), summary.description);
                println!("    policy: {}  inputs: {}", summary.policy.name(), summary.inputs.join(", "));
            }
        }

        Commands::Extract { route, file } => {
            let spec = find_route(&route)?;
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            report(RoutePipeline::extract_only(&spec, &raw))?;
        }

        Commands::Run { route, body } => {
            let spec = find_route(&route)?;
            let body: serde_json::Value = serde_json::from_str(&body).context("Body is not valid JSON")?;
            let config = Config::resolve()?;
            let provider = build_provider(&config.provider)?;
            report(RoutePipeline::run(&spec, provider.as_ref(), &body).await)?;
        }

        Commands::Config { init } => {
            let path = Config::path()?;
            if init {
                if Config::exists() {
                    println!("Config already exists at {}", path.display());
                } else {
                    Config::default().save()?;
                    println!("{} Wrote {}", "✓".green(), path.display());
                }
            }

            let config = Config::resolve()?;
            println!("Config file: {}{}", path.display(), if Config::exists() { "" } else { " (not found, using defaults)" });
            println!();
            print!("{}", toml::to_string_pretty(&config).context("Failed to serialize config")?);
            match config.provider.key_env() {
                Some(var) if std::env::var(var).is_ok() => println!("\n{} {} is set", "✓".green(), var),
                Some(var) => println!("\n{} {} is not set", "✗".red(), var),
                None => {}
            }
        }
    }

    Ok(())
}

fn find_route(name: &str) -> Result<RouteSpec> {
    let registry = RouteRegistry::builtin();
    match registry.get(name) {
        Some(spec) => Ok(spec.clone()),
        None => {
            let names: Vec<&str> = registry.iter().map(|r| r.name.as_str()).collect();
            anyhow::bail!("Unknown route '{}'. Available: {}", name, names.join(", "))
        }
    }
}

fn report(result: std::result::Result<RouteOutput, RouteError>) -> Result<()> {
    match result {
        Ok(output) => {
            if output.degraded {
                eprintln!("{} using fallback:", "Degraded".yellow().bold());
                for error in &output.errors {
                    eprintln!("  - {}", error);
                }
            }
            println!("{}", serde_json::to_string_pretty(&output.result)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            for detail in e.details() {
                eprintln!("  - {}", detail);
            }
            if let RouteError::Unprocessable { raw_excerpt, .. } = &e {
                eprintln!("\nModel said: {}", raw_excerpt.dimmed());
            }
            Err(e.into())
        }
    }
}
