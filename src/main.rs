mod cli;

use carmine::{config, scanner, server};
use carmine_common::MediaKind;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Config file written to when no existing one is found.
const FALLBACK_CONFIG: &str = "carmine.toml";

/// Load configuration and wrap it in a settings store bound to the file it
/// came from.
fn open_settings(config_path: Option<&Path>) -> Result<config::SettingsStore> {
    let path = config::find_config(config_path);
    if path.is_none() {
        tracing::info!("No config file found, using defaults");
    }
    let config = config::load_config_or_default(path.as_deref())?;
    let path = path.unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG));
    Ok(config::SettingsStore::new(config, Some(path)))
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let settings = open_settings(config_path)?;

    // CLI flags override the file for this run only
    if host.is_some() || port.is_some() {
        settings.override_listen(host, port)?;
    }

    tracing::info!("Starting Carmine server");
    server::start_server(settings).await
}

fn parse_kind(kind: &str) -> Result<MediaKind> {
    MediaKind::from_collection(kind)
        .map(Ok)
        .unwrap_or_else(|| kind.parse::<MediaKind>())
        .with_context(|| format!("Unknown media kind: {kind}"))
}

async fn scan(kind: Option<String>, json: bool, config_path: Option<&Path>) -> Result<()> {
    let settings = open_settings(config_path)?;
    let kinds = match kind {
        Some(k) => vec![parse_kind(&k)?],
        None => MediaKind::ALL.to_vec(),
    };

    let mut all = Vec::new();
    for kind in kinds {
        let mut records = scanner::scan_roots(settings.roots(kind), Some(kind)).await?;
        scanner::sort_for_collection(&mut records, kind);
        all.extend(records);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    for record in &all {
        println!(
            "{:<6} {:>12}  {}",
            record.kind.to_string(),
            record.size,
            record.path.display()
        );
    }
    println!("{} media files", all.len());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "carmine=trace,carmine_common=debug,tower_http=debug".to_string()
        } else {
            "carmine=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Scan { kind, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(scan(kind, json, cli.config.as_deref()))
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("carmine {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            for kind in MediaKind::ALL {
                println!(
                    "  {} roots: {}",
                    kind.collection(),
                    config.media.roots(kind).len()
                );
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
