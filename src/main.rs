mod cli;

use arrbridge::clients::{BazarrClient, PlexClient, SonarrClient};
use arrbridge::command::TokioClock;
use arrbridge::config::{self, Config};
use arrbridge::paths::PathRoots;
use arrbridge::workflow::{self, Outcome};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, RootArgs, ServiceArgs};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "arrbridge=trace".to_string()
        } else {
            "arrbridge=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::PlexRefresh {
            file,
            section,
            url,
            token,
            roots,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            run(plex_refresh(&config, file.as_deref(), section, url, token, roots))?
        }
        Commands::BazarrSearch {
            file,
            service,
            roots,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            run(bazarr_search(&config, &file, service, roots))?
        }
        Commands::SonarrRename { folder, service } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            run(sonarr_rename(&config, &folder, service))?
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            return validate_config(path.as_deref());
        }
        Commands::Version => {
            println!("arrbridge {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };

    println!("{}", outcome);
    let code = outcome.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn run<F: std::future::Future<Output = Result<Outcome>>>(task: F) -> Result<Outcome> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(task)
}

fn path_roots(config: &Config, roots: RootArgs) -> PathRoots {
    let mut resolved = config.paths.clone();
    if let Some(source_root) = roots.source_root {
        resolved.source_root = source_root;
    }
    if let Some(target_root) = roots.target_root {
        resolved.target_root = target_root;
    }
    resolved
}

async fn plex_refresh(
    config: &Config,
    file: Option<&str>,
    section: Option<String>,
    url: Option<String>,
    token: Option<String>,
    roots: RootArgs,
) -> Result<Outcome> {
    let plex = config
        .plex
        .clone()
        .unwrap_or_default()
        .with_overrides(url, token, section);
    config::validate_plex(&plex)?;

    let roots = path_roots(config, roots);
    let client = PlexClient::new(&plex, config.http.timeout());

    tracing::info!("Plex refresh: section={} file={:?}", plex.section_id, file);
    Ok(workflow::refresh_file(&client, client.section_id(), file, &roots).await)
}

async fn bazarr_search(config: &Config, file: &str, service: ServiceArgs, roots: RootArgs) -> Result<Outcome> {
    let bazarr = config
        .bazarr
        .clone()
        .unwrap_or_default()
        .with_overrides(service.url, service.api_key);
    config::validate_bazarr(&bazarr)?;

    let roots = path_roots(config, roots);
    let client = BazarrClient::new(&bazarr, config.http.timeout());

    Ok(workflow::search_subtitles(&client, Some(file), &roots).await)
}

async fn sonarr_rename(config: &Config, folder: &str, service: ServiceArgs) -> Result<Outcome> {
    let sonarr = config
        .sonarr
        .clone()
        .unwrap_or_default()
        .with_overrides(service.url, service.api_key);
    config::validate_sonarr(&sonarr)?;

    let client = SonarrClient::new(&sonarr, config.http.timeout());
    let settings = config.commands.poll_settings();

    Ok(workflow::refresh_and_rename(&client, &TokioClock, settings, Some(folder)).await)
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let configured = |present: bool| if present { "configured" } else { "not configured" };

    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Plex: {}", configured(config.plex.is_some()));
    println!("  Sonarr: {}", configured(config.sonarr.is_some()));
    println!("  Bazarr: {}", configured(config.bazarr.is_some()));
    if !config.paths.source_root.is_empty() {
        println!(
            "  Path remap: {} -> {}",
            config.paths.source_root, config.paths.target_root
        );
    }
    println!(
        "  Command polling: every {} ms, timeout {} ms",
        config.commands.poll_interval_ms, config.commands.timeout_ms
    );

    Ok(())
}
