use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arrbridge")]
#[command(author, version, about = "Refresh and reconcile media files across Plex, Sonarr and Bazarr")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the Plex item for a file, falling back to its season or folder
    PlexRefresh {
        /// Media file to refresh; refreshes the whole section when omitted
        file: Option<String>,

        /// Library section id
        #[arg(long)]
        section: Option<String>,

        /// Plex server URL
        #[arg(long)]
        url: Option<String>,

        /// Plex token
        #[arg(long)]
        token: Option<String>,

        #[command(flatten)]
        roots: RootArgs,
    },

    /// Ask Bazarr to search subtitle providers for the episode owning a file
    BazarrSearch {
        /// Media file
        file: String,

        #[command(flatten)]
        service: ServiceArgs,

        #[command(flatten)]
        roots: RootArgs,
    },

    /// Refresh a Sonarr series and rename files that drifted from the naming scheme
    SonarrRename {
        /// Series folder (or a season folder inside it)
        folder: String,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Path prefix translation between the calling host and the service host.
#[derive(Args, Debug, Default)]
pub struct RootArgs {
    /// Prefix used by the calling host
    #[arg(long)]
    pub source_root: Option<String>,

    /// Prefix the service sees instead
    #[arg(long)]
    pub target_root: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Service base URL
    #[arg(long)]
    pub url: Option<String>,

    /// Service API key
    #[arg(long)]
    pub api_key: Option<String>,
}
