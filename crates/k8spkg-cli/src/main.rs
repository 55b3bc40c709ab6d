//! Main CLI entry point for k8spkgctl

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use k8spkg_config::DEFAULT_CONFIG_FILE;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::BuildArgs;

/// k8spkgctl - Build Debian packages for Kubernetes components
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Configuration file path (defaults to k8spkg.yaml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build every package of the matrix
    Build(BuildArgs),

    /// Resolve and print channel versions without building
    Versions {
        /// Pin the Kubernetes version instead of resolving channels
        #[arg(long, value_name = "VERSION")]
        kube_version: Option<String>,

        /// Packages to resolve, comma separated
        #[arg(long, value_name = "PACKAGES")]
        packages: Option<String>,

        /// Base URL for release downloads
        #[arg(long, value_name = "URL")]
        release_download_link_base: Option<String>,
    },

    /// Validate configuration and package templates
    Validate,

    /// Remove built packages
    Clean,

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    let config_path = cli.config;

    let result = match cli.command {
        Commands::Build(args) => {
            let command = commands::BuildCommand::new(config_path, args);
            command.execute().await
        }

        Commands::Versions { kube_version, packages, release_download_link_base } => {
            let command = commands::VersionsCommand::new(
                config_path,
                kube_version,
                packages,
                release_download_link_base,
            );
            command.execute().await
        }

        Commands::Validate => {
            let command = commands::ValidateCommand::new(config_path);
            command.execute().await
        }

        Commands::Clean => {
            let command = commands::CleanCommand::new(config_path);
            command.execute().await
        }

        Commands::Init { output, force } => {
            let command = commands::InitCommand::new(output, force);
            command.execute().await
        }
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn setup_logging(verbose: u8, quiet: u8) -> Result<()> {
    let log_level = match (verbose, quiet) {
        (0, 0) => "info",
        (1, 0) => "debug",
        (_, 0) => "trace",
        (0, 1) => "warn",
        (0, 2) => "error",
        (0, _) => "off",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}
