use anyhow::Result;
use clap::Parser;
use fusion_host::{ConsolePause, NoPause, Pause};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod launch;

use config::Config;
use launch::Launch;

#[derive(Parser)]
#[command(
    name = "fusion-launch",
    version,
    about = "Run the portable FaceFusion install with its bundled Python, FFmpeg and TensorRT"
)]
struct Cli {
    /// Install root (default: $FUSION_ROOT or the working directory)
    #[arg(long)]
    root: Option<PathBuf>,
    /// TOML profile to use instead of the built-in one
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Exit without waiting for a keypress
    #[arg(long)]
    no_pause: bool,
    /// Print the command and environment as JSON, then exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(root) = cli.root {
        config.set_root(root);
    }
    if let Some(profile) = cli.profile {
        config.profile_path = Some(profile);
    }
    if cli.no_pause || cli.dry_run {
        config.pause = false;
    }
    tracing::debug!(?config, "configuration loaded");

    let mut pause: Box<dyn Pause + Send> = if config.pause {
        Box::new(ConsolePause)
    } else {
        Box::new(NoPause)
    };

    let launch = match Launch::prepare(&config) {
        Ok(launch) => launch,
        Err(err) => {
            eprintln!("error: {err:#}");
            pause.pause();
            std::process::exit(1);
        }
    };

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&launch.describe()?)?);
        return Ok(());
    }

    let code = launch.execute(pause).await;
    std::process::exit(code);
}
