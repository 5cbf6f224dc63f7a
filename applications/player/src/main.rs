/// Duet Player - music and video screens in the terminal
use clap::{Parser, Subcommand};
use duet_core::MediaKind;
use duet_player::{app, PlayerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "duet-player")]
#[command(about = "Play local and remote music and video", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./duet.toml when present)
    #[arg(short, long, global = true, env = "DUET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the music screen
    Music,
    /// Open the video screen
    Video,
    /// Print the merged library and exit
    Scan {
        /// Only scan one kind
        #[arg(short, long, value_parser = ["music", "video"])]
        only: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = PlayerConfig::load(cli.config.as_deref())?;

    // Initialize tracing; logs go to stderr so they stay out of the screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    config.validate()?;

    match cli.command {
        Commands::Music => app::run_screen(&config, MediaKind::Audio).await?,
        Commands::Video => app::run_screen(&config, MediaKind::Video).await?,
        Commands::Scan { only } => {
            let kinds = match only.as_deref() {
                Some("music") => vec![MediaKind::Audio],
                Some("video") => vec![MediaKind::Video],
                _ => vec![MediaKind::Audio, MediaKind::Video],
            };
            app::run_scan(&config, &kinds).await?;
        }
    }

    Ok(())
}
