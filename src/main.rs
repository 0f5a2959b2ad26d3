//! shortsmith CLI entry point.

use anyhow::Result;
use clap::Parser;
use shortsmith::cli::{commands, Cli, Commands};
use shortsmith::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // -v flags override the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("shortsmith={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    std::fs::create_dir_all(settings.data_dir())?;
    std::fs::create_dir_all(settings.output_dir())?;

    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Generate { mode, json } => {
            commands::run_generate(mode, *json, settings).await?;
        }

        Commands::Voice { script } => {
            commands::run_voice(script, settings).await?;
        }

        Commands::Thumbnail { prompt } => {
            commands::run_thumbnail(prompt, settings).await?;
        }

        Commands::Complete { mode, channel } => {
            commands::run_complete(mode, *channel, settings).await?;
        }

        Commands::Ideas {
            channel,
            count,
            json,
        } => {
            commands::run_ideas(*channel, *count, *json, settings).await?;
        }

        Commands::Extract { file } => {
            commands::run_extract(file.as_deref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
