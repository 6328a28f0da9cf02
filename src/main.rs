use anyhow::Result;
use clap::{Parser, Subcommand};
use imagegen_form::app::{summarize, App};
use imagegen_form::models::Config;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "imagegen-form")]
#[command(about = "Generate images from a text prompt")]
struct CliArgs {
    /// Use an in-memory backend instead of the HTTP service.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit one prompt and print the resulting image reference.
    Generate {
        prompt: String,
        /// Write the rendered form markup to this file.
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
    },
    /// Read prompts line by line from stdin.
    Interactive,
    /// List past generations.
    History,
    /// Check backend health.
    Health,
}

async fn run(args: CliArgs) -> imagegen_form::Result<()> {
    let mut config = Config::from_env()?;
    config.dry_run |= args.dry_run;
    let mut app = App::new(&config)?;

    match args.command {
        Command::Generate { prompt, html } => {
            let view = app.generate(&prompt).await;
            println!("{}", summarize(&view));
            if let Some(path) = html {
                app.write_html(&path)?;
            }
            if let Some(message) = view.error {
                return Err(imagegen_form::Error::Generic(message));
            }
        }
        Command::Interactive => {
            app.run_interactive(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
        Command::History => {
            let entries = app.history().await?;
            if entries.is_empty() {
                println!("No generations yet");
            }
            for entry in entries {
                println!(
                    "{}  {:<20}  {}  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.model_used,
                    entry.prompt,
                    entry.image_location().unwrap_or("-")
                );
            }
        }
        Command::Health => {
            let health = app.health().await?;
            println!("status: {}", health.status);
            println!("hugging face configured: {}", health.hugging_face_configured);
            println!("local model enabled: {}", health.local_model_enabled);
            for endpoint in &health.available_endpoints {
                println!("  {}", endpoint);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagegen_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    info!("Starting imagegen-form");

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}
