//! DevCare CLI
//!
//! Terminal front end for the DevCare ergonomics backend:
//! - Watch the live dashboard
//! - Print a one-off status panel
//! - Record a break or reset statistics
//! - Check backend health

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use devcare::actions::{ActionDispatcher, ActionOutcome, AssumeYes, Confirm, PromptConfirm};
use devcare::client::{DevCareClient, PayloadShape, SharedBackend};
use devcare::config::{generate_default_config, Config, ConfigSearch};
use devcare::notification::NotificationTray;
use devcare::poller::{PollOutcome, StatusPoller};
use devcare::session::DashboardSession;
use devcare::view::{draw, DashboardView};

#[derive(Parser)]
#[command(name = "devcare")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal dashboard for the DevCare ergonomics backend")]
#[command(long_about = "DevCare watches your posture, coding time, stress and typing speed.\nRun without a subcommand to open the live dashboard.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL (overrides backend.url)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Status payload shape (auto, nested, flat)
    #[arg(long, global = true)]
    pub shape: Option<PayloadShape>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Live dashboard (b = break, r = reset, q = quit)
    Watch,

    /// Print the dashboard once
    Status {
        /// Print the raw telemetry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a break
    Break,

    /// Reset all statistics
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check backend health
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let search = match &cli.config {
        Some(path) => ConfigSearch {
            config: Config::load_with_env(path)?,
            loaded_from: Some(path.clone()),
            errors: Vec::new(),
        },
        None => Config::search(&Config::default_paths()),
    };
    let mut config = search.config.clone();
    if let Some(url) = cli.url {
        config.backend.url = url;
    }
    if let Some(shape) = cli.shape {
        config.backend.payload_shape = shape;
    }

    devcare::logging::init(&config.logging);
    search.report();

    let command = cli.command.unwrap_or(Commands::Watch);

    match command {
        Commands::Watch => {
            let backend = connect(&config)?;
            tracing::info!(url = %config.backend.url, "DevCare dashboard v{}", env!("CARGO_PKG_VERSION"));

            let shutdown = CancellationToken::new();
            let on_signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_signal.cancel();
                }
            });

            let session = DashboardSession::new(backend, &config, std::io::stdout());
            let input = BufReader::new(tokio::io::stdin());
            session.run(input, shutdown).await?;

            println!();
            std::io::stdout().flush()?;
            // A pending stdin read cannot be cancelled and would block runtime shutdown
            std::process::exit(0);
        }

        Commands::Status { json } => {
            let backend = connect(&config)?;
            let outcome = StatusPoller::fetch(backend.as_ref()).await;
            if json {
                let value = match &outcome {
                    PollOutcome::Connected(snapshot) => serde_json::json!({
                        "connected": true,
                        "telemetry": snapshot,
                    }),
                    PollOutcome::Disconnected { reason } => serde_json::json!({
                        "connected": false,
                        "reason": reason,
                    }),
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let mut view = DashboardView::new();
                view.apply(&outcome, chrono::Local::now());
                print!("{}", draw(&view, &[]));
            }
        }

        Commands::Break => {
            run_action(connect(&config)?, &config, |dispatcher| async move {
                dispatcher.take_break().await
            })
            .await?;
        }

        Commands::Reset { yes } => {
            run_action(connect(&config)?, &config, |dispatcher| async move {
                if yes {
                    dispatcher.reset_stats(&mut AssumeYes).await
                } else {
                    let mut lines = BufReader::new(tokio::io::stdin()).lines();
                    let mut confirm = PromptConfirm::new(&mut lines, std::io::stdout());
                    dispatcher.reset_stats(&mut confirm as &mut dyn Confirm).await
                }
            })
            .await?;
        }

        Commands::Health => match DevCareClient::new(config.backend.clone())?
            .health_check()
            .await
        {
            Ok(report) => {
                println!("DevCare backend at {}", config.backend.url);
                println!();
                println!("Status: {}", report.status);
                if !report.components.is_empty() {
                    println!();
                    println!("Components:");
                    for (name, available) in &report.components {
                        let state = if *available { "available" } else { "unavailable" };
                        println!("  {:<12} {}", name, state);
                    }
                }
                if !report.is_ok() {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Cannot connect to DevCare backend at {}", config.backend.url);
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the DevCare backend is running, or pass --url.");
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn connect(config: &Config) -> anyhow::Result<SharedBackend> {
    let client = DevCareClient::new(config.backend.clone())
        .context("Failed to create HTTP client")?;
    Ok(Arc::new(client))
}

/// Run one action and print its result, followed by the refreshed panel
async fn run_action<F, Fut>(backend: SharedBackend, config: &Config, action: F) -> anyhow::Result<()>
where
    F: FnOnce(ActionDispatcher) -> Fut,
    Fut: std::future::Future<Output = ActionOutcome>,
{
    let (poller, mut outcomes) = StatusPoller::new(backend.clone(), config.poller.interval());
    let notifications = NotificationTray::new(config.notifications.display_duration());
    let dispatcher = ActionDispatcher::new(backend, poller, notifications.clone());

    match action(dispatcher).await {
        ActionOutcome::Completed => {
            for message in notifications.active().await {
                println!("{}", message);
            }

            // The dispatcher already issued the follow-up read
            let wait = config.backend.request_timeout() + Duration::from_millis(500);
            if let Ok(Some(outcome)) = tokio::time::timeout(wait, outcomes.recv()).await {
                let mut view = DashboardView::new();
                view.apply(&outcome, chrono::Local::now());
                println!();
                print!("{}", draw(&view, &[]));
            }
            Ok(())
        }
        ActionOutcome::Rejected { message } => {
            eprintln!(
                "Backend rejected the request{}",
                message.map(|m| format!(": {}", m)).unwrap_or_default()
            );
            Ok(())
        }
        ActionOutcome::Failed { reason } => {
            anyhow::bail!("Request failed: {}", reason)
        }
        ActionOutcome::Declined => {
            println!("Cancelled.");
            Ok(())
        }
    }
}
