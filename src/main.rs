//! EduNexus - school resource portal
//!
//! Serves the portal API, or runs one-off catalogue searches and assistant
//! questions from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use edunexus::{
    api::{build_app, AppState},
    assistant::types::Conversation,
    catalogue::{
        policy,
        types::{ActiveCategory, Role},
        CatalogueStore,
    },
    config::{AuthConfig, PortalConfig},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "edunexus")]
#[command(author = "EduNexus Team")]
#[command(version)]
#[command(about = "School resource portal with role-aware catalogue and assistant")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "EDUNEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the portal HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Enable the demonstration accounts
        #[arg(long)]
        demo_accounts: bool,
    },

    /// Search the catalogue as a given role
    Search {
        /// Search term
        #[arg(default_value = "")]
        query: String,

        /// Viewer role (anonymous when omitted)
        #[arg(short, long)]
        role: Option<Role>,

        /// Category id or "all"
        #[arg(short = 'C', long, default_value = "all")]
        category: ActiveCategory,
    },

    /// Ask the assistant a single question
    Ask {
        /// Question text
        message: String,

        /// Viewer role (anonymous when omitted)
        #[arg(short, long)]
        role: Option<Role>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("edunexus={},tower_http={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PortalConfig::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            demo_accounts,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if demo_accounts {
                config.auth.accounts.extend(AuthConfig::demo().accounts);
            }
            run_server(config).await?;
        }
        Commands::Search {
            query,
            role,
            category,
        } => {
            run_search(&query, role, category).await?;
        }
        Commands::Ask { message, role } => {
            run_ask(config, &message, role).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(config: PortalConfig) -> Result<()> {
    tracing::info!("Starting EduNexus portal");

    let state = AppState::from_config(&config)?;
    let app = build_app(&state, &config.server.cors_origins);

    let sessions = state.sessions.clone();
    let idle_ms = config.server.session_idle_ms();
    let every = Duration::from_secs(config.server.cleanup_interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            sessions.cleanup_inactive(idle_ms).await;
        }
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("EduNexus listening on http://{}. Press Ctrl+C to stop.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

async fn run_search(query: &str, role: Option<Role>, category: ActiveCategory) -> Result<()> {
    let store = CatalogueStore::with_seed()?;
    let role = role.unwrap_or(policy::ANONYMOUS_BROWSING_ROLE);
    let heading = store.heading(category);
    let results = store.query(role, category, query).await;

    println!(
        "{} ({} of {} as {})",
        heading.label,
        results.len(),
        store.resource_count().await,
        role
    );
    println!();
    for resource in results {
        let star = if resource.is_featured { "*" } else { " " };
        println!(
            "{} [{}] {} ({}, {:?})",
            star, resource.id, resource.title, resource.category_id, resource.kind
        );
    }
    Ok(())
}

async fn run_ask(config: PortalConfig, message: &str, role: Option<Role>) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let role = role.unwrap_or(policy::ANONYMOUS_BROWSING_ROLE);
    let conversation = Conversation::new();

    let reply = state
        .bridge
        .ask(message, conversation.messages(), role)
        .await;

    println!("{}", reply.text);
    Ok(())
}

fn show_config(config: Option<&PortalConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", config.to_toml()?);
    Ok(())
}
