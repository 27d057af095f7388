// Ideaforge - startup idea to MVP blueprint pipeline
// Main entry point

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ideaforge::agents::StageOutcome;
use ideaforge::config::load_config;
use ideaforge::store::{OutputStore, SqliteStore};
use ideaforge::{server, Pipeline};

#[derive(Parser)]
#[command(name = "ideaforge", version, about = "Startup idea to MVP blueprint pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Tracing filter; falls back to RUST_LOG, then "info"
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Overrides server.bind_address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run all three stages for one idea and store the result
    Run {
        #[arg(long)]
        idea: String,
        #[arg(long, default_value = "cli")]
        user: String,
        #[arg(long)]
        session: Option<String>,
    },
    /// List stored outputs for a user, newest first
    History {
        #[arg(long)]
        user: String,
    },
    /// Show the stored output for a session
    Session {
        #[arg(long)]
        id: String,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn stage_json<T: serde::Serialize>(outcome: &StageOutcome<T>) -> Result<Value> {
    Ok(json!({
        "status": outcome.status_label(),
        "reasons": outcome.reasons(),
        "record": outcome.record().map(serde_json::to_value).transpose()?,
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = load_config()?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
                config.validate()?;
            }
            let pipeline = Arc::new(Pipeline::from_config(&config)?);
            server::serve(pipeline, &config.server).await?;
        }
        Commands::Run {
            idea,
            user,
            session,
        } => {
            if idea.trim().chars().count() < 5 {
                bail!("Please provide a valid startup idea with at least 5 characters");
            }
            let session = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let pipeline = Pipeline::from_config(&config)?;
            let run = pipeline.run(&idea, &user, &session).await;

            let mut report = json!({
                "user_id": user,
                "session_id": session,
                "market_analyst": stage_json(&run.market)?,
            });
            if let Some(product) = &run.product {
                report["product_manager"] = stage_json(product)?;
            }
            if let Some(technical) = &run.technical {
                report["technical_architect"] = stage_json(technical)?;
            }
            report["stored_id"] = json!(run.stored.as_ref().map(|s| s.id.clone()));
            println!("{}", serde_json::to_string_pretty(&report)?);

            if let Some(reason) = run.failure() {
                bail!("Pipeline stopped: {}", reason);
            }
        }
        Commands::History { user } => {
            let store = SqliteStore::open(&config.store.db_path)?;
            let outputs = store.get_by_user(&user).await?;
            println!("{}", serde_json::to_string_pretty(&json!({ "outputs": outputs }))?);
        }
        Commands::Session { id } => {
            let store = SqliteStore::open(&config.store.db_path)?;
            match store.get_by_session(&id).await? {
                Some(output) => println!("{}", serde_json::to_string_pretty(&output)?),
                None => bail!("No output found for session {}", id),
            }
        }
    }

    Ok(())
}
