use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod artifacts;
mod audit;
mod cli;
mod config;
mod errors;
mod extract;
mod model;
mod pipeline;
mod profile;
mod prompt;
mod provider;
mod render;
mod store;

use config::Config;
use store::DynStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let default_filter = if args.debug { "chefai=debug" } else { "chefai=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let cfg = Config::load(args.config.as_deref()).context("loading config")?;

    match args.command {
        cli::Command::Serve { bind } => serve(cfg, bind).await,
        cli::Command::Generate { profile, json } => generate_once(cfg, profile, json).await,
    }
}

async fn serve(cfg: Config, bind_override: Option<String>) -> anyhow::Result<()> {
    let api_key = Config::api_key();
    if api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; /api/generate will fail until it is configured");
    }

    let provider = provider::make_provider(&cfg, api_key)?;
    let store: DynStore = match &cfg.db_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using sqlite plan store");
            Box::new(store::sqlite::SqliteStore::open(path)?)
        }
        None => {
            tracing::info!("no db_path configured; plans are kept in memory only");
            Box::new(store::memory::MemoryStore::new())
        }
    };

    let state = Arc::new(api::AppState {
        provider,
        store,
        artifacts_dir: cfg.artifacts_dir.clone(),
    });

    let bind = bind_override.unwrap_or_else(|| cfg.bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(%bind, model = %cfg.model, "chefai listening");

    axum::serve(listener, api::router(state)).await?;
    Ok(())
}

async fn generate_once(cfg: Config, profile_path: PathBuf, as_json: bool) -> anyhow::Result<()> {
    let text = fs_err::read_to_string(&profile_path)?;
    let profile: profile::Profile =
        toml::from_str(&text).with_context(|| format!("parsing {}", profile_path.display()))?;

    let provider = provider::make_provider(&cfg, Config::api_key())?;
    let generated =
        pipeline::generate_plan(provider.as_ref(), &profile, cfg.artifacts_dir.as_deref()).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&generated.plan)?);
    } else {
        render::print_plan(&generated);
    }
    for w in &generated.warnings {
        tracing::warn!(warning = %w, "constraint audit");
    }
    Ok(())
}
