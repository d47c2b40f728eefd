//! milestone server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `MILESTONE_*` environment variables, connects to the backend and serves
//! shared albums over HTTP.
//!
//! ```sh
//! MILESTONE_SUPABASE_URL=https://abcd.supabase.co \
//! MILESTONE_SUPABASE_ANON_KEY=... \
//!   cargo run -p milestone-web --bin milestone
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use milestone_supabase::{SupabaseClient, SupabaseConfig};
use milestone_web::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Milestone shared album viewer")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MILESTONE").try_parsing(true))
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context(
      "missing or invalid configuration \
       (MILESTONE_SUPABASE_URL and MILESTONE_SUPABASE_ANON_KEY are required)",
    )?;
  server_cfg.validate()?;

  let backend = SupabaseClient::new(SupabaseConfig {
    url:      server_cfg.supabase_url.clone(),
    anon_key: server_cfg.supabase_anon_key.clone(),
    timeout:  server_cfg.request_timeout(),
  })
  .context("failed to build backend client")?;

  let state = AppState::new(Arc::new(backend), server_cfg.storage_policy());
  let app = milestone_web::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
