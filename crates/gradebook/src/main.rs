use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gradebook::grades::PlannerConfig;
use gradebook::server::create_router;
use gradebook::types::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gradebook", version, about = "Grade tracking and GPA planning service")]
struct Args {
    /// Address to bind to
    #[arg(long, env = "GRADEBOOK_ADDRESS", default_value = "127.0.0.1")]
    address: String,

    /// Port to listen on
    #[arg(long, env = "GRADEBOOK_PORT", default_value_t = 8080)]
    port: u16,

    /// Planner configuration file (JSON)
    #[arg(long, env = "GRADEBOOK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = PlannerConfig::load_or_default(args.config.as_deref())
        .context("Failed to load planner configuration")?;
    info!(
        "Loaded planner config (min pass grade {}, {} final exam keywords)",
        config.min_pass_grade,
        config.final_exam_keywords.len()
    );

    let app_state = Arc::new(AppState::new(config));
    let router = create_router(app_state);

    let addr: SocketAddr = format!("{}:{}", args.address, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.address, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Gradebook server listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Gradebook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
