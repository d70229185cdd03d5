//! PestVision Server
//!
//! HTTP server for the crop pest classification demo: serves the demo page,
//! a prediction endpoint for uploaded images, the optional demo-training
//! action and a health check.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pestvision::backend::{backend_name, default_device};

use crate::state::{AppState, ServerConfig};

/// PestVision demo server
#[derive(Parser, Debug)]
#[command(name = "pestvision-server")]
#[command(version = "0.1.0")]
#[command(about = "HTTP server for the PestVision pest classification demo")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the persisted model artifact
    #[arg(long, env = "PESTVISION_MODEL_DIR", default_value = "model")]
    model_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("PestVision Server v{}", env!("CARGO_PKG_VERSION"));
    info!("  Backend:   {}", backend_name());
    info!("  Model dir: {:?}", cli.model_dir);

    let state = Arc::new(AppState::new(ServerConfig {
        model_dir: cli.model_dir,
    }));

    // Warm the provider so a corrupt artifact fails at startup, not on the
    // first prediction. A missing artifact just logs and builds fresh.
    state.provider.get_or_init(&default_device())?;

    let app = Router::new()
        .route("/", get(routes::page::index))
        .route("/health", get(routes::health::health_check))
        .route("/predict", post(routes::predict::predict))
        .route("/train", post(routes::train::train))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
