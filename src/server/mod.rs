//! HTTP server: shared context, router construction, and lifecycle.

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::storage::UploadStore;

pub mod error;
pub mod routes_api;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: Arc<UploadStore>,
    pub analyzer: Arc<Analyzer>,
}

impl AppContext {
    /// Build the context from config: opens the upload store and wires the
    /// analyzer with configured tool paths and timeouts.
    pub fn from_config(config: Config) -> crate::error::Result<Self> {
        let store = UploadStore::new(
            config.storage.upload_dir.clone(),
            config.storage.max_upload_bytes(),
        )?;
        let analyzer = Analyzer::new(&config.analysis, &config.tools);

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            analyzer: Arc::new(analyzer),
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The streaming handler enforces the real cap incrementally; the body
    // limit is a backstop set above it so our check always fires first.
    let body_limit = ctx.config.storage.max_upload_bytes() as usize * 2;

    let api = Router::new()
        .route("/upload", post(routes_api::upload_video))
        .route("/files/{filename}", get(routes_api::get_file))
        .route("/tools", get(routes_api::tools_report));

    let mut app = Router::new()
        .route("/health", get(routes_api::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                tower_http::services::ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(tower_http::services::ServeFile::new(index_path)),
            );
        }
    }

    app
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::from_config(config).context("Failed to initialize application")?;

    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
