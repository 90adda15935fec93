//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds a full [`AppContext`] backed by a
//! temporary upload directory. The [`with_server`] constructor starts Axum on
//! a random port for HTTP-level testing.

use std::net::SocketAddr;

use tempfile::TempDir;

use clipcheck::config::Config;
use clipcheck::server::{create_router, AppContext};

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary upload directory.
pub struct TestHarness {
    pub ctx: AppContext,
    // Held so the upload directory outlives the test.
    _upload_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The upload
    /// directory is always redirected to a fresh temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let upload_dir = TempDir::new().expect("failed to create temp upload dir");
        config.storage.upload_dir = upload_dir.path().to_path_buf();

        let ctx = AppContext::from_config(config).expect("failed to build app context");

        Self {
            ctx,
            _upload_dir: upload_dir,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = create_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Path of the temporary upload directory.
    pub fn upload_dir(&self) -> &std::path::Path {
        self._upload_dir.path()
    }

    /// Number of files currently present in the upload directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self._upload_dir.path())
            .map(|rd| rd.count())
            .unwrap_or(0)
    }
}
