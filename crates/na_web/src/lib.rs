use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use na_core::{Error, Result};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub mod handlers;
pub mod state;

pub use state::AppState;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, Default)]
pub struct WebConfig {
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

fn cors_layer(config: &WebConfig) -> Result<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| Error::Config(format!("invalid CORS origin {:?}: {}", origin, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET]))
}

pub async fn create_app(state: AppState, config: &WebConfig) -> Result<Router> {
    let cors = cors_layer(config)?;

    Ok(Router::new()
        .route("/news", get(handlers::get_news))
        .layer(cors)
        .with_state(Arc::new(state)))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// Resolves once `signal` fires. If the signal handler cannot be installed
/// the server keeps running instead of stopping immediately.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("👋 Shutting down"),
        Err(e) => {
            tracing::error!("❌ Could not listen for Ctrl-C, graceful shutdown disabled: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

pub mod prelude {
    pub use crate::{create_app, AppState, WebConfig};
    pub use na_core::{Article, Error, NewsPage, NewsRequest, Result};
}
