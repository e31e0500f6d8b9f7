use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};
use tusina_store::RecordStore;

use crate::config::LocConfig;
use crate::cors::{OriginPolicy, cors};
use crate::error::LookupError;
use crate::lookup::{LookupState, lookup};

pub const LOOKUP_PATH: &str = "/api/loc";

/// Build the axum router for the lookup service.
///
/// Layers, outermost first: CORS (preflight short-circuit and headers on
/// every reply), panic catcher (→ 400 `bad_request`), routes.
/// Only `GET /api/loc` is routed; any other method or path is 404.
/// HEAD is rejected explicitly since axum would otherwise hand it to the
/// GET handler.
pub fn router<S>(state: LookupState<S>, policy: OriginPolicy) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            LOOKUP_PATH,
            get(lookup::<S>)
                .head(not_found)
                .fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(Arc::new(policy), cors))
}

async fn not_found() -> LookupError {
    LookupError::NotFound
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!(panic = %detail, "Request handler panicked");

    LookupError::BadRequest("request handler panicked".to_string()).into_response()
}

/// Starts the location lookup HTTP server.
///
/// Listens on `0.0.0.0:{port}` until SIGINT/SIGTERM, then drains in-flight
/// requests.
pub async fn serve<S>(
    config: LocConfig,
    store: S,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    S: RecordStore + 'static,
{
    if config.allowed_origins.is_empty() {
        warn!("No allowed origins configured; every Origin will receive `null`");
    }
    let policy = OriginPolicy::new(config.allowed_origins, config.cors_max_age);
    info!(origins = ?policy.allowed_origins(), "CORS allow-list loaded");

    let app = router(LookupState::new(store), policy);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Location lookup server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let signal = wait_for_shutdown().await;
            info!(signal = ?signal, "Shutdown requested, draining in-flight lookups");
        })
        .await?;

    info!("Location lookup server stopped");
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum ShutdownSignal {
    Interrupt,
    Terminate,
}

async fn wait_for_shutdown() -> ShutdownSignal {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => tokio::select! {
                _ = interrupt() => ShutdownSignal::Interrupt,
                _ = terminate.recv() => ShutdownSignal::Terminate,
            },
            Err(error) => {
                warn!(error = %error, "SIGTERM handler unavailable; only SIGINT stops the server");
                interrupt().await;
                ShutdownSignal::Interrupt
            }
        }
    }

    #[cfg(not(unix))]
    {
        interrupt().await;
        ShutdownSignal::Interrupt
    }
}

// Never resolves if the handler cannot be installed.
async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
}
