use std::{future::Future, sync::Arc, time::Duration};

use configs::{AppConfig, StoreBackend};
use service::storage::{InMemoryKvStore, RedisKvStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured store once; the handle lives as long as the server.
pub async fn connect_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let project_name = cfg.app.project_name.clone();
    match cfg.store.backend {
        StoreBackend::Redis => {
            let timeout = Duration::from_secs(cfg.redis.connect_timeout_secs);
            let store = RedisKvStore::connect(&cfg.redis.url, timeout).await?;
            Ok(AppState::new(Arc::new(store), project_name))
        }
        StoreBackend::Memory => {
            warn!("using in-memory store; bindings are lost on restart");
            Ok(AppState::new(Arc::new(InMemoryKvStore::new()), project_name))
        }
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
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
    info!(event = "shutdown_signal", "shutdown signal received");
}

/// Connect the store, bind, and serve until `shutdown` resolves.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = connect_state(&cfg).await?;
    let app = routes::build_router(state, &cfg.app.api_v1_prefix, build_cors());

    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        project = %cfg.app.project_name,
        prefix = %cfg.app.api_v1_prefix,
        backend = ?cfg.store.backend,
        "starting phone address server"
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    // The router, and with it the last store handle, is dropped here.
    info!(event = "store_released", "server stopped; store connection closed");
    Ok(())
}

/// Public entry: serve with the given config until Ctrl+C/SIGTERM.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    serve(cfg, shutdown_signal()).await
}
