use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use service::{MongoStore, RecipeService};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the router around an explicitly constructed MongoDB store.
pub fn build_app(cfg: &AppConfig, store: Arc<MongoStore>) -> Router {
    let recipes = Arc::new(RecipeService::new(store));
    routes::build_router(ServerState::new(recipes), build_cors(), &cfg.server.public_dir)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; shutdown only via process exit");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: serve with an already-loaded config until Ctrl+C, then release the store.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.server.public_dir).await;

    let store = Arc::new(MongoStore::new(cfg.database.clone()));
    // 启动时尝试连接；失败不退出，后续请求会再次尝试
    if let Err(e) = store.connect().await {
        warn!(error = %e, event = "mongodb_connect_failed", "MongoDB not reachable at startup; will retry on demand");
    }

    let app = build_app(&cfg, Arc::clone(&store));

    let (host, port) = cfg.server.bind_target();
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|source| StartupError::Bind { addr: format!("{host}:{port}"), source })?;
    let addr = listener.local_addr()?;
    info!(%addr, event = "listening", "server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_binds_the_given_config() -> anyhow::Result<()> {
        let taken = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = taken.local_addr()?.port();

        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = port;
        cfg.database.uri = "not a uri".into();

        let err = run(cfg).await.expect_err("port already in use");
        match err.downcast_ref::<StartupError>() {
            Some(StartupError::Bind { addr, .. }) => assert_eq!(addr, &format!("127.0.0.1:{port}")),
            None => panic!("expected bind error, got {err}"),
        }
        Ok(())
    }
}
