//! HTTP server initialization and runtime setup.
//!
//! Handles the SQLite pool, cache setup, service wiring and the Axum server
//! lifecycle including graceful shutdown.

use crate::application::services::AllocationService;
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{SqliteMappingStore, open_pool};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::key_generator::RandomKeyGenerator;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool (file created if missing, migrations applied)
/// - Redis cache (or NullCache fallback)
/// - Allocation service with the random key generator
/// - Axum HTTP server
///
/// Stops on SIGINT or SIGTERM. In-flight requests get
/// `SHUTDOWN_TIMEOUT_SECS` to finish before the server is dropped; the pool
/// is closed afterwards.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = open_pool(
        &config.database_url,
        config.db_max_connections,
        config.db_connect_timeout(),
    )
    .await?;
    tracing::info!("Connected to database");

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let store = Arc::new(SqliteMappingStore::new(Arc::new(pool.clone())));
    let allocation_service = AllocationService::new(store, Arc::new(RandomKeyGenerator))
        .with_max_attempts(config.max_allocation_attempts)
        .with_lock_stripes(config.url_lock_stripes);
    tracing::info!(
        max_attempts = allocation_service.max_attempts(),
        "Allocation service ready"
    );

    let state = AppState::new(Arc::new(allocation_service), cache, config.base_url.clone())
        .with_request_timeout(config.request_timeout());

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let shutdown = Arc::new(Notify::new());
    let trigger = shutdown.clone();
    let server = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(async move { trigger.notified().await });
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => result??,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining connections");
            shutdown.notify_one();

            match tokio::time::timeout(config.shutdown_timeout(), &mut server).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = config.shutdown_timeout_secs,
                        "Graceful shutdown timed out, dropping open connections"
                    );
                    server.abort();
                }
            }
        }
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}
