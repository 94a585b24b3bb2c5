//! Record Label League binary entrypoint wiring REST, SSE and the season store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use record_label_league::{
    config::AppConfig,
    dao::season_store::memory::MemorySeasonStore,
    routes,
    services::sse_events::broadcast_system_status,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());

    spawn_degraded_notifier(app_state.clone());
    install_storage(app_state.clone()).await;

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Supervise MongoDB when `MONGO_URI` is set, otherwise keep seasons in memory.
#[cfg(feature = "mongo-store")]
async fn install_storage(state: SharedState) {
    use record_label_league::{
        dao::{
            season_store::{
                SeasonStore,
                mongodb::{MongoConfig, MongoSeasonStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    if env::var_os("MONGO_URI").is_none() {
        install_memory_store(state).await;
        return;
    }

    info!("MONGO_URI set; supervising MongoDB season store");
    tokio::spawn(storage_supervisor::run(state, || async {
        let config = MongoConfig::from_env().await?;
        let store = MongoSeasonStore::connect(config).await?;
        Ok::<Arc<dyn SeasonStore>, StorageError>(Arc::new(store))
    }));
}

#[cfg(not(feature = "mongo-store"))]
async fn install_storage(state: SharedState) {
    install_memory_store(state).await;
}

async fn install_memory_store(state: SharedState) {
    info!("using in-memory season store");
    state
        .install_season_store(Arc::new(MemorySeasonStore::new()))
        .await;
}

/// Forward degraded mode changes to every season stream.
fn spawn_degraded_notifier(state: SharedState) {
    let mut watcher = state.degraded_watcher();
    tokio::spawn(async move {
        while watcher.changed().await.is_ok() {
            let degraded = *watcher.borrow_and_update();
            info!(degraded, "storage availability changed");
            broadcast_system_status(&state, degraded);
        }
    });
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
