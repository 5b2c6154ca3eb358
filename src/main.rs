//! Emodus Engine - Emotion map backend
//!
//! The binary has two roles:
//! - `serve` (default): REST server over the file-backed collection
//! - `view`: one headless viewing context that keeps its working copy in sync
//!   and logs the marker summary whenever it changes

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emodus_engine::application::ports::outbound::EventStorePort;
use emodus_engine::application::services::{
    MarkerService, SyncBackend, SyncCoordinator, SyncMode, ViewingContext,
};
use emodus_engine::domain::services::GridClusterer;
use emodus_engine::infrastructure::broadcast::BroadcastNotifier;
use emodus_engine::infrastructure::config::AppConfig;
use emodus_engine::infrastructure::http;
use emodus_engine::infrastructure::persistence::{
    connect_sqlite, FileSlotStore, SlotEventStore, DEFAULT_SLOT,
};
use emodus_engine::infrastructure::remote_event_store::RemoteEventStore;
use emodus_engine::infrastructure::seed::generate_mock_events;
use emodus_engine::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emodus_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");

    match std::env::args().nth(1).as_deref() {
        None | Some("serve") => serve(config).await,
        Some("view") => view(config).await,
        Some(other) => bail!("Unknown command `{other}`, expected `serve` or `view`"),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Emodus Engine server");
    tracing::info!("  Data directory: {}", config.data_dir.display());

    let slots = FileSlotStore::open(&config.data_dir)
        .await
        .context("Failed to open data directory")?;
    let store: Arc<dyn EventStorePort> =
        Arc::new(SlotEventStore::new(Arc::new(slots), DEFAULT_SLOT));
    seed_if_empty(store.as_ref(), config.seed_count).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = Arc::new(AppState::new(config, store));

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn view(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Emodus Engine viewer ({:?} mode)", config.sync_mode);

    let local: Arc<dyn EventStorePort> = Arc::new(SlotEventStore::new(
        Arc::new(connect_sqlite(&config.local_db_url).await?),
        DEFAULT_SLOT,
    ));
    let backend = match config.sync_mode {
        SyncMode::Local => {
            seed_if_empty(local.as_ref(), config.seed_count).await?;
            SyncBackend::Local { store: local }
        }
        SyncMode::Remote => {
            tracing::info!("  Remote store: {}", config.remote_base_url);
            SyncBackend::Remote {
                remote: Arc::new(RemoteEventStore::new(
                    &config.remote_base_url,
                    config.request_timeout,
                )?),
                fallback: local,
            }
        }
    };

    let context = ViewingContext::new(config.poll_interval());
    tracing::info!("Viewing context {}", context.id);
    let handle = SyncCoordinator::new(context, backend, Arc::new(BroadcastNotifier::new())).spawn();

    let marker_service = MarkerService::new(GridClusterer::new(
        config.cell_constant,
        config.cluster_bypass_zoom,
    ));
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                let markers = marker_service.render(&snapshot, config.view_zoom);
                tracing::info!(
                    events = snapshot.len(),
                    clusters = markers.cluster_count,
                    individuals = markers.individual_count,
                    zoom = %markers.zoom,
                    "Working copy updated"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    handle.shutdown().await;
    tracing::info!("Viewer stopped");
    Ok(())
}

async fn seed_if_empty(store: &dyn EventStorePort, count: usize) -> anyhow::Result<()> {
    if count == 0 || !store.fetch_all().await?.is_empty() {
        return Ok(());
    }

    let events = generate_mock_events(count, &mut rand::thread_rng());
    store
        .replace_all(&events)
        .await
        .context("Failed to seed mock events")?;
    tracing::info!("Seeded {} mock events", events.len());
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
