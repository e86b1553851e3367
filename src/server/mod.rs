use crate::config::SettingsStore;
use crate::library::Library;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use carmine_common::MediaKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

mod error;
pub mod routes_media;
pub mod routes_music;
pub mod routes_photos;
pub mod routes_settings;
pub mod routes_system;
pub mod routes_videos;

pub use error::{ApiResult, AppError};

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Live configuration; media roots are read from here per request
    pub settings: Arc<SettingsStore>,
    /// Playlists, albums, tags and categories
    pub library: Arc<Library>,
    pub started_at: Instant,
}

impl AppContext {
    /// Build a context, opening the library stores in the configured data
    /// directory.
    pub fn new(settings: SettingsStore) -> Self {
        let library = Library::open(&settings.data_dir());
        Self {
            settings: Arc::new(settings),
            library: Arc::new(library),
            started_at: Instant::now(),
        }
    }

    /// Resolved roots for every collection.
    pub fn collection_roots(&self) -> [(MediaKind, Vec<PathBuf>); 3] {
        MediaKind::ALL.map(|kind| (kind, self.settings.roots(kind)))
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::RANGE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
            header::ACCEPT_RANGES,
        ]);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Unknown paths get index.html with 200 so client-side routes load
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .fallback(ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    app
}

fn api_routes() -> Router<AppContext> {
    let mut routes = Router::new()
        .merge(routes_videos::video_routes())
        .merge(routes_music::music_routes())
        .merge(routes_photos::photo_routes())
        .merge(routes_settings::settings_routes())
        .merge(routes_system::system_routes());

    for kind in MediaKind::ALL {
        routes = routes.merge(routes_media::media_routes(kind));
    }
    routes
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server and run until a shutdown signal arrives.
pub async fn start_server(settings: SettingsStore) -> Result<()> {
    let config = settings.snapshot();
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config
        .server
        .static_dir
        .as_deref()
        .map(|dir| crate::config::resolve_root(settings.base_dir(), dir));

    let ctx = AppContext::new(settings);
    for (kind, roots) in ctx.collection_roots() {
        tracing::info!(collection = kind.collection(), "Media roots: {:?}", roots);
    }

    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

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
