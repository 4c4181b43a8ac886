use std::sync::Arc;

use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tablon::http::{router, AppState};
use tablon::{BlobStore, Config, ContactService, EventService, FileStore, InMemoryStore, VideoService};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();

    let state = AppState {
        events: Arc::new(EventService::new(FileStore::new(config.events_path()))),
        contacts: Arc::new(ContactService::new(FileStore::new(config.contacts_path()))),
        videos: Arc::new(VideoService::new(
            InMemoryStore::new(),
            BlobStore::open(config.videos_dir()).expect("video directory"),
        )),
        images: BlobStore::open(config.uploads_dir()).expect("upload directory"),
    };

    // Wide open, as the original dev setup was.
    let app = router(state).layer(CorsLayer::permissive());

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("bind address");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
