//! HTTP shell around the merge core: uploads, job storage and report lookup.

pub mod error;
pub mod handlers;
pub mod job;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::cleanup;
use crate::config::Config;

pub use error::ApiError;
pub use job::{run_job, JobError, JobOutcome, UploadedFile};
pub use storage::{JobStore, StorageError, StoredReport};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: JobStore,
    pub web_enabled: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn router(state: Arc<AppState>, web_dir: Option<PathBuf>, max_upload_bytes: usize) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/process", post(handlers::process_upload))
        .route("/report/{job_id}", get(handlers::get_report));

    if let Some(dir) = web_dir {
        app = app.nest_service("/web", ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config) -> Result<(), ServeError> {
    let store = JobStore::new(&config.storage_dir);
    store.init().await?;

    let web_enabled = config.web_dir.is_dir();
    if !web_enabled {
        tracing::warn!(web_dir = %config.web_dir.display(), "Web directory missing, UI disabled");
    }

    if let Some(every) = config.cleanup_interval {
        spawn_retention_sweep(config.storage_dir.clone(), config.retention_days, every);
    }

    let state = Arc::new(AppState { store, web_enabled });
    let app = router(
        state,
        web_enabled.then(|| config.web_dir.clone()),
        config.max_upload_bytes,
    );

    let addr = config.listen_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_retention_sweep(root: PathBuf, days: u64, every: Duration) {
    tracing::info!(days, interval_secs = every.as_secs(), "Periodic retention sweep enabled");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let root = root.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || cleanup::sweep(&root, days)).await {
                tracing::error!("Retention sweep task failed: {}", e);
            }
        }
    });
}
