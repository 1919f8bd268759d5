use crate::files::{Resolution, StaticFiles};
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Every path goes through one fallback handler
pub fn router(files: StaticFiles) -> Router {
    Router::new()
        .fallback(serve_path)
        .with_state(Arc::new(files))
}

/// Bind and serve until the process is stopped
pub async fn serve(bind: &str, root: &Path) -> anyhow::Result<()> {
    let files = StaticFiles::new(root)
        .map_err(|e| anyhow::anyhow!("Cannot serve {}: {}", root.display(), e))?;
    let served_root = files.root().to_path_buf();

    let listener = tokio::net::TcpListener::bind(bind).await?;
    let local_addr = listener.local_addr()?;
    info!("Serving {} on http://{}", served_root.display(), local_addr);
    println!("Serving {} at http://{}", served_root.display(), local_addr);

    axum::serve(listener, router(files)).await?;
    Ok(())
}

async fn serve_path(State(files): State<Arc<StaticFiles>>, uri: Uri) -> Response {
    let path = uri.path();

    match files.resolve(path) {
        Resolution::Forbidden => {
            warn!("Refused hidden path {}", path);
            plain_text(StatusCode::FORBIDDEN, "Access denied.")
        }
        Resolution::File { path: file, content_type } => {
            debug!("GET {} -> {}", path, file.display());
            send_file(&file, content_type).await
        }
        Resolution::Index(index) => {
            debug!("GET {} -> index", path);
            send_file(&index, "text/html; charset=utf-8").await
        }
        Resolution::NotFound => plain_text(StatusCode::NOT_FOUND, "Not found"),
    }
}

async fn send_file(path: &Path, content_type: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], Body::from(bytes)).into_response(),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            plain_text(StatusCode::NOT_FOUND, "Not found")
        }
    }
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
}
