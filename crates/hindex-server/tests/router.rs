use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use hindex_server::{router, StaticFiles};
use tempfile::TempDir;
use tower::ServiceExt;

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<main>hindex</main>").unwrap();
    std::fs::write(dir.path().join("style.css"), "body{margin:0}").unwrap();
    std::fs::create_dir_all(dir.path().join(".git")).unwrap();
    std::fs::write(dir.path().join(".git").join("HEAD"), "ref: refs/heads/main").unwrap();
    dir
}

async fn get(dir: &TempDir, uri: &str) -> (StatusCode, String, String) {
    let app = router(StaticFiles::new(dir.path()).unwrap());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_serves_existing_file() {
    let dir = site();
    let (status, content_type, body) = get(&dir, "/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/css; charset=utf-8");
    assert_eq!(body, "body{margin:0}");
}

#[tokio::test]
async fn test_git_directory_is_forbidden() {
    let dir = site();
    for uri in ["/.git/HEAD", "/%2egit/HEAD", "/.GIT/HEAD"] {
        let (status, content_type, body) = get(&dir, uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(content_type, "text/plain");
        assert_eq!(body, "Access denied.");
    }
}

#[tokio::test]
async fn test_encoded_git_spellings_are_forbidden() {
    let dir = site();
    for uri in ["/%2e%67it/HEAD", "/.%67it/HEAD", "/%2E%47IT/HEAD"] {
        let (status, content_type, body) = get(&dir, uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(content_type, "text/plain");
        assert_eq!(body, "Access denied.");
    }
}

#[tokio::test]
async fn test_unknown_route_gets_index() {
    let dir = site();
    let (status, content_type, body) = get(&dir, "/collections/thesis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html; charset=utf-8");
    assert_eq!(body, "<main>hindex</main>");
}

#[tokio::test]
async fn test_not_found_without_index() {
    let dir = site();
    std::fs::remove_file(dir.path().join("index.html")).unwrap();
    let (status, content_type, body) = get(&dir, "/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "text/plain");
    assert_eq!(body, "Not found");
}
