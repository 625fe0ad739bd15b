//! Static asset serving.
//!
//! Everything that is not `/status` is answered from the read-only
//! `webroot/` directory, with `index.html` as the index page.

use std::path::Path;

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

const WEBROOT: &str = "webroot";

/// Fallback handler serving files below [`WEBROOT`].
pub async fn serve(uri: Uri) -> Response {
    let requested = uri.path().trim_start_matches('/');
    let requested = if requested.is_empty() {
        "index.html"
    } else {
        requested
    };

    if requested.split('/').any(|segment| segment == "..") {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }

    let file = Path::new(WEBROOT).join(requested);
    match tokio::fs::read(&file).await {
        Ok(contents) => ([(header::CONTENT_TYPE, content_type(&file))], contents).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn the_root_serves_the_index_page() {
        let response = serve("/".parse::<Uri>().unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn missing_files_are_not_found() {
        let response = serve("/no-such-file.css".parse::<Uri>().unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn parent_traversal_is_rejected() {
        let response = serve("/../Cargo.toml".parse::<Uri>().unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
