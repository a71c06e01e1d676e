//! Static file serving for the embedded page assets
//!
//! Uses rust-embed to bundle assets/ into the binary so the dashboard ships
//! as a single executable.

use axum::{
    body::Body,
    extract::Path,
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use rust_embed::Embed;

/// Embedded page assets from the assets/ folder
#[derive(Embed)]
#[folder = "assets/"]
struct DashboardAssets;

/// Serve `/static/*path` from the embedded assets
pub async fn serve_static(Path(path): Path<String>) -> impl IntoResponse {
    match serve_file(path.trim_start_matches('/')) {
        Some(response) => response,
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn serve_file(path: &str) -> Option<Response<Body>> {
    let file = DashboardAssets::get(path)?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    Some(
        (
            [
                (header::CONTENT_TYPE, mime_type),
                (
                    header::CACHE_CONTROL,
                    "public, max-age=0, must-revalidate".to_string(),
                ),
            ],
            file.data.into_owned(),
        )
            .into_response(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_assets_present() {
        assert!(DashboardAssets::get("dashboard.css").is_some());
        assert!(DashboardAssets::get("dashboard.js").is_some());
    }

    #[test]
    fn test_serve_file_sets_content_type() {
        let response = serve_file("dashboard.css").unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert_eq!(content_type, "text/css");
    }

    #[test]
    fn test_unknown_file_is_none() {
        assert!(serve_file("missing.txt").is_none());
    }
}
