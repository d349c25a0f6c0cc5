//! Static asset routes.
//!
//! `GET /` returns the index page. Any other path is looked up in the first
//! static root, then in the second. A file in the first root shadows a file
//! with the same relative path in the second.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ResolvedAssets;

/// Builds the router for the page and its assets.
pub fn asset_router(assets: &ResolvedAssets) -> Router {
    let statics = ServeDir::new(&assets.static_dir)
        .fallback(ServeDir::new(&assets.fallback_static_dir));

    Router::new()
        .route_service("/", ServeFile::new(&assets.index))
        .fallback_service(statics)
}
