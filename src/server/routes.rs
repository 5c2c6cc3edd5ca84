use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::time::Instant;
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers;
use crate::fetch::Fetcher;

/// Create the router with all routes
pub fn create_router<F: Fetcher + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/scrape", post(handlers::scrape::<F>))
        .route("/v1/crawl", post(handlers::crawl::<F>))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    ::log::info!(
        "{} {} -> {} in {:.2}s",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64()
    );
    response
}
