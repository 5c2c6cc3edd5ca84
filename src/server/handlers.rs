use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::AppState;
use crate::config::{CrawlRequest, ScrapeRequest};
use crate::fetch::Fetcher;

/// Response envelope shared by the JSON endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn ok<T: Serialize>(data: T) -> Response {
    let body = ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    };
    (StatusCode::OK, Json(body)).into_response()
}

fn fail(status: StatusCode, error: impl ToString) -> Response {
    let body = ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(error.to_string()),
    };
    (status, Json(body)).into_response()
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn scrape<F: Fetcher + 'static>(
    State(state): State<AppState<F>>,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return fail(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match crate::scrape::scrape(state.fetcher.as_ref(), &request).await {
        Ok(page) => ok(page),
        Err(e) => {
            ::log::error!("Scrape of {} failed: {}", request.url, e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

pub async fn crawl<F: Fetcher + 'static>(
    State(state): State<AppState<F>>,
    body: Result<Json<CrawlRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return fail(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match crate::crawler::crawl(state.fetcher.as_ref(), &request).await {
        Ok(result) => ok(result),
        Err(e) => {
            ::log::error!("Crawl of {} failed: {}", request.start_url, e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
