//! HTTP service exposing scrape and crawl as JSON endpoints.

mod handlers;
mod routes;

pub use routes::create_router;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use std::sync::Arc;

/// Shared state handed to every handler
pub struct AppState<F> {
    pub fetcher: Arc<F>,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<F: Fetcher> AppState<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}

/// Bind to `config.bind_addr` and serve until the process is stopped
pub async fn serve<F: Fetcher + 'static>(config: &ServiceConfig, fetcher: F) -> Result<()> {
    let router = create_router(AppState::new(fetcher));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    ::log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
