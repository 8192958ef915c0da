mod error;
mod routes;

pub use error::ApiError;
pub use routes::UPLOAD_FIELD;

use crate::application::repositories::PageRepository;
use crate::application::services::{CsvExchange, PageService};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

/// Shared handler state; clones share one repository
pub struct AppState<R: PageRepository> {
    pub pages: PageService<R>,
    pub csv: CsvExchange<R>,
}

impl<R: PageRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        AppState {
            pages: self.pages.clone(),
            csv: self.csv.clone(),
        }
    }
}

impl<R: PageRepository + Send> AppState<R> {
    pub fn new(pages: PageService<R>) -> Self {
        let csv = CsvExchange::new(pages.shared_repository());
        AppState { pages, csv }
    }
}

/// Build the HTTP router over a page repository.
///
/// `max_body_bytes` caps every request body, uploads included.
pub fn router<R>(state: AppState<R>, max_body_bytes: usize) -> Router
where
    R: PageRepository + Send + 'static,
{
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/page",
            get(routes::list_pages::<R>).post(routes::create_page::<R>),
        )
        .route(
            "/page/{id}",
            get(routes::get_page::<R>)
                .put(routes::update_page::<R>)
                .delete(routes::delete_page::<R>),
        )
        .route("/uploadcsv", post(routes::upload_csv::<R>))
        .route("/exportcsv", get(routes::export_csv::<R>))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
