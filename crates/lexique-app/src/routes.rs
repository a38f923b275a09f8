use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers::{lookup, pages, words};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/lookup/", get(lookup::show).post(lookup::submit))
        .route("/words/", get(words::list))
        .route("/words/{id}/", get(words::detail).post(words::update))
        .route(
            "/words/{id}/delete/",
            get(words::confirm_delete).post(words::delete),
        )
        .route("/about/", get(pages::about))
        .route("/docs/", get(pages::docs))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
