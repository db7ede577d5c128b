use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

const UPLOAD_LIMIT_BYTES: usize = 32 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let uploads = Router::new()
        .route("/ingest/users", post(handlers::upload_users))
        .route("/ingest/events", post(handlers::upload_events))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES));

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/view", get(handlers::get_view))
        .route("/templates", post(handlers::create_template))
        .route("/templates/delete", post(handlers::delete_template))
        .route("/segments", post(handlers::create_segment))
        .route("/segments/delete", post(handlers::delete_segment))
        .route("/campaigns", post(handlers::create_campaign))
        .route("/campaigns/delete", post(handlers::delete_campaign))
        .route("/campaigns/run", post(handlers::run_campaign))
        .route("/inbound/refresh", post(handlers::load_inbound))
        .route("/stats/refresh", post(handlers::load_stats))
        .merge(uploads)
        .with_state(state)
}
