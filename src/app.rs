use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/people", get(handlers::list_people).post(handlers::register))
        .route("/api/people/:name/mark", post(handlers::mark))
        .route("/api/people/:name/submit", post(handlers::submit))
        .route("/api/people/:name/photo", post(handlers::attach_photo))
        .route("/api/people/:name", delete(handlers::delete))
        .route("/api/people/:name/close-period", post(handlers::close_period))
        .route("/api/report", get(handlers::get_report))
        .with_state(state)
}
