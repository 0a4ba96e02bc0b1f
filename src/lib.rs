pub mod app;
pub mod checkin;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod penalty;
pub mod report;
pub mod state;
pub mod storage;

pub use app::router;
pub use state::AppState;
pub use storage::{load_or_init, resolve_data_path};
