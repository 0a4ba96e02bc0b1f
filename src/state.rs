use crate::models::Roster;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub roster: Arc<Mutex<Roster>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, roster: Roster) -> Self {
        Self {
            data_path,
            roster: Arc::new(Mutex::new(roster)),
        }
    }
}
