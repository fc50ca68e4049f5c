use crate::models::AppData;
use std::{env, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    /// Habit titles in calendar display order, from `HABIT_ORDER`
    /// (comma-separated). Habits not listed sort after these.
    pub habit_order: Vec<String>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            habit_order: habit_order_from_env(),
        }
    }
}

fn habit_order_from_env() -> Vec<String> {
    env::var("HABIT_ORDER")
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
