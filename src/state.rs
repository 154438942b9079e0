use crate::api::ApiClient;
use crate::config::Config;
use crate::store::Store;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state.
///
/// There is a single `Store` for the whole server, so every browser sees the
/// same view: the active page, loaded lists and toasts raised by any visitor.
#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(config: &Config, client: ApiClient, today: NaiveDate) -> Self {
        Self {
            client,
            store: Arc::new(Mutex::new(Store::new(config, today))),
        }
    }
}
