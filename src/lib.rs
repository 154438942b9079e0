pub mod api;
pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod state;
pub mod store;
pub mod ui;

pub use api::ApiClient;
pub use app::router;
pub use config::Config;
pub use state::AppState;
