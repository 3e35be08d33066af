pub mod alert;
pub mod app;
pub mod checkin;
pub mod config;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod inspiration;
pub mod models;
pub mod notes;
pub mod state;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod ui;
pub mod update;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::KvStore;
