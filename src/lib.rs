pub mod api;
pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod page;
pub mod render;
pub mod sequence;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::ConsoleConfig;
pub use controller::Controller;
pub use render::{ChartHandle, Renderer};
pub use state::AppState;
