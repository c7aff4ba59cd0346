pub mod client;
pub mod config;
pub mod error;
pub mod gemini;
pub mod http;
pub mod logging;
pub mod state;
pub mod wellness;

pub use state::AppState;
