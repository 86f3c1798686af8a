pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod locale;
pub mod model;
pub mod render;
pub mod session;
pub mod web;

#[cfg(test)]
mod testing;

pub use client::{AnalysisClient, AnalysisClientBuilder};
pub use config::Config;
pub use error::{LensError, NetworkError, ValidationError};
pub use locale::Locale;
pub use model::{AnalysisResult, HistoryItem, Verdict};
pub use render::{HistoryPanel, ResultView};
pub use session::Session;
