//! Crate-level error types.
//!
//! Two kinds of failure reach the user: [`NetworkError`] (the analysis API
//! could not be reached, replied with a non-2xx status, or sent a body we
//! could not decode) and [`ValidationError`] (the input was rejected before
//! any request was made). Both carry a diagnostic `Display` for logs and a
//! separate localized [`user_message`](LensError::user_message) for the page.

use thiserror::Error;

use crate::locale::Locale;

/// Failure talking to the remote analysis API.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A TCP-level connection could not be established or the transfer broke.
    #[error("connection failed to {url}: {detail}")]
    Connect { url: String, detail: String },
    /// The remote server replied with a non-2xx HTTP status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    /// Response body could not be parsed as the expected JSON structure.
    #[error("could not decode response from {url}: {detail}")]
    Decode { url: String, detail: String },
}

impl NetworkError {
    /// HTTP status reported by the server, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Input rejected client-side, before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("news text is empty")]
    EmptyText,
}

#[derive(Debug, Error)]
pub enum LensError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Another analysis is still in flight; the submit control is disabled.
    #[error("an analysis is already in progress")]
    Busy,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LensError {
    /// The message shown inline to the user for this error.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        let s = locale.strings();
        match self {
            LensError::Validation(ValidationError::EmptyText) => s.empty_text,
            LensError::Busy => s.busy,
            LensError::Network(_)
            | LensError::Config(_)
            | LensError::Render(_)
            | LensError::Io(_) => s.analyze_failed,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, LensError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, LensError>;
