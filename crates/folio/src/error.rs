//! CLI error types.

use folio_config::ConfigError;
use folio_site::TreeError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("No route for {0}")]
    NotFound(String),

    #[error("Method {method} not allowed for {path} (allowed: {allowed})")]
    MethodNotAllowed {
        method: String,
        path: String,
        allowed: String,
    },

    #[error("{0}")]
    Validation(String),
}
