//! Error types for the configuration edges of the core.
//!
//! Update and render never fail; only theme lookup, configuration parsing and
//! the clipboard side channel report errors.

/// Error type for theme selection, configuration loading and clipboard writes.
#[derive(Debug, thiserror::Error)]
pub enum RouletteError {
    #[error("Unknown theme: '{0}'")]
    UnknownTheme(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}
