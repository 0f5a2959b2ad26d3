//! Error types for shortsmith.

use thiserror::Error;

/// Library-level error type for shortsmith operations.
#[derive(Error, Debug)]
pub enum ShortsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider returned no results: {0}")]
    UpstreamEmpty(String),

    #[error("Provider request failed: {0}")]
    Upstream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ShortsmithError {
    /// Short category name reported as the `error` field of failure responses.
    pub fn category(&self) -> &'static str {
        match self {
            ShortsmithError::Config(_) => "configuration",
            ShortsmithError::UpstreamEmpty(_) => "upstream_empty",
            ShortsmithError::Upstream(_) | ShortsmithError::Http(_) | ShortsmithError::OpenAI(_) => {
                "upstream_failure"
            }
            ShortsmithError::ToolNotFound(_) | ShortsmithError::ToolFailed(_) => "tool_failure",
            ShortsmithError::InvalidInput(_) => "invalid_input",
            ShortsmithError::NotFound(_) => "not_found",
            ShortsmithError::Io(_)
            | ShortsmithError::Json(_)
            | ShortsmithError::TomlParse(_)
            | ShortsmithError::Database(_)
            | ShortsmithError::Store(_) => "internal",
        }
    }

    /// Wrap the error message with a step-specific prefix, keeping the variant.
    pub fn context(self, prefix: &str) -> Self {
        match self {
            ShortsmithError::Config(m) => ShortsmithError::Config(format!("{prefix}: {m}")),
            ShortsmithError::UpstreamEmpty(m) => {
                ShortsmithError::UpstreamEmpty(format!("{prefix}: {m}"))
            }
            ShortsmithError::Upstream(m) => ShortsmithError::Upstream(format!("{prefix}: {m}")),
            ShortsmithError::OpenAI(m) => ShortsmithError::OpenAI(format!("{prefix}: {m}")),
            ShortsmithError::Http(e) => ShortsmithError::Upstream(format!("{prefix}: {e}")),
            ShortsmithError::ToolFailed(m) => ShortsmithError::ToolFailed(format!("{prefix}: {m}")),
            ShortsmithError::InvalidInput(m) => {
                ShortsmithError::InvalidInput(format!("{prefix}: {m}"))
            }
            other => other,
        }
    }
}

/// Result type alias for shortsmith operations.
pub type Result<T> = std::result::Result<T, ShortsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(ShortsmithError::Config("x".into()).category(), "configuration");
        assert_eq!(ShortsmithError::Upstream("x".into()).category(), "upstream_failure");
        assert_eq!(ShortsmithError::ToolFailed("x".into()).category(), "tool_failure");
        assert_eq!(ShortsmithError::NotFound("x".into()).category(), "not_found");
    }

    #[test]
    fn test_context_keeps_variant() {
        let err = ShortsmithError::Upstream("503 busy".into()).context("Voice generation failed");
        assert!(matches!(err, ShortsmithError::Upstream(_)));
        assert_eq!(
            err.to_string(),
            "Provider request failed: Voice generation failed: 503 busy"
        );
    }
}
