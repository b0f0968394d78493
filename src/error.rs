//! error.rs
//!
//! Error taxonomy for the synthesis pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /* ---------- input ---------- */
    #[error("Could not parse any functions. Please check your syntax.")]
    NoFunctions,

    #[error("Function \"{name}\" not found. Available functions: {}", available.join(", "))]
    FunctionNotFound { name: String, available: Vec<String> },

    /* ---------- provider ---------- */
    #[error("AI service unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("AI response could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("Unsupported AI provider: {0}")]
    UnknownProvider(String),

    /* ---------- boundary ---------- */
    #[error("Unsupported test framework: {0}")]
    UnknownFramework(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Provider failures never reach the user; the orchestrator falls back.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Error::ProviderUnavailable(_) | Error::InvalidResponse(_) | Error::UnknownProvider(_)
        )
    }

    /// Input errors are reported verbatim in the failure response.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::NoFunctions | Error::FunctionNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_names_in_order() {
        let err = Error::FunctionNotFound {
            name: "missing".into(),
            available: vec!["greet".into(), "add".into()],
        };

        assert_eq!(
            err.to_string(),
            "Function \"missing\" not found. Available functions: greet, add"
        );
        assert!(err.is_input_error());
        assert!(!err.is_provider_failure());
    }

    #[test]
    fn provider_errors_are_classified() {
        assert!(Error::ProviderUnavailable("503".into()).is_provider_failure());
        assert!(Error::InvalidResponse("no array".into()).is_provider_failure());
        assert!(Error::UnknownProvider("cohere".into()).is_provider_failure());
        assert!(!Error::UnknownFramework("ava".into()).is_provider_failure());
    }
}
