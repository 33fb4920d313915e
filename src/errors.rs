use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Remote validation error: {0}")]
    RemoteValidationError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Engine error: {0}")]
    EngineError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl SimulationError {
    /// The message without the variant prefix, suitable for an `{"error": ...}` body.
    pub fn detail(&self) -> &str {
        match self {
            SimulationError::ValidationError(msg)
            | SimulationError::RemoteValidationError(msg)
            | SimulationError::TransportError(msg)
            | SimulationError::EngineError(msg)
            | SimulationError::ConfigurationError(msg) => msg,
        }
    }

    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SimulationError::ValidationError(_) | SimulationError::RemoteValidationError(_)
        )
    }
}

impl From<::config::ConfigError> for SimulationError {
    fn from(err: ::config::ConfigError) -> Self {
        SimulationError::ConfigurationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strips_prefix() {
        let err = SimulationError::ValidationError("height must be positive".to_string());
        assert_eq!(err.detail(), "height must be positive");
        assert_eq!(err.to_string(), "Validation error: height must be positive");
    }

    #[test]
    fn test_caller_errors() {
        assert!(SimulationError::ValidationError("x".into()).is_caller_error());
        assert!(SimulationError::RemoteValidationError("x".into()).is_caller_error());
        assert!(!SimulationError::TransportError("x".into()).is_caller_error());
        assert!(!SimulationError::EngineError("x".into()).is_caller_error());
    }
}
