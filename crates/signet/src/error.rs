//! CLI error types.

use signet_config::ConfigError;
use signet_core::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_error_display_passthrough() {
        let err: CliError = ConfigError::Validation("server.port must be greater than zero".to_owned()).into();

        assert_eq!(err.to_string(), "Configuration error: server.port must be greater than zero");
    }

    #[test]
    fn test_server_error_display() {
        let err = CliError::Server("address already in use".to_owned());

        assert_eq!(err.to_string(), "address already in use");
    }
}
