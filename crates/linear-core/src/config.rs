use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::auth::AuthSession;

/// Environment variable holding the Linear API key or OAuth access token.
pub const API_KEY_VAR: &str = "LINEAR_API_KEY";
/// Optional override for the GraphQL endpoint.
pub const API_URL_VAR: &str = "LINEAR_API_URL";
/// Optional path of a file that receives diagnostic logs.
pub const LOG_FILE_VAR: &str = "LINEAR_TUI_LOG";

pub const DEFAULT_ENDPOINT: &str = "https://api.linear.app/graphql";

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub session: AuthSession,
    pub endpoint: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let credential = non_empty(API_KEY_VAR).ok_or(ConfigError::MissingCredential {
            var: API_KEY_VAR,
        })?;
        let endpoint = non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let log_file = non_empty(LOG_FILE_VAR).map(PathBuf::from);

        Ok(Self {
            session: AuthSession::from_credential(credential),
            endpoint,
            log_file,
        })
    }
}

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} environment variable is required")]
    MissingCredential { var: &'static str },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::auth::TokenType;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_credential_is_reported_by_name() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "LINEAR_API_KEY environment variable is required"
        );
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
    }

    #[test]
    fn defaults_endpoint_and_log_file() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "lin_api_1")])).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.log_file.is_none());
        assert_eq!(config.session.token_type, TokenType::ApiKey);
    }

    #[test]
    fn honours_overrides() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "lin_oauth_1"),
            (API_URL_VAR, "http://localhost:9000/graphql"),
            (LOG_FILE_VAR, "/tmp/linear-tui.log"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/graphql");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/linear-tui.log")));
        assert_eq!(config.session.token_type, TokenType::Bearer);
    }
}
