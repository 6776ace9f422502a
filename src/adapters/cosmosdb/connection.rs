//! Account credentials
//!
//! Both connection forms resolve to the same pair: the account endpoint and
//! its master key.

use crate::config::{secret_string, Connection, SecretString};
use crate::domain::{RepositoryError, Result};
use secrecy::ExposeSecret;
use url::Url;

/// Resolved endpoint and master key of an account
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub endpoint: Url,
    pub key: SecretString,
}

impl AccountCredentials {
    /// Resolve a configured [`Connection`]
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unparsable endpoint or an
    /// incomplete connection string.
    pub fn from_connection(connection: &Connection) -> Result<Self> {
        match connection {
            Connection::ConnectionString(connection_string) => {
                parse_connection_string(connection_string.expose_secret().as_ref())
            }
            Connection::Key { endpoint, key } => Ok(Self {
                endpoint: parse_endpoint(endpoint)?,
                key: key.clone(),
            }),
        }
    }
}

/// Parse `AccountEndpoint=...;AccountKey=...;`
///
/// Keys are matched case-insensitively, unknown keys are ignored and the
/// trailing `;` is optional. Values may themselves contain `=` (base64
/// padding).
pub fn parse_connection_string(connection_string: &str) -> Result<AccountCredentials> {
    let mut endpoint = None;
    let mut key = None;

    for part in connection_string.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some((name, value)) = part.split_once('=') else {
            return Err(RepositoryError::Configuration(
                "Connection string segments must have the form Name=Value".to_string(),
            ));
        };

        match name.trim().to_ascii_lowercase().as_str() {
            "accountendpoint" => endpoint = Some(value.trim().to_string()),
            "accountkey" => key = Some(value.trim().to_string()),
            _ => {}
        }
    }

    let endpoint = endpoint.filter(|e| !e.is_empty()).ok_or_else(|| {
        RepositoryError::Configuration("Connection string is missing AccountEndpoint".to_string())
    })?;
    let key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
        RepositoryError::Configuration("Connection string is missing AccountKey".to_string())
    })?;

    Ok(AccountCredentials {
        endpoint: parse_endpoint(&endpoint)?,
        key: secret_string(key),
    })
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| {
        RepositoryError::Configuration(format!("Invalid account endpoint '{endpoint}': {e}"))
    })?;

    if url.cannot_be_a_base() {
        return Err(RepositoryError::Configuration(format!(
            "Invalid account endpoint '{endpoint}'"
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connection_string() {
        let credentials = parse_connection_string(
            "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=a2V5==;",
        )
        .unwrap();

        assert_eq!(credentials.endpoint.host_str(), Some("acct.documents.azure.com"));
        assert_eq!(credentials.key.expose_secret().as_ref(), "a2V5==");
    }

    #[test]
    fn test_parse_connection_string_case_and_order() {
        let credentials = parse_connection_string(
            "accountkey=abc; ACCOUNTENDPOINT=https://localhost:8081/ ; Database=ignored",
        )
        .unwrap();

        assert_eq!(credentials.endpoint.port(), Some(8081));
        assert_eq!(credentials.key.expose_secret().as_ref(), "abc");
    }

    #[test]
    fn test_connection_string_missing_key() {
        let err = parse_connection_string("AccountEndpoint=https://acct/;").unwrap_err();
        assert!(err.to_string().contains("AccountKey"));
    }

    #[test]
    fn test_connection_string_missing_endpoint() {
        let err = parse_connection_string("AccountKey=abc").unwrap_err();
        assert!(err.to_string().contains("AccountEndpoint"));
    }

    #[test]
    fn test_connection_string_malformed_segment() {
        assert!(parse_connection_string("AccountEndpoint").is_err());
    }

    #[test]
    fn test_from_key_connection() {
        let connection = Connection::Key {
            endpoint: "https://acct.documents.azure.com:443/".to_string(),
            key: secret_string("k".to_string()),
        };
        let credentials = AccountCredentials::from_connection(&connection).unwrap();
        assert_eq!(credentials.endpoint.scheme(), "https");
    }

    #[test]
    fn test_invalid_endpoint() {
        let connection = Connection::Key {
            endpoint: "not a url".to_string(),
            key: secret_string("k".to_string()),
        };
        assert!(AccountCredentials::from_connection(&connection).is_err());
    }
}
