//! Master-key request signing
//!
//! Every REST call carries an `authorization` header built from an
//! HMAC-SHA256 signature over
//! `verb\nresourceType\nresourceLink\ndate\n\n`, where verb, resource type
//! and date are lower-cased and the resource link is the unencoded resource
//! path without a leading slash.

use crate::config::SecretString;
use crate::domain::{RepositoryError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Decoded account master key
pub struct MasterKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl MasterKey {
    /// Decode a base64 account key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not valid base64.
    pub fn from_secret(key: &SecretString) -> Result<Self> {
        let bytes = STANDARD
            .decode(key.expose_secret().as_ref().trim())
            .map_err(|e| {
                RepositoryError::Configuration(format!("Account key is not valid base64: {e}"))
            })?;

        Ok(Self {
            bytes: Zeroizing::new(bytes),
        })
    }

    /// URL-encoded value for the `authorization` header
    pub fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> String {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );

        let mut mac =
            HmacSha256::new_from_slice(self.bytes.as_slice()).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let token = format!("type=master&ver=1.0&sig={signature}");
        url::form_urlencoded::byte_serialize(token.as_bytes()).collect()
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// RFC 1123 date for the `x-ms-date` header
pub fn request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use chrono::TimeZone;

    // Well-known local emulator key
    const EMULATOR_KEY: &str =
        "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";

    fn key() -> MasterKey {
        MasterKey::from_secret(&secret_string(EMULATOR_KEY.to_string())).unwrap()
    }

    #[test]
    fn test_request_date_format() {
        let now = Utc.with_ymd_and_hms(2017, 4, 27, 0, 51, 12).unwrap();
        assert_eq!(request_date(now), "Thu, 27 Apr 2017 00:51:12 GMT");
    }

    #[test]
    fn test_authorization_shape() {
        let token = key().authorization(
            "GET",
            "docs",
            "dbs/db/colls/entities/docs/1",
            "Thu, 27 Apr 2017 00:51:12 GMT",
        );

        assert!(token.starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"));
        assert!(!token.contains('='));
        assert!(!token.contains('&'));
    }

    #[test]
    fn test_authorization_is_deterministic() {
        let key = key();
        let date = "Thu, 27 Apr 2017 00:51:12 GMT";
        let a = key.authorization("GET", "docs", "dbs/db/colls/c/docs/1", date);
        let b = key.authorization("get", "DOCS", "dbs/db/colls/c/docs/1", date);
        assert_eq!(a, b);
    }

    #[test]
    fn test_authorization_covers_every_input() {
        let key = key();
        let date = "Thu, 27 Apr 2017 00:51:12 GMT";
        let base = key.authorization("GET", "docs", "dbs/db/colls/c/docs/1", date);

        assert_ne!(base, key.authorization("DELETE", "docs", "dbs/db/colls/c/docs/1", date));
        assert_ne!(base, key.authorization("GET", "sprocs", "dbs/db/colls/c/docs/1", date));
        assert_ne!(base, key.authorization("GET", "docs", "dbs/db/colls/c/docs/2", date));
        assert_ne!(
            base,
            key.authorization("GET", "docs", "dbs/db/colls/c/docs/1", "Fri, 28 Apr 2017 00:51:12 GMT")
        );
    }

    #[test]
    fn test_invalid_base64_key() {
        let err = MasterKey::from_secret(&secret_string("not base64!".to_string())).unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn test_debug_redacted() {
        assert_eq!(format!("{:?}", key()), "MasterKey([REDACTED])");
    }
}
