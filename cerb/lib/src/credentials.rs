//! Access key and secret digest.

use std::fmt;

use crate::error::ConfigError;
use crate::signature::md5_hex;

/// API credentials for one Cerb worker.
///
/// The raw secret is digested as soon as the credentials are built and is
/// never stored; only the digest takes part in request signatures.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_digest: String,
}

impl Credentials {
    /// Builds credentials from an access key and a raw secret.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::MissingField`] if the access key is blank.
    pub fn new(access_key: impl Into<String>, secret: &str) -> Result<Self, ConfigError> {
        let access_key = access_key.into();
        if access_key.trim().is_empty() {
            return Err(ConfigError::missing_field("access_key"));
        }

        Ok(Self {
            access_key,
            secret_digest: md5_hex(secret),
        })
    }

    /// Returns the access key sent in the `Cerb-Auth` header.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Returns the hex digest of the secret.
    pub fn secret_digest(&self) -> &str {
        &self.secret_digest
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_digest", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_digested() {
        let creds = Credentials::new("key", "secret").unwrap();
        assert_eq!(creds.access_key(), "key");
        assert_eq!(creds.secret_digest(), "5ebe2294ecd0e0f08eab7690d2a6ee69");
    }

    #[test]
    fn test_blank_access_key_rejected() {
        let err = Credentials::new("  ", "secret").unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: access_key");
    }

    #[test]
    fn test_debug_redacts_digest() {
        let creds = Credentials::new("key", "secret").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("5ebe2294"));
        assert!(debug.contains("<redacted>"));
    }
}
