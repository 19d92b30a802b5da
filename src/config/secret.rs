//! Protection for database connection strings
//!
//! Connection strings carry credentials, so they are held in
//! [`secrecy::Secret`] and zeroed on drop. Reading one requires an explicit
//! `expose_secret()` call, and `Debug` output is redacted.
//!
//! ```rust
//! use rekap::config::{redact_connection_string, secret_string};
//! use secrecy::ExposeSecret;
//!
//! let url = secret_string("postgresql://rekap:hunter2@db:5432/dwh".to_string());
//!
//! assert!(!format!("{url:?}").contains("hunter2"));
//! assert_eq!(redact_connection_string(url.expose_secret().as_ref()), "postgresql://***@db:5432/dwh");
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload stored inside a [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Parses the value, e.g. into a `tokio_postgres::Config`
    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string type used for connection strings
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wraps an optional plain string
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

/// Connection string with user and password replaced by `***`, for logs
pub fn redact_connection_string(url: &str) -> String {
    let (scheme, rest) = url.split_once("://").unwrap_or(("postgresql", url));
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => format!("{scheme}://{rest}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("postgresql://localhost/dwh".to_string());
        assert_eq!(secret.expose_secret(), "postgresql://localhost/dwh");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("x".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("postgresql://u:sensitive@h/db".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            connection_string: SecretString,
        }

        let section: Section =
            toml::from_str(r#"connection_string = "postgresql://h/db""#).unwrap();
        assert_eq!(section.connection_string.expose_secret(), "postgresql://h/db");
    }

    #[test]
    fn test_redact_connection_string() {
        assert_eq!(
            redact_connection_string("postgresql://user:p@ss@localhost:5432/dwh"),
            "postgresql://***@localhost:5432/dwh"
        );
        assert_eq!(
            redact_connection_string("postgres://localhost/dwh"),
            "postgres://localhost/dwh"
        );
    }
}
