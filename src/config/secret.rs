//! Secret handling for credentials in configuration
//!
//! The PostgreSQL connection string carries a password, so it is kept in a
//! `secrecy::Secret` that is zeroized on drop and redacted in `Debug` output.
//! Call `expose_secret()` only at the point of use.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// String payload that can live inside a [`Secret`]
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// The plain text; keep the borrow short
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        SecretValue(value)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Secret string as used in configuration structs
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string into a [`SecretString`]
///
/// # Example
///
/// ```rust
/// use termport::config::secret_string;
/// use secrecy::ExposeSecret;
///
/// let dsn = secret_string("postgresql://drupal:pw@db/drupal".to_string());
/// assert!(dsn.expose_secret().as_str().starts_with("postgresql://"));
/// ```
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Renders a connection string with its credentials removed
///
/// Everything before the last `@` is replaced, so
/// `postgresql://user:pw@host:5432/db` becomes `postgresql://***@host:5432/db`.
pub fn redact_connection_string(value: &SecretValue) -> String {
    match value.as_str().rsplit_once('@') {
        Some((_, host)) => format!("postgresql://***@{host}"),
        None => "postgresql://***".to_string(),
    }
}
