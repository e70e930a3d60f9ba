//! Credential wrapper that keeps API keys out of logs and output.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An API credential.
///
/// `Debug`, `Display` and `Serialize` never emit the wrapped value; use
/// [`expose`](SecretString::expose) at the single point where the key is
/// placed on the wire, and [`masked`](SecretString::masked) for diagnostics.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential. Only the HTTP provider should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// A short hint such as `"gsk_****a1b2"` for status output.
    ///
    /// Keys of eight characters or fewer are fully masked.
    pub fn masked(&self) -> String {
        if self.is_empty() {
            return "(not set)".into();
        }
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "****".into();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("SecretString(\"\")")
        } else {
            f.write_str("SecretString(***)")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            Ok(())
        } else {
            f.write_str("***")
        }
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString(s.to_owned())
    }
}
