use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Placeholder printed wherever a secret would otherwise appear
pub const REDACTED: &str = "[REDACTED]";

/// Credential value that never shows up in `Debug` or `Display` output.
///
/// Backed by [`SecretString`], so the buffer is zeroized on drop. Call
/// [`Secret::expose`] at the point of use.
pub struct Secret(SecretString);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Reveal the underlying value
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(SecretString::from(value))
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&REDACTED).finish()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted_in_formatting() {
        let secret = Secret::new("hunter2");
        assert_eq!(secret.to_string(), REDACTED);
        assert!(!format!("{secret:?}").contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_secret_clone_and_equality_compare_contents() {
        let secret = Secret::from("s3-key".to_string());
        let copy = secret.clone();

        assert_eq!(secret, copy);
        assert_eq!(copy.expose(), "s3-key");
        assert_ne!(secret, Secret::new("other"));
    }
}
