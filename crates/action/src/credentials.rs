use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// A secret string: zeroed on drop, redacted in Debug and Display,
/// compared in constant time.
///
/// Used for session ids and access key secrets.
#[derive(Clone)]
pub struct SecureString(SecretString);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Access the underlying value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.expose().as_bytes().ct_eq(other.expose().as_bytes()).into()
    }
}

impl Eq for SecureString {}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureString(***)")
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Credential fields carried by every action.
///
/// They are independent of the action's own domain fields and never become
/// part of the request payload; the invoker turns them into an [`Auth`] for
/// the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Session obtained from a login action.
    pub session_id: Option<SecureString>,
    /// Access key id, used together with `access_key_secret`.
    pub access_key_id: Option<String>,
    /// Access key secret.
    pub access_key_secret: Option<SecureString>,
    /// Originating client address, forwarded for auditing.
    pub request_ip: Option<String>,
}

impl Credentials {
    /// Credentials holding only a session id.
    pub fn session(session_id: impl Into<SecureString>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Self::default()
        }
    }

    /// Credentials holding only an access key pair.
    pub fn access_key(id: impl Into<String>, secret: impl Into<SecureString>) -> Self {
        Self {
            access_key_id: Some(id.into()),
            access_key_secret: Some(secret.into()),
            ..Self::default()
        }
    }

    /// Attach the originating client address.
    pub fn with_request_ip(mut self, ip: impl Into<String>) -> Self {
        self.request_ip = Some(ip.into());
        self
    }

    /// Resolve the authorization to hand to the transport.
    ///
    /// A non-blank session id wins; otherwise both halves of the access key
    /// pair must be non-blank. Returns `None` when neither is usable.
    #[must_use]
    pub fn auth(&self) -> Option<Auth> {
        if let Some(session) = self.session_id.as_ref().filter(|s| !s.is_blank()) {
            return Some(Auth::Session(session.clone()));
        }
        match (&self.access_key_id, &self.access_key_secret) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.is_blank() => {
                Some(Auth::AccessKey {
                    id: id.clone(),
                    secret: secret.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Authorization the transport attaches to a request.
///
/// How it is encoded on the wire (headers, signatures) is the transport's
/// business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Session-based authorization.
    Session(SecureString),
    /// Access key pair authorization.
    AccessKey {
        /// Access key id.
        id: String,
        /// Access key secret.
        secret: SecureString,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_string_is_redacted() {
        let s = SecureString::new("hunter2");
        assert_eq!(format!("{s:?}"), "SecureString(***)");
        assert_eq!(s.to_string(), "***");
        assert_eq!(s.expose(), "hunter2");

        let creds = Credentials::access_key("AK", "very-secret");
        assert!(!format!("{creds:?}").contains("very-secret"));
    }

    #[test]
    fn secure_strings_compare_by_content() {
        assert_eq!(SecureString::new("s1"), SecureString::from("s1"));
        assert_ne!(SecureString::new("s1"), SecureString::new("s2"));
        assert_ne!(SecureString::new("s1"), SecureString::new("s10"));
        assert_eq!(SecureString::new("s1").clone().expose(), "s1");
    }

    #[test]
    fn session_wins_over_access_key() {
        let creds = Credentials {
            session_id: Some("s1".into()),
            ..Credentials::access_key("AK", "SK")
        };
        assert_eq!(creds.auth(), Some(Auth::Session("s1".into())));
    }

    #[test]
    fn access_key_needs_both_halves() {
        assert!(matches!(
            Credentials::access_key("AK", "SK").auth(),
            Some(Auth::AccessKey { .. })
        ));

        let half = Credentials {
            access_key_id: Some("AK".into()),
            ..Credentials::default()
        };
        assert_eq!(half.auth(), None);
    }

    #[test]
    fn blank_values_do_not_count() {
        assert_eq!(Credentials::session("  ").auth(), None);
        assert_eq!(Credentials::access_key("", "SK").auth(), None);
        assert_eq!(Credentials::default().auth(), None);
    }
}
