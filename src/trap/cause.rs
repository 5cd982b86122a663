//! # Normalized trap cause.
//!
//! Panic payloads are `Box<dyn Any + Send>`; [`Trap`] turns them into an error value:
//! - `&'static str` / `String` payloads become the message;
//! - `Box<dyn Error + Send + Sync>` payloads (raised with [`std::panic::panic_any`])
//!   keep the error as [`Error::source`](std::error::Error::source);
//! - anything else becomes `"unknown panic"`.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

type SharedError = Arc<dyn StdError + Send + Sync>;

const UNKNOWN: &str = "unknown panic";

/// Message a payload normalizes to, read without consuming it.
pub(crate) fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    if let Some(err) = payload.downcast_ref::<Box<dyn StdError + Send + Sync>>() {
        return err.to_string();
    }
    UNKNOWN.to_string()
}

/// An intercepted trap, normalized to an error-like value.
#[derive(Clone)]
pub struct Trap {
    message: String,
    location: Option<String>,
    error: Option<SharedError>,
}

impl Trap {
    /// Creates a trap carrying only a message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            error: None,
        }
    }

    /// Normalizes a panic payload.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<&'static str>() {
            Ok(msg) => return Self::from_message(*msg),
            Err(other) => other,
        };
        let payload = match payload.downcast::<String>() {
            Ok(msg) => return Self::from_message(*msg),
            Err(other) => other,
        };
        match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
            Ok(err) => {
                let error: SharedError = Arc::from(*err);
                Self {
                    message: error.to_string(),
                    location: None,
                    error: Some(error),
                }
            }
            Err(_) => Self::from_message(UNKNOWN),
        }
    }

    pub(crate) fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Panic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Panic site as `file:line:col`, when the panic hook observed it.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl fmt::Debug for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trap")
            .field("message", &self.message)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(at) => write!(f, "{} (at {at})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for Trap {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.error
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn str_and_string_payloads() {
        let t = Trap::from_payload(Box::new("static boom"));
        assert_eq!(t.message(), "static boom");
        assert!(t.source().is_none());

        let t = Trap::from_payload(Box::new(format!("owned {}", 7)));
        assert_eq!(t.message(), "owned 7");
    }

    #[test]
    fn boxed_error_payload_keeps_source() {
        let err: Box<dyn Error + Send + Sync> =
            Box::new(std::io::Error::other("disk unplugged"));
        let t = Trap::from_payload(Box::new(err));
        assert_eq!(t.message(), "disk unplugged");
        assert_eq!(t.source().map(|s| s.to_string()).as_deref(), Some("disk unplugged"));
    }

    #[test]
    fn unknown_payload() {
        let t = Trap::from_payload(Box::new(42_u64));
        assert_eq!(t.message(), "unknown panic");
    }

    #[test]
    fn borrowed_message_matches_normalized_one() {
        let payloads: Vec<Box<dyn Any + Send>> = vec![
            Box::new("static"),
            Box::new(String::from("owned")),
            Box::new(Box::<dyn Error + Send + Sync>::from("boxed")),
            Box::new(1_u8),
        ];
        for payload in payloads {
            let borrowed = payload_message(payload.as_ref());
            assert_eq!(borrowed, Trap::from_payload(payload).message());
        }
    }

    #[test]
    fn display_includes_location() {
        let t = Trap::from_message("boom").with_location(Some("src/lib.rs:1:1".into()));
        assert_eq!(t.to_string(), "boom (at src/lib.rs:1:1)");
        assert_eq!(t.location(), Some("src/lib.rs:1:1"));
    }
}
