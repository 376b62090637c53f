//! Session-related types.
//!
//! The session is the only customer identity in the storefront: it carries
//! the guest customer ID and pending flash messages.

use serde::{Deserialize, Serialize};

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Error,
}

impl FlashLevel {
    /// CSS class used when rendering the message.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "flash-info",
            Self::Error => "flash-error",
        }
    }
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    /// An informational message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            text: text.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            text: text.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the guest customer ID owning the session's cart.
    pub const CUSTOMER_ID: &str = "customer_id";

    /// Key for queued flash messages.
    pub const FLASH_MESSAGES: &str = "flash_messages";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_serde_roundtrip() {
        let messages = vec![FlashMessage::info("Added"), FlashMessage::error("Oops")];
        let json = serde_json::to_string(&messages).unwrap();
        assert!(json.contains("\"level\":\"info\""));
        let parsed: Vec<FlashMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, messages);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(FlashMessage::info("x").level.css_class(), "flash-info");
        assert_eq!(FlashMessage::error("x").level.css_class(), "flash-error");
    }
}
