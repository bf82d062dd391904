//! Error types for tabletop_deck
//!
//! Cards that cannot be found are not errors: they are carried on the
//! [`CardEntry`](crate::card::CardEntry) and reported together at the end of a
//! build. Everything in here aborts the whole run.

use thiserror::Error;

/// Unified error type for tabletop_deck operations
#[derive(Debug, Error)]
pub enum DeckError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response or config file
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Decklist URL is well-formed but does not point at a deck
    #[error("Invalid decklist URL: {0}")]
    InvalidDecklistUrl(String),
    /// Decklist host answered with something we cannot read
    #[error("Unsupported decklist source: {0}")]
    UnsupportedDecklistSource(String),
    /// Deck has more cards than a TTS stack can be built from
    #[error("Deck too large: {0}")]
    DeckTooLarge(String),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for tabletop_deck operations
pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = DeckError::InvalidDecklistUrl("https://moxfield.com/".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid decklist URL: https://moxfield.com/"
        );

        let err = DeckError::HttpStatus(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP error: 404 Not Found");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DeckError = io.into();
        assert!(matches!(err, DeckError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
