//! Error types for the extraction pipeline.
//!
//! Missing fields and skipped records are never errors: extractors return
//! `Option` and assemblers filter. Only a failed fetch or an unparseable
//! document surfaces as a `ScrapeError`.

use thiserror::Error;

/// Failures the fetch and parse layers can produce.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// DNS, connection or TLS failure before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded its configured deadline.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The response body could not be tokenized at all.
    #[error("document could not be parsed: {0}")]
    Parse(String),

    /// Invalid startup configuration. Never produced at request time.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Timeout(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ScrapeError::Network(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ScrapeError::Parse(_))
    }

    /// Network and timeout failures are transient; the caller owns retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScrapeError::Network(_) | ScrapeError::Timeout(_))
    }
}
