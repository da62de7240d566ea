//! Shared error type for all transport clients.

/// Error type for transport failures.
///
/// Every variant renders as a short human-readable message suitable for
/// attaching to a recipient row or a status field.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A precondition failed before any network attempt (empty address,
    /// missing contact field).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status code.
    #[error("{service} returned HTTP {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The response parsed but did not contain the data we asked for.
    #[error("Missing data: {0}")]
    MissingData(String),
}
