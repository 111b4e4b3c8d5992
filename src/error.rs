// Error taxonomy for the client. Every failure is terminal at the UI
// boundary: nothing is retried automatically and no variant is allowed
// to escape a handler as a panic.

use thiserror::Error;

/// Failures a client operation can surface to the UI.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or connectivity failure. The UI shows a generic
    /// connectivity notification rather than the underlying detail.
    #[error("could not reach the library server: {0}")]
    Connectivity(String),

    /// Authoritative rejection by the server (bad credentials, validation
    /// failure, conflict). The text is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Client-side pre-validation failure. The request was never sent.
    #[error("{0}")]
    Invalid(String),
}

impl ClientError {
    /// Whether this failure should be presented as a generic
    /// connectivity notice instead of its own message.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}
