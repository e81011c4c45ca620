//! Source error types

use thiserror::Error;

/// Errors raised by ingress components
#[derive(Debug, Error)]
pub enum SourceError {
    /// The report endpoint could not bind its listener
    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server failed while running
    #[error("report endpoint failed: {0}")]
    Serve(String),

    /// Decoding a dropped file or report batch failed
    #[error(transparent)]
    Codec(#[from] cartflow_codec::CodecError),

    /// A source queue was closed while pushing
    #[error(transparent)]
    QueueClosed(#[from] cartflow_runtime::QueueClosed),
}

/// Result type for source operations
pub type Result<T> = std::result::Result<T, SourceError>;
