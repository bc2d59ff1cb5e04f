//! Error types for byond-topic
//!
//! Every failure of a query falls into one of three classes, see [`ErrorKind`].

use thiserror::Error;

/// Result type alias using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;

/// Coarse classification of a [`QueryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dial failed, was canceled, or ran past its deadline
    Connection,

    /// Transport failure while writing the request or reading the reply
    Io,

    /// Bytes on the wire do not form a valid frame
    Protocol,
}

/// Unified error type for query operations
#[derive(Debug, Error)]
pub enum QueryError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection error: dial to {addr} was canceled")]
    Cancelled { addr: String },

    #[error("Connection error: dial to {addr} exceeded its deadline")]
    DeadlineExceeded { addr: String },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl QueryError {
    /// Which class of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Connect { .. }
            | QueryError::Cancelled { .. }
            | QueryError::DeadlineExceeded { .. } => ErrorKind::Connection,
            QueryError::Io(_) => ErrorKind::Io,
            QueryError::Protocol(_) => ErrorKind::Protocol,
        }
    }

    /// True if the call failed because a deadline or socket timeout elapsed
    pub fn is_timeout(&self) -> bool {
        match self {
            QueryError::DeadlineExceeded { .. } => true,
            QueryError::Io(e) | QueryError::Connect { source: e, .. } => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

/// Frame-level violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("bad marker at offset {offset}: expected 0x{expected:02x}, found 0x{found:02x}")]
    BadMarker { offset: usize, expected: u8, found: u8 },

    #[error("stream ended early: expected {expected} bytes, received {received}")]
    Truncated { expected: usize, received: usize },

    #[error("response length {0} leaves no room for the trailing byte")]
    InvalidLength(u16),

    #[error("frame length mismatch: header declares {declared} bytes, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("query of {size} bytes exceeds maximum of {max}")]
    QueryTooLarge { size: usize, max: usize },
}
