//! Error types shared by the clients, the services and the key generator.

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status for failures with no more specific code.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status when the service could not be reached at all.
pub const EXIT_CONNECT_FAILED: u8 = 2;
/// Exit status when a service was reached but refused to serve us.
pub const EXIT_REJECTED: u8 = 3;

/// Top-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid port or other invalid argument.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// File or socket failure, with the operation that failed.
    #[error("{context}: {source}")]
    Io {
        /// What we were doing when the failure happened
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Service could not be reached.
    #[error("could not connect to {addr}: {source}")]
    Connect {
        /// Address we tried
        addr: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Payload violates the alphabet or length invariants.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Peer broke the wire protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Service accepted the TCP connection but is already serving its
    /// maximum number of clients.
    #[error("service is at capacity and closed the connection")]
    CapacityRejected,
}

impl Error {
    /// Wrap an I/O error with the operation that produced it.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Process exit status a client binary reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Connect { .. } => EXIT_CONNECT_FAILED,
            Self::Protocol(ProtocolError::WrongService { .. }) | Self::CapacityRejected => {
                EXIT_REJECTED
            },
            _ => EXIT_FAILURE,
        }
    }
}

/// Input rejected before it reaches the cipher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Character outside `A-Z` and space.
    #[error("invalid character {ch:?} in {what} at position {position}")]
    InvalidCharacter {
        /// Which input held the character ("text", "key", a file name)
        what: String,
        /// The offending character
        ch: char,
        /// Zero-based character index
        position: usize,
    },

    /// Key has fewer symbols than the text it must cover.
    #[error("key is too short: {key_len} symbols for {text_len} symbols of text")]
    KeyTooShort {
        /// Key length in symbols
        key_len: usize,
        /// Text length in symbols
        text_len: usize,
    },
}

/// Wire protocol violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Client reached a service of the other flavour.
    #[error("reached {received:?} but expected {expected}")]
    WrongService {
        /// Tag the client was looking for
        expected: &'static str,
        /// Tag the service sent
        received: String,
    },

    /// Service was contacted by a client it does not serve.
    #[error("peer identified as {received:?} but {expected} is required")]
    UnexpectedPeer {
        /// Tag the service accepts
        expected: &'static str,
        /// Tag the client sent
        received: String,
    },

    /// Stream ended before all requested frames arrived.
    #[error("connection closed after {received} of {expected} frames")]
    ConnectionClosed {
        /// Frames requested
        expected: usize,
        /// Complete frames seen before end of stream
        received: usize,
    },

    /// Frame payload is not valid UTF-8.
    #[error("frame payload is not valid UTF-8")]
    InvalidUtf8,
}
