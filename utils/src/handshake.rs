//! Role handshake.
//!
//! Before any payload moves, the client sends its role tag as one frame and
//! the service answers with its own. Each side checks the tag it received
//! against the one peer role it works with:
//!
//! ```text
//!   enc_client ──"enc_client@"──▶ enc_server
//!   enc_client ◀──"enc_server@"── enc_server
//! ```
//!
//! The service always answers before it acts on the client's tag, so a
//! client that reached the wrong flavour of service learns so from the tag
//! rather than from a bare disconnect.

use std::fmt;
use std::io::{self, Read, Write};

use tracing::debug;

use crate::cipher::Direction;
use crate::error::{Error, ProtocolError, Result};
use crate::frame::FramedStream;

/// Which of the four programs an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `enc_client`
    EncClient,
    /// `enc_server`
    EncServer,
    /// `dec_client`
    DecClient,
    /// `dec_server`
    DecServer,
}

impl Role {
    /// Wire tag identifying this role.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::EncClient => "enc_client",
            Self::EncServer => "enc_server",
            Self::DecClient => "dec_client",
            Self::DecServer => "dec_server",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [Self::EncClient, Self::EncServer, Self::DecClient, Self::DecServer]
            .into_iter()
            .find(|role| role.tag() == tag)
    }

    /// The only role this one will exchange payload with.
    pub const fn peer(self) -> Self {
        match self {
            Self::EncClient => Self::EncServer,
            Self::EncServer => Self::EncClient,
            Self::DecClient => Self::DecServer,
            Self::DecServer => Self::DecClient,
        }
    }

    /// Whether `tag` names this role's peer.
    pub fn accepts(self, tag: &str) -> bool {
        tag == self.peer().tag()
    }

    /// Cipher direction served by this role's service.
    pub const fn direction(self) -> Direction {
        match self {
            Self::EncClient | Self::EncServer => Direction::Encrypt,
            Self::DecClient | Self::DecServer => Direction::Decrypt,
        }
    }

    /// Whether this role initiates connections.
    pub const fn is_client(self) -> bool {
        matches!(self, Self::EncClient | Self::DecClient)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// End of stream, reset or broken pipe before the service sent a single
/// byte means it dropped us unread.
fn is_refusal(err: &Error) -> bool {
    match err {
        Error::Protocol(ProtocolError::ConnectionClosed { .. }) => true,
        Error::Io { source, .. } => matches!(
            source.kind(),
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
        ),
        _ => false,
    }
}

/// Client side: announce `role`, then verify the service's answer.
///
/// A service that closes the connection without answering is reported as
/// [`Error::CapacityRejected`]; a service that answers with the wrong tag as
/// [`ProtocolError::WrongService`].
pub fn client_handshake<S: Read + Write>(conn: &mut FramedStream<S>, role: Role) -> Result<()> {
    let reply = conn.send_frame(role.tag()).and_then(|()| conn.recv_frame());
    let tag = match reply {
        Ok(tag) => tag,
        Err(e) if conn.buffered() == 0 && is_refusal(&e) => return Err(Error::CapacityRejected),
        Err(e) => return Err(e),
    };

    if !role.accepts(&tag) {
        let expected = role.peer().tag();
        return Err(ProtocolError::WrongService { expected, received: tag }.into());
    }

    debug!(%role, peer = %tag, "handshake accepted");
    Ok(())
}

/// Service side: read the client's tag, answer with `role`, then verify
/// the client.
pub fn server_handshake<S: Read + Write>(conn: &mut FramedStream<S>, role: Role) -> Result<()> {
    let tag = conn.recv_frame()?;
    conn.send_frame(role.tag())?;

    if !role.accepts(&tag) {
        let expected = role.peer().tag();
        return Err(ProtocolError::UnexpectedPeer { expected, received: tag }.into());
    }

    debug!(%role, peer = %tag, "handshake accepted");
    Ok(())
}
