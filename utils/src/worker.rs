//! Per-connection service logic.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cipher;
use crate::error::{Error, ProtocolError, Result};
use crate::frame::FramedStream;
use crate::handshake::{server_handshake, Role};

/// Run one request on an accepted connection as service `role`: handshake,
/// receive text and key, reply with the transformed text.
///
/// Nothing is read past the handshake unless the client is the expected
/// peer.
pub fn serve<S: Read + Write>(conn: &mut FramedStream<S>, role: Role) -> Result<()> {
    server_handshake(conn, role)?;

    let fields = conn.recv_frames(2)?;
    let [text, key] = fields.as_slice() else {
        return Err(ProtocolError::ConnectionClosed { expected: 2, received: fields.len() }.into());
    };
    debug!(%role, text_len = text.len(), key_len = key.len(), "payload received");

    let result = cipher::transform(text, key, role.direction())?;
    conn.send_frame(&result)
}

/// Serve `stream` to completion, logging instead of propagating failures.
///
/// The connection is closed when this returns.
pub fn serve_connection(stream: TcpStream, role: Role, io_timeout: Option<Duration>) {
    let peer = stream.peer_addr().map(|addr| addr.to_string()).unwrap_or_else(|_| "unknown".into());

    if let Err(e) = apply_timeout(&stream, io_timeout) {
        warn!(%peer, %role, error = %e, "could not set connection deadline");
        return;
    }

    let mut conn = FramedStream::new(stream);
    match serve(&mut conn, role) {
        Ok(()) => info!(%peer, %role, "request served"),
        Err(Error::Protocol(e)) => warn!(%peer, %role, error = %e, "protocol error"),
        Err(e) => warn!(%peer, %role, error = %e, "request failed"),
    }

    let _ = conn.get_ref().shutdown(Shutdown::Both);
}

fn apply_timeout(stream: &TcpStream, timeout: Option<Duration>) -> Result<()> {
    stream.set_read_timeout(timeout).map_err(|e| Error::io("setting read timeout", e))?;
    stream.set_write_timeout(timeout).map_err(|e| Error::io("setting write timeout", e))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::error::ValidationError;

    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(role: Role, input: &[u8]) -> (Result<()>, Vec<u8>) {
        let mut conn =
            FramedStream::new(Duplex { input: Cursor::new(input.to_vec()), output: Vec::new() });
        let result = serve(&mut conn, role);
        (result, conn.into_inner().output)
    }

    #[test]
    fn encrypts_request() {
        let (result, output) = run(Role::EncServer, b"enc_client@HE @XMK@");
        result.unwrap();
        assert_eq!(output, b"enc_server@ERK@");
    }

    #[test]
    fn decrypts_request() {
        let (result, output) = run(Role::DecServer, b"dec_client@ERK@XMKQQ@");
        result.unwrap();
        assert_eq!(output, b"dec_server@HE @");
    }

    #[test]
    fn foreign_client_gets_tag_but_no_payload() {
        let (result, output) = run(Role::DecServer, b"enc_client@HE @XMK@");
        assert!(matches!(result, Err(Error::Protocol(ProtocolError::UnexpectedPeer { .. }))));
        assert_eq!(output, b"dec_server@");
    }

    #[test]
    fn missing_key_frame_is_connection_closed() {
        let (result, output) = run(Role::EncServer, b"enc_client@HELLO@XM");
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::ConnectionClosed { expected: 2, received: 1 }))
        ));
        assert_eq!(output, b"enc_server@");
    }

    #[test]
    fn invalid_payload_sends_no_result() {
        let (result, output) = run(Role::EncServer, b"enc_client@hello@XMCKL@");
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidCharacter { ch: 'h', .. }))
        ));
        assert_eq!(output, b"enc_server@");
    }
}
