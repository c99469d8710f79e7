//! Client side of the protocol.

use std::net::TcpStream;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result, ValidationError};
use crate::frame::FramedStream;
use crate::handshake::{client_handshake, Role};
use crate::input::{read_file, validate_buffer};

/// A text and the key to apply to it, checked against the alphabet and
/// length invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherJob {
    text: String,
    key: String,
}

impl CipherJob {
    /// Validate `text` and `key`. The key must be at least as long as the
    /// text and both may hold only capital letters and spaces.
    pub fn new(text: String, key: String) -> std::result::Result<Self, ValidationError> {
        let text_len = text.chars().count();
        let key_len = key.chars().count();
        if key_len < text_len {
            return Err(ValidationError::KeyTooShort { key_len, text_len });
        }
        validate_buffer(&text, "text")?;
        validate_buffer(&key, "key")?;
        Ok(Self { text, key })
    }

    /// Text to transform.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Key to transform it with.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// A connection to an encryption or decryption service.
#[derive(Debug)]
pub struct ClientSession {
    conn: FramedStream<TcpStream>,
    role: Role,
}

impl ClientSession {
    /// Open a TCP connection to `address` as client `role`.
    pub fn connect(address: &str, role: Role) -> Result<Self> {
        let stream = TcpStream::connect(address)
            .map_err(|source| Error::Connect { addr: address.to_string(), source })?;
        debug!(%role, address, "connected");
        Ok(Self { conn: FramedStream::new(stream), role })
    }

    /// Identify ourselves and check we reached the matching service.
    pub fn handshake(&mut self) -> Result<()> {
        client_handshake(&mut self.conn, self.role)
    }

    /// Send text and key, then wait for the transformed text.
    pub fn exchange(&mut self, job: &CipherJob) -> Result<String> {
        self.conn.send_frame(job.text())?;
        self.conn.send_frame(job.key())?;
        self.conn.recv_frame()
    }
}

/// Read and validate the input files, then have the service matching
/// `role` transform them.
///
/// Nothing touches the network until the input has been validated.
pub fn run_client(config: &ClientConfig, role: Role) -> Result<String> {
    if !role.is_client() {
        return Err(Error::Config(format!("{role} is not a client role")));
    }

    let text = read_file(&config.text_path)?;
    let key = read_file(&config.key_path)?;
    let job = CipherJob::new(text, key)?;

    let mut session = ClientSession::connect(&config.address(), role)?;
    session.handshake()?;
    session.exchange(&job)
}
