//! Sentinel-delimited framing over a byte stream.
//!
//! Every frame is its payload followed by a single [`SENTINEL`] byte. There
//! is no length prefix, so the reader accumulates bytes until it has seen as
//! many sentinels as the caller asked for. Payloads must never contain the
//! sentinel; this is a precondition of the protocol and is not checked here.
//!
//! ```text
//!   H E L L O @ X M C K L @
//!   └─ text ──┘ └── key ──┘
//! ```

use std::io::{self, Read, Write};

use crate::error::{Error, ProtocolError, Result};

/// End-of-frame marker (`@`).
pub const SENTINEL: u8 = b'@';

/// Initial capacity of the receive buffer.
pub const BUFFER_SIZE: usize = 4096;

/// A byte stream that speaks in sentinel-terminated frames.
///
/// Bytes that arrive after the last requested sentinel are kept and served
/// by the next [`recv_frames`](Self::recv_frames) call.
#[derive(Debug)]
pub struct FramedStream<S> {
    stream: S,
    /// Bytes received but not yet handed out as frames
    buf: Vec<u8>,
    /// Offset in `buf` up to which sentinels have already been located
    scanned: usize,
    /// Offsets of located sentinels in `buf`, in order
    sentinels: Vec<usize>,
}

impl<S> FramedStream<S> {
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        Self { stream, buf: Vec::with_capacity(BUFFER_SIZE), scanned: 0, sentinels: Vec::new() }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Release the underlying stream, discarding any buffered bytes.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Bytes received but not yet returned as frames.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Current receive buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Record sentinels in the bytes appended since the last scan.
    fn scan(&mut self) {
        let start = self.scanned;
        let found = self.buf[start..].iter().enumerate().filter(|(_, b)| **b == SENTINEL);
        self.sentinels.extend(found.map(|(i, _)| start + i));
        self.scanned = self.buf.len();
    }

    /// Append a chunk, doubling the buffer capacity as often as needed.
    fn append(&mut self, chunk: &[u8]) {
        let needed = self.buf.len() + chunk.len();
        let mut capacity = self.buf.capacity().max(BUFFER_SIZE);
        while capacity < needed {
            capacity *= 2;
        }
        if capacity > self.buf.capacity() {
            self.buf.reserve_exact(capacity - self.buf.len());
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Split the first `count` frames off the buffer.
    fn take_frames(&mut self, count: usize) -> Result<Vec<String>> {
        let mut frames = Vec::with_capacity(count);
        let mut start = 0;
        for &end in &self.sentinels[..count] {
            let payload = std::str::from_utf8(&self.buf[start..end])
                .map_err(|_| ProtocolError::InvalidUtf8)?;
            frames.push(payload.to_owned());
            start = end + 1;
        }

        self.buf.drain(..start);
        self.sentinels.drain(..count);
        for offset in &mut self.sentinels {
            *offset -= start;
        }
        self.scanned -= start;
        Ok(frames)
    }
}

impl<S: Read> FramedStream<S> {
    /// Block until `count` frames have arrived and return their payloads in
    /// wire order, sentinels removed.
    ///
    /// End of stream before the last sentinel is a
    /// [`ProtocolError::ConnectionClosed`]; it is never retried.
    pub fn recv_frames(&mut self, count: usize) -> Result<Vec<String>> {
        let mut chunk = [0u8; BUFFER_SIZE];
        self.scan();

        while self.sentinels.len() < count {
            let n = match self.stream.read(&mut chunk) {
                Ok(0) => {
                    return Err(ProtocolError::ConnectionClosed {
                        expected: count,
                        received: self.sentinels.len(),
                    }
                    .into());
                },
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io("receiving frame", e)),
            };
            self.append(&chunk[..n]);
            self.scan();
        }

        self.take_frames(count)
    }

    /// Receive a single-field message.
    pub fn recv_frame(&mut self) -> Result<String> {
        let mut frames = self.recv_frames(1)?;
        Ok(frames.pop().unwrap_or_default())
    }
}

impl<S: Write> FramedStream<S> {
    /// Send `payload` followed by the sentinel.
    ///
    /// Short writes resume from the last byte the stream accepted. A write
    /// that fails, or that accepts nothing, ends the send with an error.
    pub fn send_frame(&mut self, payload: &str) -> Result<()> {
        let mut message = Vec::with_capacity(payload.len() + 1);
        message.extend_from_slice(payload.as_bytes());
        message.push(SENTINEL);

        let mut written = 0;
        while written < message.len() {
            match self.stream.write(&message[written..]) {
                Ok(0) => {
                    return Err(Error::io(
                        "sending frame",
                        io::Error::new(io::ErrorKind::WriteZero, "peer stopped accepting bytes"),
                    ));
                },
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                Err(e) => return Err(Error::io("sending frame", e)),
            }
        }

        self.stream.flush().map_err(|e| Error::io("flushing frame", e))
    }
}
