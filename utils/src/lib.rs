//! One-time pad encryption services and clients.
//!
//! Four programs share this crate: `enc_server` and `dec_server` listen for
//! connections and transform text, `enc_client` and `dec_client` send text
//! and a key to the matching service and print the result. The wire format
//! is a sequence of `@`-terminated frames:
//!
//! ```text
//!   client                                   service
//!     │ ── "enc_client@" ──────────────────────▶ │
//!     │ ◀────────────────────── "enc_server@" ── │
//!     │ ── "HELLO WORLD@" "XMCKLVBQPVH@" ──────▶ │
//!     │ ◀──────────────────── "<ciphertext>@" ── │
//! ```
//!
//! # Components
//!
//! - [`cipher`]: the pad itself over `A-Z` and space
//! - [`frame`]: sentinel framing tolerant of partial reads and writes
//! - [`handshake`]: role tags and the client/service handshake
//! - [`server`]: accept loop with a soft cap on concurrent workers
//! - [`worker`]: serving one connection
//! - [`client`]: input validation and the client exchange

pub mod cipher;
pub mod client;
pub mod config;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod input;
pub mod keygen;
pub mod limit;
pub mod logging;
pub mod server;
pub mod worker;

pub use cipher::{decrypt, encrypt, transform, Direction};
pub use client::{run_client, CipherJob, ClientSession};
pub use config::{parse_port, ClientConfig, ServerConfig};
pub use error::{Error, ProtocolError, Result, ValidationError};
pub use frame::{FramedStream, SENTINEL};
pub use handshake::Role;
pub use limit::{ConnectionLimit, MAX_CONNECTIONS};
pub use server::{Dispatch, Server};
