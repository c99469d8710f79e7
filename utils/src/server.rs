//! Connection dispatcher.
//!
//! ```text
//!   Idle ──bind──▶ Listening ──accept──▶ Dispatching ──spawn──▶ Listening
//!     │                                      │
//!     └──bind fails──▶ Failed                └──at cap──▶ close, Listening
//! ```
//!
//! Every accepted connection is served on its own thread. The accept loop
//! never waits for a worker; a worker's slot in the [`ConnectionLimit`] is
//! released when the worker's thread finishes, whichever way it ends.
//!
//! The cap is soft: a connection arriving while `max_connections` workers
//! are live is still accepted at the TCP level, then closed before the
//! handshake.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::handshake::Role;
use crate::limit::ConnectionLimit;
use crate::worker::serve_connection;

/// What happened to one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handed to a worker thread
    Spawned,
    /// Closed immediately because the cap was reached
    Refused,
}

/// A listening encryption or decryption service.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    role: Role,
    limit: ConnectionLimit,
    io_timeout: Option<Duration>,
}

impl Server {
    /// Validate `config` and bind the service's listening socket.
    pub fn bind(config: &ServerConfig, role: Role) -> Result<Self> {
        config.validate()?;
        if role.is_client() {
            return Err(Error::Config(format!("{role} is not a service role")));
        }

        let address = config.bind_address();
        let listener =
            TcpListener::bind(&address).map_err(|e| Error::io(format!("binding {address}"), e))?;

        Ok(Self::from_listener(listener, role, config.max_connections)
            .with_io_timeout(config.io_timeout))
    }

    /// Serve on an already bound listener.
    pub fn from_listener(listener: TcpListener, role: Role, max_connections: usize) -> Self {
        Self { listener, role, limit: ConnectionLimit::new(max_connections), io_timeout: None }
    }

    /// Set a read/write deadline for every served connection.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(|e| Error::io("reading listener address", e))
    }

    /// Live-worker accounting shared with the workers.
    pub fn limit(&self) -> &ConnectionLimit {
        &self.limit
    }

    /// Accept and dispatch connections until the process is killed.
    ///
    /// A failed accept is logged and the loop keeps going.
    pub fn run(&self) {
        info!(
            role = %self.role,
            address = ?self.listener.local_addr().ok(),
            max_connections = self.limit.max(),
            "service listening"
        );

        loop {
            if let Err(e) = self.accept_one() {
                error!(role = %self.role, error = %e, "failed to accept connection");
            }
        }
    }

    /// Block for one connection and dispatch it.
    pub fn accept_one(&self) -> Result<Dispatch> {
        let (stream, peer) =
            self.listener.accept().map_err(|e| Error::io("accepting connection", e))?;
        Ok(self.dispatch(stream, peer))
    }

    fn dispatch(&self, stream: TcpStream, peer: SocketAddr) -> Dispatch {
        let Some(slot) = self.limit.try_acquire() else {
            warn!(
                %peer,
                role = %self.role,
                max_connections = self.limit.max(),
                "at capacity, closing connection"
            );
            drop(stream);
            return Dispatch::Refused;
        };
        debug!(%peer, role = %self.role, active = self.limit.active(), "connection accepted");

        let role = self.role;
        let io_timeout = self.io_timeout;
        let spawned = thread::Builder::new().name(format!("{role}-{peer}")).spawn(move || {
            let _slot = slot;
            serve_connection(stream, role, io_timeout);
        });

        match spawned {
            Ok(_) => Dispatch::Spawned,
            Err(e) => {
                // the failed spawn dropped the closure, releasing the slot
                error!(%peer, error = %e, "failed to spawn worker");
                Dispatch::Refused
            },
        }
    }
}
