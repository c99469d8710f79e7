/*
 * -----------------------------------------
 * Decryption server for one-time pad encryption.
 * Receives ciphertext and key from dec_client,
 * decrypts them with the pad,
 * sends the plaintext back to dec_client.
 * Only dec_client passes the handshake;
 * every other peer is turned away before any payload.
 * -----------------------------------------
 */

/*-----------USE STATEMENTS-----------*/
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use utils::{logging, parse_port, Role, Server, ServerConfig, MAX_CONNECTIONS};
/*-----------USE STATEMENTS-----------*/

/*-----------CONSTANT DEFINITIONS-----------*/
const ROLE: Role = Role::DecServer;
/*-----------CONSTANT DEFINITIONS-----------*/

#[derive(Parser)]
#[command(name = "dec_server", about = "One-time pad decryption service")]
struct Cli {
    /// Port to listen on
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Connections served in parallel; extra ones are closed unserved
    #[arg(long, default_value_t = MAX_CONNECTIONS)]
    max_connections: usize,

    /// Drop connections idle for this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/*-----------MAIN-----------*/
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init("info");

    let config = ServerConfig::new(cli.port)
        .with_max_connections(cli.max_connections)
        .with_io_timeout(cli.timeout_secs.map(Duration::from_secs));

    let server = match Server::bind(&config, ROLE) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to start {ROLE}");
            return ExitCode::FAILURE;
        },
    };

    server.run();
    ExitCode::SUCCESS
}
/*-----------MAIN-----------*/
