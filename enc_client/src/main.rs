/*
 * -----------------------------------------
 * Encryption client for one-time pad encryption.
 * Reads plaintext and key from their files,
 * validates both against the 27-symbol alphabet,
 * sends them to enc_server as two frames,
 * and writes the ciphertext it gets back to stdout.
 * Refuses to exchange payload with dec_server.
 * -----------------------------------------
 */

/*-----------USE STATEMENTS-----------*/
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use utils::config::DEFAULT_HOST;
use utils::{logging, parse_port, run_client, ClientConfig, Role};
/*-----------USE STATEMENTS-----------*/

/*-----------CONSTANT DEFINITIONS-----------*/
const ROLE: Role = Role::EncClient;
/*-----------CONSTANT DEFINITIONS-----------*/

#[derive(Parser)]
#[command(name = "enc_client", about = "Send plaintext to the one-time pad encryption service")]
struct Cli {
    /// File holding the plaintext
    plaintext_file: PathBuf,

    /// File holding the key
    key_file: PathBuf,

    /// Port enc_server listens on
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Host enc_server runs on
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
}

/*-----------MAIN-----------*/
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init("warn");

    let config = ClientConfig {
        text_path: cli.plaintext_file,
        key_path: cli.key_file,
        host: cli.host,
        port: cli.port,
    };

    match run_client(&config, ROLE) {
        Ok(ciphertext) => {
            println!("{ciphertext}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{}: {e}", ROLE.tag());
            ExitCode::from(e.exit_code())
        },
    }
}
/*-----------MAIN-----------*/
