/*
 * -----------------------------------------
 * Decryption client for one-time pad encryption.
 * Reads ciphertext and key from their files,
 * validates both against the 27-symbol alphabet,
 * sends them to dec_server as two frames,
 * and writes the plaintext it gets back to stdout.
 * Refuses to exchange payload with enc_server.
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
const ROLE: Role = Role::DecClient;
/*-----------CONSTANT DEFINITIONS-----------*/

#[derive(Parser)]
#[command(name = "dec_client", about = "Send ciphertext to the one-time pad decryption service")]
struct Cli {
    /// File holding the ciphertext
    ciphertext_file: PathBuf,

    /// File holding the key
    key_file: PathBuf,

    /// Port dec_server listens on
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Host dec_server runs on
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
}

/*-----------MAIN-----------*/
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init("warn");

    let config = ClientConfig {
        text_path: cli.ciphertext_file,
        key_path: cli.key_file,
        host: cli.host,
        port: cli.port,
    };

    match run_client(&config, ROLE) {
        Ok(plaintext) => {
            println!("{plaintext}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{}: {e}", ROLE.tag());
            ExitCode::from(e.exit_code())
        },
    }
}
/*-----------MAIN-----------*/
