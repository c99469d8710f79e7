/*
 * -----------------------------------------
 * Generates key for one-time pad encryption.
 * Consists of a string of random capital letters
 * and spaces, with a newline character at the end.
 * -----------------------------------------
 */

/*-----------USE STATEMENTS-----------*/
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use utils::keygen::generate_key;
use utils::logging;
/*-----------USE STATEMENTS-----------*/

#[derive(Parser)]
#[command(name = "keygen", about = "Print a random one-time pad key")]
struct Cli {
    /// Number of key symbols to generate
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    length: u64,
}

/*-----------MAIN-----------*/
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init("warn");

    let Ok(length) = usize::try_from(cli.length) else {
        eprintln!("keygen: length {} is too large", cli.length);
        return ExitCode::FAILURE;
    };

    let key = generate_key(length, &mut rand::thread_rng());
    debug!(length, "key generated");
    println!("{key}");
    ExitCode::SUCCESS
}
/*-----------MAIN-----------*/
