//! # Stitch Desk Entry Point
//!
//! Parses the command line, sets up logging and runs one command.
//!
//! ## Exit Codes
//! - `0` - command succeeded (including "nothing to print")
//! - `1` - command failed; the error is printed to stderr, or to stdout as
//!   JSON with `--json`

use std::process::ExitCode;

use clap::Parser;

use stitch_desk::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    stitch_desk::init_tracing();

    let json = cli.json;
    match stitch_desk::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                match serde_json::to_string_pretty(&err) {
                    Ok(text) => println!("{}", text),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("Error: {}", err.message);
            }
            ExitCode::FAILURE
        }
    }
}
