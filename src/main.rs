//! # DDO client
//!
//! Command line client for the DDO allocation and payments contracts.
use clap::Parser;
use ddo::cli::Cli;

#[tokio::main]
async fn main() {
    if let Err(err) = Cli::parse().run().await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
