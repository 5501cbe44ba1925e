//! Stock service entry point.

use std::process::ExitCode;

use clap::Parser;

use stock_service::cli::{self, Cli};

fn main() -> ExitCode {
    cli::run(Cli::parse())
}
