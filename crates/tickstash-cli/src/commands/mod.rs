mod collect;
mod list;

use std::process::ExitCode;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Command::Collect(args) => collect::run(args).await,
        Command::List(args) => list::run(args),
    }
}
