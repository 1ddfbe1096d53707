//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to [`serve`], [`ping`]
//! or [`validate`]. Each handler lives in its own submodule.

pub mod ping;
pub mod serve;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::CorrelationIdError;

pub async fn dispatch(cli: Cli) -> Result<(), CorrelationIdError> {
    match cli.command {
        Some(Commands::Serve(args)) => serve::execute(*args).await,
        Some(Commands::Ping(args)) => ping::execute(args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  correlation-id v{version} \u{2014} correlation id middleware demo\n\n  \
         No command provided. To get started:\n\n    \
         correlation-id serve                  Start the demo server on :3000\n    \
         correlation-id ping                   Call /ping and show the correlation id\n    \
         correlation-id validate <file>        Check a config file\n    \
         correlation-id --help                 See all commands and options\n"
    );
}
