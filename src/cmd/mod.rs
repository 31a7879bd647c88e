//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], [`status`], or [`echo`].
//! Each handler lives in its own submodule.

pub mod echo;
pub mod run;
pub mod status;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::RotorError;

pub async fn dispatch(cli: Cli) -> Result<(), RotorError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        Some(Commands::Status(args)) => status::execute(args).await,
        Some(Commands::Echo(args)) => echo::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  rotor v{version}: round-robin HTTP load balancer\n\n  \
         No command provided. To get started:\n\n    \
         rotor run 5 -b http://a:8080,http://b:8080   Balance two backends, probe every 5s\n    \
         rotor run                                    Start from ./rotor.yaml (auto-detected)\n    \
         rotor echo -p 8080                           Start a demonstration backend\n    \
         rotor --help                                 See all commands and options\n"
    );
}
