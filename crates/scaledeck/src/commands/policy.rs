//! Policy command handler.

use crate::cli::{PolicyArgs, PolicyCommand};
use crate::error::CliError;
use crate::output;

use super::Context;

/// The policy is printed as the server returns it, whatever `--output` says.
pub async fn handle(ctx: &Context<'_>, args: PolicyArgs) -> Result<(), CliError> {
    match args.command {
        PolicyCommand::Get => {
            let policy = ctx.check(ctx.console.accessor().fetch_policy().await)?;
            output::print_output(&policy, ctx.global.quiet);
            Ok(())
        }
    }
}
