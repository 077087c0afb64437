//! Health command handler.

use scaledeck_core::Health;

use crate::error::CliError;
use crate::output;

use super::Context;

fn detail(h: &Health) -> String {
    format!(
        "Database: {}",
        if h.database_connectivity { "reachable" } else { "unreachable" }
    )
}

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let health = ctx.check(ctx.console.accessor().fetch_health().await)?;
    let out = output::render_single(ctx.global.output, &health, detail, |h| {
        h.database_connectivity.to_string()
    });
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
