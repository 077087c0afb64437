//! Shared helpers for command handlers.

use std::future::Future;
use std::time::Duration;

use chrono::DateTime;
use indicatif::ProgressBar;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Run `fut` behind a stderr spinner. Hidden in quiet mode.
pub async fn with_spinner<F: Future>(message: &str, quiet: bool, fut: F) -> F::Output {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    bar.finish_and_clear();
    out
}

/// Shorten an RFC 3339 timestamp for a table cell. Unparseable input is
/// shown as-is.
pub fn timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |t| t.naive_utc().format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Join a list for a table cell.
pub fn join(items: &[String]) -> String {
    items.join(", ")
}
