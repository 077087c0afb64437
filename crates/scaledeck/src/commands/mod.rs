//! Command dispatch and the per-invocation context shared by handlers.

pub mod apikeys;
pub mod config_cmd;
pub mod export;
pub mod health;
pub mod nodes;
pub mod policy;
pub mod preauthkeys;
pub mod users;
pub mod util;

use owo_colors::OwoColorize;

use scaledeck_core::classify::SESSION_UNAUTHORIZED;
use scaledeck_core::{Console, CoreError, EnglishCatalog, ErrorHandler, MessageCatalog};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// A connected console plus the flags and error routing for one run.
pub struct Context<'a> {
    pub console: Console,
    pub global: &'a GlobalOpts,
    pub color: bool,
    errors: ErrorHandler,
}

impl<'a> Context<'a> {
    pub fn new(console: Console, global: &'a GlobalOpts) -> Self {
        let color = output::should_color(global.color);
        Self {
            console,
            global,
            color,
            errors: ErrorHandler::new(move || session_expired_notice(color)),
        }
    }

    /// Route a core failure through the error handler, then convert it.
    pub fn check<T>(&self, result: Result<T, CoreError>) -> Result<T, CliError> {
        result.map_err(|err| {
            self.errors.handle(&err);
            CliError::from(err)
        })
    }

    /// Print a one-line confirmation to stderr unless `--quiet`.
    pub fn done(&self, message: &str) {
        if !self.global.quiet {
            eprintln!("{} {message}", output::success_mark(self.color));
        }
    }
}

fn session_expired_notice(color: bool) {
    let text = EnglishCatalog.translate(SESSION_UNAUTHORIZED);
    if color {
        eprintln!("{} {text}", "session expired:".yellow().bold());
    } else {
        eprintln!("session expired: {text}");
    }
}

pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(ctx, args).await,
        Command::Nodes(args) => nodes::handle(ctx, args).await,
        Command::Preauthkeys(args) => preauthkeys::handle(ctx, args).await,
        Command::Apikeys(args) => apikeys::handle(ctx, args).await,
        Command::Policy(args) => policy::handle(ctx, args).await,
        Command::Health => health::handle(ctx).await,
        Command::Export(args) => export::handle(ctx, args).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before connecting"),
    }
}
