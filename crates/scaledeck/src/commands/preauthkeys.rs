//! Pre-auth key command handlers.

use tabled::Tabled;

use scaledeck_core::PreAuthKey;

use crate::cli::{PreAuthKeysArgs, PreAuthKeysCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct PreAuthKeyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Reusable")]
    reusable: String,
    #[tabled(rename = "Ephemeral")]
    ephemeral: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Expiration")]
    expiration: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl PreAuthKeyRow {
    fn new(k: &PreAuthKey, color: bool) -> Self {
        Self {
            id: k.id.clone(),
            key: format!("{}…", k.key_preview()),
            user: k.user.name.clone(),
            reusable: output::yes_no(k.reusable, color),
            ephemeral: output::yes_no(k.ephemeral, color),
            used: output::yes_no(k.used, color),
            expiration: util::timestamp(&k.expiration),
            tags: util::join(&k.acl_tags),
        }
    }
}

pub async fn handle(ctx: &Context<'_>, args: PreAuthKeysArgs) -> Result<(), CliError> {
    let global = ctx.global;
    match args.command {
        PreAuthKeysCommand::List { users } => {
            let ids = (!users.is_empty()).then_some(users.as_slice());
            let keys = util::with_spinner(
                "Fetching pre-auth keys",
                global.quiet,
                ctx.console.accessor().fetch_pre_auth_keys(ids),
            )
            .await;
            let keys = ctx.check(keys)?;
            let out = output::render_list(
                global.output,
                &keys,
                |k| PreAuthKeyRow::new(k, ctx.color),
                |k| k.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
