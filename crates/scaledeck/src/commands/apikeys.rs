//! API key command handlers.

use tabled::Tabled;

use scaledeck_core::{ApiKey, ApiKeyRef};

use crate::cli::{ApiKeysArgs, ApiKeysCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct ApiKeyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Prefix")]
    prefix: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
    #[tabled(rename = "Expiration")]
    expiration: String,
}

impl From<&ApiKey> for ApiKeyRow {
    fn from(k: &ApiKey) -> Self {
        Self {
            id: k.id.clone().unwrap_or_default(),
            prefix: k.prefix.clone(),
            created_at: util::timestamp(&k.created_at),
            last_seen: k.last_seen.as_deref().map(util::timestamp).unwrap_or_default(),
            expiration: util::timestamp(&k.expiration),
        }
    }
}

fn key_ref(key: String, by_id: bool) -> Result<ApiKeyRef, CliError> {
    if !by_id {
        return Ok(ApiKeyRef::Prefix(key));
    }
    key.parse::<u64>()
        .map(ApiKeyRef::Id)
        .map_err(|_| CliError::Validation {
            field: "id".into(),
            reason: format!("expected a numeric API key ID, got '{key}'"),
        })
}

pub async fn handle(ctx: &Context<'_>, args: ApiKeysArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let accessor = ctx.console.accessor();
    match args.command {
        ApiKeysCommand::List => {
            let keys =
                util::with_spinner("Fetching API keys", global.quiet, accessor.fetch_api_keys())
                    .await;
            let keys = ctx.check(keys)?;
            let out = output::render_list(
                global.output,
                &keys,
                |k| ApiKeyRow::from(k),
                |k| k.prefix.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApiKeysCommand::Delete { key, id } => {
            let key = key_ref(key, id)?;
            if !util::confirm(&format!("Delete API key ({key})?"), global.yes)? {
                return Ok(());
            }
            ctx.check(accessor.delete_api_key(key.clone()).await.into_result())?;
            ctx.done(&format!("API key ({key}) deleted"));
            Ok(())
        }

        ApiKeysCommand::Expire { prefix } => {
            if !util::confirm(&format!("Expire API key '{prefix}'?"), global.yes)? {
                return Ok(());
            }
            ctx.check(accessor.expire_api_key(&prefix).await.into_result())?;
            ctx.done(&format!("API key '{prefix}' expired"));
            Ok(())
        }
    }
}
