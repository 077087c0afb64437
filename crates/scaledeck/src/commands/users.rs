//! User command handlers.

use tabled::Tabled;

use scaledeck_core::{User, UserFilter};

use crate::cli::{UserQuery, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            display_name: u.display_name.clone().unwrap_or_default(),
            email: u.email.clone(),
            provider: u.provider.clone(),
            created_at: util::timestamp(&u.created_at),
        }
    }
}

fn user_filter(query: UserQuery) -> Option<UserFilter> {
    query
        .id
        .map(UserFilter::by_id)
        .or_else(|| query.name.map(UserFilter::by_name))
        .or_else(|| query.email.map(UserFilter::by_email))
}

/// Look a user up on the server by ID.
pub(super) async fn find_user(ctx: &Context<'_>, id: &str) -> Result<User, CliError> {
    let users = ctx.check(
        ctx.console
            .accessor()
            .fetch_users(Some(&UserFilter::by_id(id)))
            .await,
    )?;
    users
        .into_iter()
        .find(|u| u.id == id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "user".into(),
            identifier: id.into(),
            list_command: "users list".into(),
        })
}

pub async fn handle(ctx: &Context<'_>, args: UsersArgs) -> Result<(), CliError> {
    let global = ctx.global;
    match args.command {
        UsersCommand::List(query) => {
            let filter = user_filter(query);
            let users = util::with_spinner(
                "Fetching users",
                global.quiet,
                ctx.console.accessor().fetch_users(filter.as_ref()),
            )
            .await;
            let users = ctx.check(users)?;
            let out = output::render_list(
                global.output,
                &users,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            let user = find_user(ctx, &id).await?;
            if !util::confirm(
                &format!("Delete user '{}' ({})?", user.label(), user.id),
                global.yes,
            )? {
                return Ok(());
            }
            ctx.check(ctx.console.accessor().delete_user(&user).await.into_result())?;
            ctx.done(&format!("User '{}' deleted", user.name));
            Ok(())
        }
    }
}
