//! Node command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use scaledeck_core::Node;

use crate::cli::{NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    given_name: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "IP Addresses")]
    ips: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl NodeRow {
    fn new(n: &Node, color: bool) -> Self {
        Self {
            id: n.id.clone(),
            given_name: n.given_name.clone(),
            user: n.user.name.clone(),
            ips: util::join(&n.ip_addresses),
            online: output::yes_no(n.online, color),
            last_seen: n.last_seen.as_deref().map(util::timestamp).unwrap_or_default(),
            tags: util::join(&n.tags),
        }
    }
}

fn detail(n: &Node) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:             {}", n.id);
    let _ = writeln!(out, "Name:           {}", n.given_name);
    let _ = writeln!(out, "Hostname:       {}", n.name);
    let _ = writeln!(out, "User:           {} ({})", n.user.label(), n.user.id);
    let _ = writeln!(out, "IP Addresses:   {}", util::join(&n.ip_addresses));
    let _ = writeln!(out, "Online:         {}", n.online);
    let _ = writeln!(out, "Last Seen:      {}", n.last_seen.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Created:        {}", n.created_at);
    let _ = writeln!(out, "Expiry:         {}", n.expiry.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Registered Via: {}", n.register_method_label());
    let _ = writeln!(out, "Tags:           {}", util::join(&n.tags));
    let _ = writeln!(out, "Approved:       {}", util::join(&n.approved_routes));
    let pending: Vec<String> = n.pending_routes().map(str::to_owned).collect();
    let _ = write!(out, "Pending:        {}", util::join(&pending));
    out
}

pub async fn handle(ctx: &Context<'_>, args: NodesArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let accessor = ctx.console.accessor();
    match args.command {
        NodesCommand::List => {
            let nodes = util::with_spinner("Fetching nodes", global.quiet, accessor.fetch_nodes()).await;
            let nodes = ctx.check(nodes)?;
            let out = output::render_list(
                global.output,
                &nodes,
                |n| NodeRow::new(n, ctx.color),
                |n| n.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NodesCommand::Get { id } => {
            let node = ctx.check(accessor.fetch_node(&id).await)?;
            let out = output::render_single(global.output, &node, detail, |n| n.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NodesCommand::Delete { id } => {
            let node = ctx.check(accessor.fetch_node(&id).await)?;
            if !util::confirm(
                &format!("Delete node '{}' ({})?", node.given_name, node.id),
                global.yes,
            )? {
                return Ok(());
            }
            ctx.check(accessor.delete_node(&node).await.into_result())?;
            ctx.done(&format!("Node '{}' deleted", node.given_name));
            Ok(())
        }
    }
}
