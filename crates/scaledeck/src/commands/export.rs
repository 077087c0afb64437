//! Export command handler.
//!
//! Refreshes the caches behind the requested resources, builds the
//! artifacts and writes them into the target directory.

use std::path::PathBuf;

use scaledeck_core::export::write_artifacts;
use scaledeck_core::{CoreError, ExportFormat, ExportOptions, ExportResource};

use crate::cli::{ExportArgs, ExportFormatArg, ExportResourceArg};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => Self::Json,
            ExportFormatArg::Csv => Self::Csv,
            ExportFormatArg::Yaml => Self::Yaml,
        }
    }
}

impl From<ExportResourceArg> for ExportResource {
    fn from(arg: ExportResourceArg) -> Self {
        match arg {
            ExportResourceArg::Users => Self::Users,
            ExportResourceArg::Nodes => Self::Nodes,
            ExportResourceArg::PreAuthKeys => Self::PreAuthKeys,
            ExportResourceArg::ApiKeys => Self::ApiKeys,
            ExportResourceArg::Policy => Self::Policy,
        }
    }
}

fn options(args: &ExportArgs) -> ExportOptions {
    let defaults = ExportOptions::default();
    ExportOptions {
        format: args.format.into(),
        resources: if args.resources.is_empty() {
            defaults.resources
        } else {
            args.resources.iter().copied().map(ExportResource::from).collect()
        },
        include_metadata: args.metadata,
        yaml_as_json: args.yaml_as_json,
    }
}

/// Load the caches an export of `resources` reads from.
async fn refresh_for(ctx: &Context<'_>, resources: &[ExportResource]) -> Result<(), CoreError> {
    let accessor = ctx.console.accessor();
    let wants = |r| resources.contains(&r);

    if wants(ExportResource::Users) || wants(ExportResource::PreAuthKeys) {
        accessor.refresh_users().await?;
    }
    if wants(ExportResource::Nodes) {
        accessor.refresh_nodes().await?;
    }
    if wants(ExportResource::PreAuthKeys) {
        accessor.refresh_pre_auth_keys().await?;
    }
    if wants(ExportResource::ApiKeys) {
        accessor.refresh_api_keys().await?;
    }
    Ok(())
}

pub async fn handle(ctx: &Context<'_>, args: ExportArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let options = options(&args);
    let dir = args
        .dir
        .or_else(|| config::load_config_or_default().defaults.export_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let refreshed =
        util::with_spinner("Loading data", global.quiet, refresh_for(ctx, &options.resources))
            .await;
    ctx.check(refreshed)?;

    let artifacts = ctx.check(ctx.console.exporter().export(&options).await)?;
    if artifacts.is_empty() {
        if !global.quiet {
            eprintln!("Nothing to export");
        }
        return Ok(());
    }

    let paths = ctx.check(write_artifacts(&dir, &artifacts))?;
    let listing = paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    output::print_output(&listing, global.quiet);
    ctx.done(&format!("Exported {} file(s) to {}", paths.len(), dir.display()));
    Ok(())
}
