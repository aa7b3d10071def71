//! Declarative commands
//!
//! - `diff` - Preview what apply would change
//! - `apply` - Make the router match the desired-state file

use anyhow::{Result, bail};
use colored::Colorize;
use serde::Serialize;

use crate::Context;
use crate::engine::{self, ExecuteOptions, Target};
use crate::schema::DesiredConfig;
use crate::ui;
use blockconf::{DiffSummary, ResourceDiff};

/// Machine-readable `diff --json` document.
#[derive(Serialize)]
struct DiffReport<'a> {
    summary: DiffSummary,
    resources: &'a [ResourceDiff],
}

fn plan(ctx: &Context, target: Option<&str>) -> Result<(quaggakit::Client, Vec<ResourceDiff>)> {
    let target = target.map(Target::parse).transpose()?;

    let path = ctx.desired_path()?;
    let config = DesiredConfig::load(&path)?;
    if config.is_empty() {
        ui::warn(&format!("No resources declared in {}", path.display()));
    }
    let resources = config.resources()?;

    let client = ctx.client()?;
    let reconciler = client
        .reconciler()
        .map_err(|e| crate::vtysh_error(e, "Failed to read running configuration"))?;

    let diffs = engine::compute_diffs(&reconciler, &resources, target.as_ref())?;
    Ok((client, diffs))
}

pub fn diff(ctx: &Context, target: Option<&str>, json: bool) -> Result<()> {
    let (_, diffs) = plan(ctx, target)?;

    if json {
        let report = DiffReport {
            summary: DiffSummary::from_diffs(&diffs),
            resources: &diffs,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    engine::display_diff(&diffs, true);
    Ok(())
}

pub fn apply(ctx: &Context, target: Option<&str>, dry_run: bool, yes: bool) -> Result<()> {
    let (client, diffs) = plan(ctx, target)?;

    let opts = ExecuteOptions {
        dry_run,
        yes,
        verbose: ctx.verbose > 0,
    };
    let summary = engine::execute(&client, &diffs, &opts)?;

    if !summary.is_success() {
        bail!(
            "{} of {} resources failed to apply",
            summary.failed.to_string().red(),
            summary.total()
        );
    }
    Ok(())
}
