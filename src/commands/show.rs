//! `vtysync show` - records as currently configured

use anyhow::{Context as AnyhowContext, Result, anyhow};
use blockconf::{BlockKind, ResourceRecord};
use colored::Colorize;
use quaggakit::kinds;
use std::collections::BTreeMap;

use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, kind: Option<&str>, json: bool) -> Result<()> {
    let selected: Vec<&'static dyn BlockKind> = match kind {
        Some(name) => {
            vec![kinds::by_name(name).ok_or_else(|| anyhow!("Unknown resource kind `{}`", name))?]
        }
        None => kinds::all().to_vec(),
    };

    let client = ctx.client()?;
    let reconciler = client
        .reconciler()
        .map_err(|e| crate::vtysh_error(e, "Failed to read running configuration"))?;

    let mut by_kind: BTreeMap<&'static str, Vec<ResourceRecord>> = BTreeMap::new();
    for kind in &selected {
        let records = reconciler
            .records(*kind)
            .with_context(|| format!("Failed to parse {} records", kind.name()))?;
        by_kind.insert(kind.name(), records);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&by_kind)?);
        return Ok(());
    }

    ui::header("Running Configuration");
    for kind in selected {
        print_records(kind, &by_kind[kind.name()], ctx.verbose > 0);
    }

    Ok(())
}

/// Print the records of one kind; only non-default fields unless `all_fields`.
fn print_records(kind: &dyn BlockKind, records: &[ResourceRecord], all_fields: bool) {
    ui::section(ui::kind_title(kind.name()));

    if records.is_empty() {
        ui::dim("(none)");
        return;
    }

    for record in records {
        let icon = if record.is_present() {
            "●".green()
        } else {
            "○".dimmed()
        };
        let attributes: Vec<String> = record
            .attributes
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        println!(
            "  {} {} {}",
            icon,
            record.identity.bold(),
            attributes.join(" ").dimmed()
        );

        if !record.is_present() {
            continue;
        }

        for field in kind.fields().iter() {
            let Some(value) = record.get(field.name) else {
                continue;
            };
            if all_fields || !value.equivalent(&field.default) {
                ui::kv(&format!("  {}", field.name), &value.to_string());
            }
        }
    }
}
