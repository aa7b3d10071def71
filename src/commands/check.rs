//! `vtysync check` - validate the desired-state file without touching the router

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::schema::DesiredConfig;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    ui::header("Desired State Check");

    let path = ctx.desired_path()?;
    ui::kv("File", &path.display().to_string());

    let config = DesiredConfig::load(&path)?;
    let resources = config.resources()?;

    if !ctx.quiet {
        println!();
        for declared in &resources {
            println!(
                "  {} {} {}",
                "✓".green(),
                declared.id(),
                format!(
                    "({} {}, {} field(s))",
                    declared.state.ensure,
                    declared.kind.name(),
                    declared.state.properties.len()
                )
                .dimmed()
            );
        }
    }

    match ctx.client() {
        Ok(_) => ui::kv("vtysh", "found"),
        Err(e) => ui::warn(&format!("{e:#}")),
    }

    println!();
    ui::success(&format!("{} resource(s) valid", resources.len()));
    Ok(())
}
