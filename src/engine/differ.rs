//! Diff computation and display

use crate::schema::Declared;
use crate::ui;
use anyhow::{Context, Result, bail};
use blockconf::{DiffSummary, Reconciler, ResourceDiff, group_by_kind};
use colored::Colorize;
use quaggakit::kinds;

/// Resource selector given with `--target`: `kind` or `kind.identity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: String,
    pub identity: Option<String>,
}

impl Target {
    pub fn parse(target: &str) -> Result<Self> {
        let (kind, identity) = match target.split_once('.') {
            Some((kind, identity)) => (kind, Some(identity.to_string())),
            None => (target, None),
        };

        if !kinds::NAMES.contains(&kind) {
            bail!(
                "Unknown resource kind `{}` (expected one of: {})",
                kind,
                kinds::NAMES.join(", ")
            );
        }

        Ok(Self {
            kind: kind.to_string(),
            identity,
        })
    }

    pub fn matches(&self, declared: &Declared) -> bool {
        declared.kind.name() == self.kind
            && self
                .identity
                .as_deref()
                .is_none_or(|id| id == declared.state.identity)
    }
}

/// Plan every selected resource against one reconciler.
pub fn compute_diffs(
    reconciler: &Reconciler,
    resources: &[Declared],
    target: Option<&Target>,
) -> Result<Vec<ResourceDiff>> {
    resources
        .iter()
        .filter(|r| target.is_none_or(|t| t.matches(r)))
        .map(|r| {
            reconciler
                .plan(r.kind, &r.state)
                .with_context(|| format!("Cannot plan {}", r.id()))
        })
        .collect()
}

/// Display a list of diffs in a user-friendly format
pub fn display_diff(diffs: &[ResourceDiff], show_commands: bool) {
    let summary = DiffSummary::from_diffs(diffs);
    if !summary.has_changes() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Configuration Diff".bold()
    );
    println!("│");

    for (kind, kind_diffs) in group_by_kind(diffs) {
        let changed: Vec<_> = kind_diffs.into_iter().filter(|d| d.has_changes()).collect();
        if changed.is_empty() {
            continue;
        }
        println!("│ {}", ui::kind_title(kind).bold());

        for diff in changed {
            println!(
                "│   {} {:<30} {}",
                ui::action_symbol(diff.action),
                diff.identity,
                diff.action.to_string().dimmed()
            );

            for change in &diff.changes {
                println!(
                    "│       {} {} → {}",
                    format!("{}:", change.field).dimmed(),
                    change.from.to_string().red(),
                    change.to.to_string().green()
                );
            }

            if show_commands {
                for command in diff.plan.body() {
                    println!("│       {} {}", "›".cyan(), command);
                }
            }
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} changes ({} create, {} update, {} replace, {} delete)",
        summary.total().to_string().bold(),
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.replacements.to_string().magenta(),
        summary.removals.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}
