//! Execution engine - vtysync executor with UI integration

use anyhow::Result;
use blockconf::{
    ApplyResult, AutoConfirm, ConfirmCallback, Console, ExecuteSummary, ProgressCallback,
    ResourceDiff,
};
use colored::Colorize;

use super::differ::display_diff;
use crate::ui;

/// Options for execution (adds `yes` for confirmation skip)
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't send commands, just show what would happen
    pub dry_run: bool,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Verbose output
    pub verbose: bool,
}

impl From<&ExecuteOptions> for blockconf::ExecuteOptions {
    fn from(opts: &ExecuteOptions) -> Self {
        Self {
            dry_run: opts.dry_run,
            verbose: opts.verbose,
        }
    }
}

/// Prints one line per applied resource.
struct LineProgress {
    verbose: bool,
}

impl ProgressCallback for LineProgress {
    fn on_batch_start(&mut self, count: usize) {
        println!();
        println!("  {} Applying {} resources...", "→".cyan(), count);
    }

    fn on_resource_start(&mut self, _id: &str, description: &str) {
        if self.verbose {
            ui::dim(description);
        }
    }

    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
        let symbol = match result {
            ApplyResult::NoChange => "○".dimmed(),
            ApplyResult::Created | ApplyResult::Modified | ApplyResult::Removed => "✓".green(),
            ApplyResult::Failed { .. } => "✗".red(),
        };
        println!("    {} {}", symbol, id);

        if let ApplyResult::Failed { error, .. } = result {
            println!("      {}", error.dimmed());
        }
    }

    fn on_batch_complete(&mut self) {}
}

/// Asks on the terminal.
struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> blockconf::Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(|e| blockconf::Error::Prompt(e.to_string()))
    }
}

/// Show the plan, confirm, and apply it
pub fn execute<C: Console + ?Sized>(
    console: &C,
    diffs: &[ResourceDiff],
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    display_diff(diffs, true);

    let mut progress = LineProgress {
        verbose: opts.verbose,
    };
    let summary = if opts.yes {
        blockconf::execute(console, diffs, opts.into(), &mut progress, &mut AutoConfirm)?
    } else {
        blockconf::execute(console, diffs, opts.into(), &mut progress, &mut PromptConfirm)?
    };

    if summary.total_changes() == 0 && summary.failed == 0 {
        if opts.dry_run && summary.skipped > 0 {
            println!();
            println!("  {} Dry run - no changes made", "ℹ".blue());
        } else if summary.skipped > 0 {
            println!();
            println!("  {} Aborted", "✗".red());
        }
        return Ok(summary);
    }

    print_summary(&summary);
    Ok(summary)
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!(
            "  {} Configuration applied successfully!",
            "✓".green().bold()
        );
    } else {
        println!(
            "  {} Configuration applied with errors",
            "⚠".yellow().bold()
        );
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} resources modified", summary.modified);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}
