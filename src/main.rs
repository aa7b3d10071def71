mod cli;
mod commands;
mod engine;
mod paths;
mod schema;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use quaggakit::Client;
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub vtysh: Option<PathBuf>,
    pub config: Option<String>,
}

impl Context {
    /// Connect to vtysh, honoring `--vtysh`.
    pub fn client(&self) -> Result<Client> {
        match &self.vtysh {
            Some(path) => Client::with_vtysh(path)
                .map_err(|e| vtysh_error(e, &format!("vtysh not found at {}", path.display()))),
            None => Client::new().map_err(|e| vtysh_error(e, "vtysh not found")),
        }
    }

    /// Desired-state file, honoring `--config`.
    pub fn desired_path(&self) -> Result<PathBuf> {
        paths::resolve_desired(self.config.as_deref())
    }
}

/// Wrap a vtysh error with what was attempted and how to fix it.
pub fn vtysh_error(err: quaggakit::Error, what: &str) -> anyhow::Error {
    let advice = err.category().advice();
    anyhow::Error::new(err).context(format!("{what}. {advice}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        vtysh: cli.vtysh,
        config: cli.config,
    };

    match cli.command {
        Command::Show(args) => commands::show::run(&ctx, args.kind.as_deref(), args.json),
        Command::Diff(args) => commands::reconcile::diff(&ctx, args.target.as_deref(), args.json),
        Command::Apply(args) => {
            commands::reconcile::apply(&ctx, args.target.as_deref(), args.dry_run, args.yes)
        }
        Command::Check => commands::check::run(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "vtysync", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vtysh_error_carries_advice() {
        let err = vtysh_error(quaggakit::Error::VtyshNotFound, "vtysh not found");
        let text = format!("{err:#}");
        assert!(text.starts_with("vtysh not found. Install quagga or frr, or pass --vtysh <path>"));
        assert!(text.ends_with("vtysh not found. Install quagga or frr"));
    }

    #[test]
    fn test_missing_explicit_vtysh() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            verbose: 0,
            quiet: true,
            vtysh: Some(dir.path().join("vtysh")),
            config: None,
        };
        let err = ctx.client().err().unwrap();
        assert!(err.to_string().contains("pass --vtysh"));
        assert!(err.downcast_ref::<quaggakit::Error>().is_some());
    }
}
