//! Real vtysh backend.

use crate::backend::Backend;
use crate::error::{Error, Result};
use blockconf::CommandOutput;
use log::debug;
use std::path::Path;
use std::process::Command;

/// Backend that executes real `vtysh` commands.
pub struct VtyshBackend {
    /// Path to the vtysh executable
    vtysh_path: String,
}

impl VtyshBackend {
    /// Create a new VtyshBackend.
    ///
    /// Returns an error if vtysh is not installed.
    pub fn new() -> Result<Self> {
        let vtysh_path = find_vtysh(None)?;
        Ok(Self { vtysh_path })
    }

    /// Create a backend for an explicit executable.
    pub fn with_path(path: impl AsRef<Path>) -> Result<Self> {
        let vtysh_path = find_vtysh(Some(path.as_ref()))?;
        Ok(Self { vtysh_path })
    }

    /// Run vtysh with the given arguments and return output.
    fn run_vtysh(&self, args: &[String]) -> Result<std::process::Output> {
        debug!("{} {}", self.vtysh_path, args.join(" "));
        Ok(Command::new(&self.vtysh_path).args(args).output()?)
    }
}

impl Backend for VtyshBackend {
    fn is_available(&self) -> bool {
        self.run_vtysh(&["-c".to_string(), "show version".to_string()])
            .is_ok_and(|o| o.status.success())
    }

    fn show(&self, query: &str) -> Result<String> {
        let output = self.run_vtysh(&command_args(&[query.to_string()]))?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let text = format!("{}{}", stdout, stderr);
            return Err(Error::from_failed_output(format!("`{}` failed", query), &text));
        }
        if let Some(err) = Error::from_vtysh_output(&stdout) {
            return Err(err);
        }

        Ok(stdout)
    }

    fn run(&self, commands: &[String]) -> Result<CommandOutput> {
        let output = self.run_vtysh(&command_args(commands))?;
        let mut output = CommandOutput::from(output);
        if Error::from_vtysh_output(&output.combined()).is_some() {
            output.success = false;
        }
        Ok(output)
    }
}

/// Interleave `-c` before every command, which is how vtysh takes a batch.
pub fn command_args(commands: &[String]) -> Vec<String> {
    commands
        .iter()
        .flat_map(|cmd| ["-c".to_string(), cmd.clone()])
        .collect()
}

/// Find the vtysh executable path.
///
/// An explicit path must exist. Otherwise common install locations are
/// tried, then `which`.
pub fn find_vtysh(explicit: Option<&Path>) -> Result<String> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_string_lossy().to_string());
        }
        return Err(Error::VtyshNotFound);
    }

    // Check common locations
    let paths = [
        "/usr/bin/vtysh",       // distro packages
        "/usr/local/bin/vtysh", // source builds
        "/usr/sbin/vtysh",
    ];

    for path in &paths {
        if Path::new(path).exists() {
            return Ok(path.to_string());
        }
    }

    // Try which
    let output = Command::new("which")
        .arg("vtysh")
        .output()
        .map_err(|_| Error::VtyshNotFound)?;

    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Ok(path);
        }
    }

    Err(Error::VtyshNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args() {
        let args = command_args(&["configure terminal".to_string(), "router ospf".to_string()]);
        assert_eq!(args, ["-c", "configure terminal", "-c", "router ospf"]);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("vtysh");
        assert!(matches!(
            find_vtysh(Some(&missing)),
            Err(Error::VtyshNotFound)
        ));

        std::fs::write(&missing, "#!/bin/sh\n").unwrap();
        let found = find_vtysh(Some(&missing)).unwrap();
        assert!(found.ends_with("vtysh"));
    }

    #[test]
    fn test_spawn_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vtysh");
        std::fs::write(&path, "not a program").unwrap();

        let backend = VtyshBackend::with_path(&path).unwrap();
        let err = backend.show("show running-config").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!backend.is_available());
    }
}
