//! Path resolution for vtysync
//!
//! # Environment Variables
//!
//! - `VTYSYNC_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `VTYSYNC_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/vtysync` (if set)
//! 3. `~/.config/vtysync`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "VTYSYNC_CONFIG_DIR";

/// File name of the desired-state document inside the config directory
pub const DESIRED_FILE: &str = "desired.toml";

/// Get the vtysync config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("vtysync");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("vtysync");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Default location of the desired-state file
pub fn desired_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(DESIRED_FILE))
}

/// Resolve the desired-state file, preferring an explicit `--config` value.
pub fn resolve_desired(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(path)),
        None => desired_file(),
    }
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_with_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~/router/desired.toml"), home.join("router/desired.toml"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/etc/vtysync.toml"), PathBuf::from("/etc/vtysync.toml"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let path = expand("$VTYSYNC_SURELY_UNSET_VAR/desired.toml");
        assert_eq!(path, PathBuf::from("$VTYSYNC_SURELY_UNSET_VAR/desired.toml"));
    }

    #[test]
    fn test_explicit_config_wins() {
        let path = resolve_desired(Some("/srv/r1.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/srv/r1.toml"));
    }
}
