use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::ClientConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Directory holding config.toml and state.json:
/// `$ARBOR_CONFIG_DIR`, else `$XDG_CONFIG_HOME/arbor`, else `~/.config/arbor`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ARBOR_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("arbor");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    Path::new(&home).join(".config").join("arbor")
}

/// Read the client config. A missing file is not an error: every field has
/// a workable default and first-run users have no config yet.
pub fn read_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_dir().join("config.toml"),
    };
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = read_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.server.url, "http://localhost:7171");
        assert_eq!(config.tuning.move_coalesce_ms, 400);
    }

    #[test]
    fn partial_config_keeps_defaults_elsewhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[server]\nurl = \"https://outlines.example\"\ntoken = \"t0k\"\n\n[tuning]\nmove_coalesce_ms = 250\n",
        )
        .unwrap();

        let config = read_config(Some(&path)).unwrap();
        assert_eq!(config.server.url, "https://outlines.example");
        assert_eq!(config.server.token.as_deref(), Some("t0k"));
        assert_eq!(config.tuning.move_coalesce_ms, 250);
        assert_eq!(config.tuning.tag_save_debounce_ms, 600);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = nonsense").unwrap();
        assert!(read_config(Some(&path)).is_err());
    }
}
