use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Durable per-device client state (written to state.json). Survives
/// restarts; everything session-scoped lives in `tui::app::SessionState`
/// instead and dies with the process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeviceState {
    /// Theme name ("dark" is the built-in default).
    #[serde(default)]
    pub theme: Option<String>,
    /// Per-resource view state, keyed by resource id.
    #[serde(default)]
    pub outlines: HashMap<String, OutlineDeviceState>,
}

/// Per-outline durable state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutlineDeviceState {
    /// Ids of collapsed (not expanded) items.
    #[serde(default)]
    pub collapsed: HashSet<String>,
}

/// Read state.json from the config directory.
pub fn read_device_state(dir: &Path) -> Option<DeviceState> {
    let path = dir.join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json atomically (temp file + rename) so a crash mid-write
/// never leaves a truncated store behind.
pub fn write_device_state(dir: &Path, state: &DeviceState) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    let content = serde_json::to_string_pretty(state)?;
    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    fs::write(tmp.path(), content)?;
    tmp.persist(dir.join("state.json")).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = DeviceState {
            theme: Some("dark".into()),
            ..Default::default()
        };
        let mut outline = OutlineDeviceState::default();
        outline.collapsed.insert("item-3".into());
        state.outlines.insert("out-1".into(), outline);

        write_device_state(dir.path(), &state).unwrap();
        let loaded = read_device_state(dir.path()).unwrap();

        assert_eq!(loaded.theme.as_deref(), Some("dark"));
        assert!(loaded.outlines.get("out-1").unwrap().collapsed.contains("item-3"));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_device_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("state.json"), "{not json").unwrap();
        assert!(read_device_state(dir.path()).is_none());
    }
}
