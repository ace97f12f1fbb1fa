use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub tuning: TuningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
    /// Outline opened when none is given on the command line.
    #[serde(default)]
    pub default_outline: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            url: "http://localhost:7171".into(),
            token: None,
            default_outline: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}

/// UX timing knobs. These are tuning values, not protocol contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Window over which rapid reorder keystrokes coalesce into one request.
    #[serde(default = "default_move_coalesce_ms")]
    pub move_coalesce_ms: u64,
    /// Window over which rapid tag toggles coalesce into one save.
    #[serde(default = "default_tag_save_debounce_ms")]
    pub tag_save_debounce_ms: u64,
    /// How long a transient status-line message stays visible.
    #[serde(default = "default_status_message_ttl_ms")]
    pub status_message_ttl_ms: u64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            move_coalesce_ms: default_move_coalesce_ms(),
            tag_save_debounce_ms: default_tag_save_debounce_ms(),
            status_message_ttl_ms: default_status_message_ttl_ms(),
        }
    }
}

fn default_move_coalesce_ms() -> u64 {
    400
}

fn default_tag_save_debounce_ms() -> u64 {
    600
}

fn default_status_message_ttl_ms() -> u64 {
    4000
}

impl TuningConfig {
    pub fn move_coalesce_window(&self) -> Duration {
        Duration::from_millis(self.move_coalesce_ms)
    }

    pub fn tag_save_debounce(&self) -> Duration {
        Duration::from_millis(self.tag_save_debounce_ms)
    }

    pub fn status_message_ttl(&self) -> Duration {
        Duration::from_millis(self.status_message_ttl_ms)
    }
}
