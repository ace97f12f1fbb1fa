use std::path::PathBuf;

use clap::Parser;

/// Keyboard-driven terminal client for collaborative outlines.
#[derive(Debug, Parser)]
#[command(name = "arb", version, about)]
pub struct Cli {
    /// Outline to open (defaults to server.default_outline from config)
    pub outline: Option<String>,

    /// Outline server base URL (overrides config)
    #[arg(long)]
    pub server: Option<String>,

    /// Bearer token (overrides config)
    #[arg(long)]
    pub token: Option<String>,

    /// Path to config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}
