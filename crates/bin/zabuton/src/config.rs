//! app config file + command line overrides

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zabuton_core::NetType;

#[derive(Parser, Debug, Default)]
#[command(name = "zabuton")]
#[command(about = "desktop wallet with seed backup, staking and agenda voting")]
pub struct Args {
    /// config file (default: <config dir>/zabuton/config.toml)
    #[arg(long, env = "ZABUTON_CONFIG")]
    pub config: Option<PathBuf>,

    /// wallet data directory
    #[arg(long, env = "ZABUTON_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// use testnet3
    #[arg(long)]
    pub testnet: bool,

    /// populate empty data dirs with sample wallets and history
    #[arg(long)]
    pub demo: bool,

    /// tracing filter, RUST_LOG still wins
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub network: NetType,
    pub log_filter: String,
    pub log_buffer_lines: usize,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_base_dir().join("data"),
            network: NetType::Mainnet,
            log_filter: "zabuton=info,zabuton_core=info".into(),
            log_buffer_lines: 2000,
            window_size: [960.0, 700.0],
        }
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zabuton")
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zabuton")
        .join("config.toml")
}

impl AppConfig {
    /// missing file means defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(dir) = &args.data_dir {
            self.data_dir = dir.clone();
        }
        if args.testnet {
            self.network = NetType::Testnet3;
        }
        if let Some(filter) = &args.log_filter {
            self.log_filter = filter.clone();
        }
        self
    }

    /// resolve config from cli flags and the config file they point at
    pub fn from_args(args: &Args) -> Result<Self> {
        let path = args.config.clone().unwrap_or_else(default_config_path);
        Ok(Self::load(&path)?.apply_args(args))
    }
}
