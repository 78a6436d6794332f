// fprobe/src/config.rs

//! Layered configuration: built-in defaults, then `fprobe.toml`, then
//! `FPROBE_*` environment variables.

use crate::constants::{
    DEFAULT_CONFIG_NAME, DEFAULT_GDB_SETTINGS, DEFAULT_SOURCE_PAD, DEFAULT_TEMP_VAR_NAME,
    DEFAULT_TIMEOUT_MS, ENV_PREFIX,
};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use gdbmirs::ControllerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// gdb executable
    pub gdb_path: PathBuf,
    /// Arguments that put gdb in MI mode
    pub gdb_args: Vec<String>,
    /// Per-command reply deadline
    pub timeout_ms: u64,
    /// Variable object name used for type queries
    pub temp_var_name: String,
    /// `-gdb-set` settings applied at session start
    pub settings: Vec<String>,
    /// Lines of context around the current line
    pub source_pad: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let controller = ControllerOptions::default();
        Self {
            gdb_path: controller.gdb_path,
            gdb_args: controller.args,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            temp_var_name: DEFAULT_TEMP_VAR_NAME.to_string(),
            settings: DEFAULT_GDB_SETTINGS.iter().map(|s| s.to_string()).collect(),
            source_pad: DEFAULT_SOURCE_PAD,
        }
    }
}

impl ProbeConfig {
    /// The provider stack. Without an explicit path, `fprobe.toml` in the
    /// working directory is used if present.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME));
        Figment::from(Serialized::defaults(ProbeConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let config: ProbeConfig = Self::figment(path).extract()?;
        log::debug!("configuration: {:?}", config);
        Ok(config)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            gdb_path: self.gdb_path.clone(),
            args: self.gdb_args.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}
