use std::path::{Path, PathBuf};

use cg_policy::{ConfigError, RiskGate, RiskLevel, SecurityConfig};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub security: SecurityConfig,
    pub audit: AuditConfig,
    pub gate: GateConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable audit logging.
    pub enabled: bool,
    /// Custom audit log path. Defaults to ~/.local/share/cmdguard/audit.jsonl.
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl AuditConfig {
    /// Resolve the audit log path, using the configured path or the XDG default.
    pub fn resolve_path(&self) -> PathBuf {
        if let Some(ref custom) = self.path {
            return PathBuf::from(custom);
        }

        let base = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".local").join("share")
            });
        base.join("cmdguard").join("audit.jsonl")
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Highest risk level that is allowed to run.
    pub max_risk_level: RiskLevel,
    /// Allow privilege-escalation commands.
    pub privileged: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_risk_level: RiskLevel::Low,
            privileged: false,
        }
    }
}

impl GateConfig {
    pub fn risk_gate(&self) -> RiskGate {
        RiskGate::new(self.max_risk_level, self.privileged)
    }
}

impl Config {
    /// Load from the default location. A missing file yields defaults, a
    /// malformed one yields defaults with a warning.
    pub fn load_or_default() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("[cg:config] warning: failed to parse {}: {e}", path.display());
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    /// Load from an explicit path. Any failure is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cmdguard").join("config.toml")
}
