use std::path::PathBuf;

use thiserror::Error;

use crate::risk::RiskLevel;

/// Errors raised by the analysis engine and the risk gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// The symlink chain behind a command was still unresolved at the depth
    /// limit. Callers must treat this as "cannot determine, assume unsafe".
    #[error("symbolic link depth exceeded")]
    SymlinkDepthExceeded,
    #[error("invalid dangerous root pattern {pattern:?}: {reason}")]
    InvalidRootPattern { pattern: String, reason: &'static str },
    #[error("security violation for '{command}': {message}")]
    Violation {
        command: String,
        risk: RiskLevel,
        max: RiskLevel,
        message: String,
    },
}

/// Errors from loading a security configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown risk level: {0:?}")]
    UnknownRiskLevel(String),
}
