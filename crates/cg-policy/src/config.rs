use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::pattern::DangerousPattern;
use crate::resolve::MAX_SYMLINK_DEPTH;

/// Validator-level security configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum number of paths inspected while resolving a symlink chain.
    pub max_symlink_depth: usize,
    /// Absolute paths that are dangerous to run with privileges. Exact match.
    pub dangerous_privileged_commands: Vec<String>,
    /// Absolute paths of shell executables. Exact match.
    pub shell_commands: Vec<String>,
    /// Substrings that mark an argument as carrying shell syntax.
    pub shell_metacharacters: Vec<String>,
    /// Lowercase command-name fragments that are destructive as root.
    /// Matched as substrings of the lowercase base name.
    pub dangerous_root_patterns: Vec<String>,
    /// Lowercase argument fragments that are destructive as root.
    pub dangerous_root_arg_patterns: Vec<String>,
    /// Paths that require extra caution when passed as arguments.
    pub system_critical_paths: Vec<String>,
    /// Dangerous command patterns. The built-in catalog is used when unset.
    pub patterns: Option<Vec<DangerousPattern>>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_symlink_depth: MAX_SYMLINK_DEPTH,
            dangerous_privileged_commands: strings(&[
                // Shells
                "/bin/sh",
                "/bin/bash",
                "/usr/bin/sh",
                "/usr/bin/bash",
                "/bin/zsh",
                "/usr/bin/zsh",
                "/bin/csh",
                "/usr/bin/csh",
                // Privilege escalation
                "/bin/su",
                "/usr/bin/su",
                "/usr/bin/sudo",
                "/usr/bin/doas",
                // System administration
                "/sbin/init",
                "/usr/sbin/init",
                "/bin/rm",
                "/usr/bin/rm",
                "/bin/dd",
                "/usr/bin/dd",
                "/bin/mount",
                "/usr/bin/mount",
                "/bin/umount",
                "/usr/bin/umount",
                // Package management
                "/usr/bin/apt",
                "/usr/bin/apt-get",
                "/usr/bin/yum",
                "/usr/bin/dnf",
                "/usr/bin/rpm",
                // Service management
                "/bin/systemctl",
                "/usr/bin/systemctl",
                "/sbin/service",
                "/usr/sbin/service",
            ]),
            shell_commands: strings(&[
                "/bin/sh",
                "/bin/bash",
                "/usr/bin/sh",
                "/usr/bin/bash",
                "/bin/zsh",
                "/usr/bin/zsh",
                "/bin/csh",
                "/usr/bin/csh",
                "/bin/fish",
                "/usr/bin/fish",
                "/bin/dash",
                "/usr/bin/dash",
            ]),
            shell_metacharacters: strings(&[
                ";", "&", "|", "&&", "||", "$", "`", "$(", "${", ">", "<", ">>", "<<", "*", "?",
                "[", "]", "~", "!",
            ]),
            dangerous_root_patterns: strings(&[
                "rm", "rmdir", "del", "delete", "format", "mkfs", "dd", "chmod", "chown", "chgrp",
                "mount", "umount", "fdisk", "parted", "gdisk",
            ]),
            dangerous_root_arg_patterns: strings(&["rf", "force", "recursive", "all"]),
            system_critical_paths: strings(&[
                "/", "/bin", "/sbin", "/usr", "/usr/bin", "/usr/sbin", "/etc", "/var", "/var/log",
                "/boot", "/sys", "/proc", "/dev", "/lib", "/lib64", "/root",
            ]),
            patterns: None,
        }
    }
}

impl SecurityConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build the tiered catalog from the configured or built-in patterns.
    pub fn catalog(&self) -> Catalog {
        match &self.patterns {
            Some(patterns) => Catalog::from_patterns(patterns.iter().cloned()),
            None => Catalog::builtin(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;

    #[test]
    fn default_config() {
        let cfg = SecurityConfig::default();
        assert_eq!(cfg.max_symlink_depth, 40);
        assert!(cfg.shell_commands.contains(&"/bin/bash".to_string()));
        assert!(cfg
            .dangerous_privileged_commands
            .contains(&"/usr/bin/sudo".to_string()));
        assert!(cfg.patterns.is_none());
        assert_eq!(cfg.catalog(), Catalog::builtin());
    }

    #[test]
    fn parse_empty_toml() {
        let cfg = SecurityConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SecurityConfig::default());
    }

    #[test]
    fn parse_overrides() {
        let toml_str = r#"
max_symlink_depth = 8
shell_commands = ["/bin/sh"]
shell_metacharacters = [";"]
"#;
        let cfg = SecurityConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(cfg.max_symlink_depth, 8);
        assert_eq!(cfg.shell_commands, vec!["/bin/sh"]);
        assert_eq!(cfg.shell_metacharacters, vec![";"]);
        // untouched fields keep defaults
        assert!(!cfg.dangerous_root_patterns.is_empty());
    }

    #[test]
    fn parse_patterns() {
        let toml_str = r#"
[[patterns]]
tokens = ["shred", "-u"]
risk = "critical"
reason = "Irrecoverable deletion"

[[patterns]]
tokens = ["chmod", "777"]
risk = "medium"
reason = "Overly permissive file permissions"

[[patterns]]
tokens = ["ls"]
risk = "low"
reason = "Listing"
"#;
        let cfg = SecurityConfig::from_toml_str(toml_str).unwrap();
        let patterns = cfg.patterns.as_ref().unwrap();
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0].risk, RiskLevel::Critical);
        assert_eq!(patterns[0].tokens, vec!["shred", "-u"]);

        // only high and medium entries are scanned
        let catalog = cfg.catalog();
        assert!(catalog.high().is_empty());
        assert_eq!(catalog.medium().len(), 1);
    }

    #[test]
    fn empty_pattern_list_disables_catalog() {
        let cfg = SecurityConfig::from_toml_str("patterns = []").unwrap();
        assert!(cfg.catalog().is_empty());
    }

    #[test]
    fn parse_rejects_unknown_risk() {
        let toml_str = r#"
[[patterns]]
tokens = ["x"]
risk = "severe"
reason = "x"
"#;
        assert!(matches!(
            SecurityConfig::from_toml_str(toml_str),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SecurityConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("security.toml");
        std::fs::write(&path, "max_symlink_depth = 12\n").unwrap();
        let cfg = SecurityConfig::load(&path).unwrap();
        assert_eq!(cfg.max_symlink_depth, 12);
    }
}
