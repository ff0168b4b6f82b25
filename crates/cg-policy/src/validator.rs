//! Configuration-driven entry points of the analysis engine.
//!
//! A [`Validator`] is built once from a [`SecurityConfig`] and then shared
//! read-only across callers. It owns the tiered [`Catalog`] and the link
//! source used for name resolution.

use std::collections::HashSet;
use std::fmt;

use crate::catalog::Catalog;
use crate::classify::{classify, Verdict};
use crate::config::SecurityConfig;
use crate::detect::{is_network_operation, is_privilege_escalation, NetworkAssessment};
use crate::error::SecurityError;
use crate::resolve::{base_name, LinkSource, OsLinks, Resolver};

/// Characters that turn a root pattern into a glob or regex. `.` is allowed
/// since it appears in real command names (`update-rc.d`).
const PATTERN_META_CHARS: &[char] = &['*', '?', '[', ']', '{', '}', '(', ')', '^', '$', '|', '+'];

pub struct Validator {
    config: SecurityConfig,
    catalog: Catalog,
    links: Box<dyn LinkSource + Send + Sync>,
    privileged: HashSet<String>,
    shells: HashSet<String>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Build a validator that inspects the real filesystem.
    pub fn new(config: SecurityConfig) -> Result<Self, SecurityError> {
        Self::with_link_source(config, OsLinks)
    }

    /// Build a validator over a custom [`LinkSource`].
    pub fn with_link_source<L>(config: SecurityConfig, links: L) -> Result<Self, SecurityError>
    where
        L: LinkSource + Send + Sync + 'static,
    {
        validate_root_patterns(&config.dangerous_root_patterns)?;

        Ok(Self {
            catalog: config.catalog(),
            privileged: config.dangerous_privileged_commands.iter().cloned().collect(),
            shells: config.shell_commands.iter().cloned().collect(),
            links: Box::new(links),
            config,
        })
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&*self.links, self.config.max_symlink_depth)
    }

    /// Classify `name` with `args` against the tiered catalog.
    pub fn analyze_command_security<A: AsRef<str>>(&self, name: &str, args: &[A]) -> Verdict {
        classify(&self.catalog, &self.resolver(), name, args)
    }

    pub fn is_privilege_escalation_command(&self, name: &str) -> Result<bool, SecurityError> {
        is_privilege_escalation(&self.resolver(), name)
    }

    pub fn is_network_operation<A: AsRef<str>>(&self, name: &str, args: &[A]) -> NetworkAssessment {
        is_network_operation(&self.resolver(), name, args)
    }

    /// Exact membership in the configured privileged-command list. No
    /// symlink resolution.
    pub fn is_dangerous_privileged_command(&self, path: &str) -> bool {
        self.privileged.contains(path)
    }

    pub fn is_shell_command(&self, path: &str) -> bool {
        self.shells.contains(path)
    }

    /// Whether any argument contains a configured shell metacharacter.
    pub fn has_shell_metacharacters<A: AsRef<str>>(&self, args: &[A]) -> bool {
        args.iter().any(|arg| {
            let arg = arg.as_ref();
            self.config
                .shell_metacharacters
                .iter()
                .any(|meta| arg.contains(meta.as_str()))
        })
    }

    /// Whether the lowercase base name of `path` contains any configured
    /// dangerous root pattern.
    ///
    /// This is a substring test, unlike the exact name matching of the
    /// pattern catalog: `/bin/lsrm` matches `rm`.
    pub fn is_dangerous_root_command(&self, path: &str) -> bool {
        let base = base_name(path).to_lowercase();
        self.config
            .dangerous_root_patterns
            .iter()
            .any(|pattern| base.contains(pattern.as_str()))
    }

    /// Indices of arguments containing a dangerous root argument fragment.
    pub fn dangerous_root_args<A: AsRef<str>>(&self, args: &[A]) -> Vec<usize> {
        indices_where(args, |arg| {
            let lower = arg.to_lowercase();
            self.config
                .dangerous_root_arg_patterns
                .iter()
                .any(|pattern| lower.contains(pattern.as_str()))
        })
    }

    /// Indices of arguments containing `*` or `?`.
    pub fn wildcard_args<A: AsRef<str>>(&self, args: &[A]) -> Vec<usize> {
        indices_where(args, |arg| arg.contains('*') || arg.contains('?'))
    }

    /// Indices of arguments equal to, or beneath, a system-critical path.
    pub fn system_critical_path_args<A: AsRef<str>>(&self, args: &[A]) -> Vec<usize> {
        indices_where(args, |arg| {
            self.config
                .system_critical_paths
                .iter()
                .any(|critical| is_same_or_beneath(arg, critical))
        })
    }
}

fn indices_where<A, F>(args: &[A], pred: F) -> Vec<usize>
where
    A: AsRef<str>,
    F: Fn(&str) -> bool,
{
    args.iter()
        .enumerate()
        .filter(|(_, arg)| pred(arg.as_ref()))
        .map(|(i, _)| i)
        .collect()
}

fn is_same_or_beneath(arg: &str, critical: &str) -> bool {
    match arg.strip_prefix(critical) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn validate_root_patterns(patterns: &[String]) -> Result<(), SecurityError> {
    for pattern in patterns {
        let reason = if pattern.is_empty() {
            Some("empty pattern")
        } else if pattern.contains('/') || pattern.contains('\\') {
            Some("contains a path separator, use the command name only")
        } else if pattern.contains(PATTERN_META_CHARS) {
            Some("contains wildcard or regex characters")
        } else if pattern.chars().any(char::is_uppercase) {
            Some("contains uppercase, patterns are matched against lowercase names")
        } else if pattern.chars().any(char::is_control) {
            Some("contains control characters")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(SecurityError::InvalidRootPattern {
                pattern: pattern.clone(),
                reason,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::tests::FakeLinks;
    use crate::risk::RiskLevel;

    const NO_ARGS: &[&str] = &[];

    fn validator() -> Validator {
        Validator::with_link_source(SecurityConfig::default(), FakeLinks::default()).unwrap()
    }

    #[test]
    fn analyze_uses_catalog() {
        let v = validator();
        let verdict = v.analyze_command_security("/bin/rm", &["-rf", "/data"]);
        assert_eq!(verdict.risk, RiskLevel::High);
        assert_eq!(verdict.pattern, "rm -rf");
        assert_eq!(verdict.reason, "Recursive file removal");
    }

    #[test]
    fn configured_depth_limit_applies() {
        let config = SecurityConfig {
            max_symlink_depth: 2,
            ..Default::default()
        };
        let v = Validator::with_link_source(config, FakeLinks::chain(3, "/bin/ls")).unwrap();
        let verdict = v.analyze_command_security("/chain/l0", NO_ARGS);
        assert_eq!(verdict.risk, RiskLevel::High);
        assert_eq!(
            v.is_privilege_escalation_command("/chain/l0"),
            Err(SecurityError::SymlinkDepthExceeded)
        );
        assert!(v.is_network_operation("/chain/l0", NO_ARGS).inconclusive_high_risk);
    }

    #[test]
    fn dangerous_privileged_command_is_exact() {
        let v = validator();
        assert!(v.is_dangerous_privileged_command("/usr/bin/sudo"));
        assert!(v.is_dangerous_privileged_command("/bin/rm"));
        assert!(!v.is_dangerous_privileged_command("sudo"));
        assert!(!v.is_dangerous_privileged_command("/usr/local/bin/rm"));
    }

    #[test]
    fn shell_commands() {
        let v = validator();
        assert!(v.is_shell_command("/bin/bash"));
        assert!(v.is_shell_command("/usr/bin/fish"));
        assert!(!v.is_shell_command("bash"));
        assert!(!v.is_shell_command("/bin/ls"));
    }

    #[test]
    fn shell_metacharacters() {
        let v = validator();
        assert!(v.has_shell_metacharacters(&["a; rm -rf /"]));
        assert!(v.has_shell_metacharacters(&["safe", "$(whoami)"]));
        assert!(v.has_shell_metacharacters(&["~/file"]));
        assert!(!v.has_shell_metacharacters(&["-la", "/tmp/file.txt"]));
        assert!(!v.has_shell_metacharacters(NO_ARGS));
    }

    #[test]
    fn dangerous_root_command_uses_substring() {
        let v = validator();
        assert!(v.is_dangerous_root_command("/bin/rm"));
        assert!(v.is_dangerous_root_command("/sbin/MKFS.ext4"));
        assert!(v.is_dangerous_root_command("/bin/lsrm"));
        assert!(!v.is_dangerous_root_command("/bin/ls"));
        assert!(!v.is_dangerous_root_command("/usr/bin/cat"));
    }

    #[test]
    fn dangerous_root_args() {
        let v = validator();
        assert_eq!(v.dangerous_root_args(&["-rf", "/tmp", "--FORCE"]), vec![0, 2]);
        assert!(v.dangerous_root_args(&["-l", "file"]).is_empty());
    }

    #[test]
    fn wildcard_args() {
        let v = validator();
        assert_eq!(v.wildcard_args(&["*.log", "file", "a?c"]), vec![0, 2]);
        assert!(v.wildcard_args(&["plain"]).is_empty());
    }

    #[test]
    fn system_critical_paths() {
        let v = validator();
        assert_eq!(
            v.system_critical_path_args(&["/etc", "/etc/passwd", "./etc"]),
            vec![0, 1]
        );
        assert!(v
            .system_critical_path_args(&[
                "/home/user/file.txt",
                "/tmp/test.txt",
                "/etc-backup/file.txt",
                "/etcetera",
                "relative",
            ])
            .is_empty());
        assert_eq!(v.system_critical_path_args(&["/", "/usr/bin/ls"]), vec![0, 1]);
    }

    #[test]
    fn critical_path_matching_without_root() {
        let config = SecurityConfig {
            system_critical_paths: vec!["/etc".to_string(), "/var/log".to_string()],
            ..Default::default()
        };
        let v = Validator::with_link_source(config, FakeLinks::default()).unwrap();
        assert_eq!(
            v.system_critical_path_args(&["/home/user", "/var/log/syslog", "/var/logs"]),
            vec![1]
        );
    }

    #[test]
    fn rejects_invalid_root_patterns() {
        for bad in ["", "/bin/rm", "rm*", "R", ".*rm", "a\\b"] {
            let config = SecurityConfig {
                dangerous_root_patterns: vec![bad.to_string()],
                ..Default::default()
            };
            let result = Validator::with_link_source(config, FakeLinks::default());
            assert!(
                matches!(result, Err(SecurityError::InvalidRootPattern { .. })),
                "pattern {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_dotted_root_pattern() {
        let config = SecurityConfig {
            dangerous_root_patterns: vec!["update-rc.d".to_string()],
            ..Default::default()
        };
        assert!(Validator::with_link_source(config, FakeLinks::default()).is_ok());
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }
}
