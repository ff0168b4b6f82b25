//! The risk-tiered dangerous-pattern catalog.
//!
//! Built once from the full pattern list and read-only afterwards. Only high
//! and medium entries are kept; every other level is dropped.

use tracing::debug;

use crate::pattern::DangerousPattern;
use crate::risk::RiskLevel;

/// Pre-partitioned patterns, high tier before medium tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    high: Vec<DangerousPattern>,
    medium: Vec<DangerousPattern>,
}

impl Catalog {
    /// Partition `patterns` into tiers, preserving configured order within
    /// each tier.
    pub fn from_patterns<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = DangerousPattern>,
    {
        let mut catalog = Catalog::default();
        for pattern in patterns {
            match pattern.risk {
                RiskLevel::High => catalog.high.push(pattern),
                RiskLevel::Medium => catalog.medium.push(pattern),
                other => {
                    debug!(pattern = %pattern.display(), risk = %other, "skipping pattern outside scanned tiers");
                }
            }
        }
        catalog
    }

    /// Catalog built from [`default_patterns`].
    pub fn builtin() -> Self {
        Self::from_patterns(default_patterns())
    }

    pub fn high(&self) -> &[DangerousPattern] {
        &self.high
    }

    pub fn medium(&self) -> &[DangerousPattern] {
        &self.medium
    }

    /// Tiers in scan order.
    pub fn tiers(&self) -> [&[DangerousPattern]; 2] {
        [&self.high, &self.medium]
    }

    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len()
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty()
    }
}

/// Built-in dangerous command patterns.
pub fn default_patterns() -> Vec<DangerousPattern> {
    use RiskLevel::{High, Medium};

    vec![
        // --- Filesystem destruction ---
        DangerousPattern::new(&["rm", "-rf"], High, "Recursive file removal"),
        DangerousPattern::new(&["sudo", "rm"], High, "Privileged file removal"),
        DangerousPattern::new(&["format"], High, "Disk formatting"),
        DangerousPattern::new(&["mkfs"], High, "File system creation"),
        DangerousPattern::new(&["fdisk"], High, "Disk partitioning"),
        // --- Data manipulation ---
        DangerousPattern::new(&["dd", "if="], High, "Low-level disk operations"),
        DangerousPattern::new(&["chmod", "777"], Medium, "Overly permissive file permissions"),
        DangerousPattern::new(&["chown", "root"], Medium, "Ownership change to root"),
        // --- Network ---
        DangerousPattern::new(&["wget"], Medium, "File download"),
        DangerousPattern::new(&["curl"], Medium, "Network request"),
        DangerousPattern::new(&["nc", "-"], Medium, "Network connection"),
        DangerousPattern::new(&["netcat"], Medium, "Network connection"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(name: &str, risk: RiskLevel) -> DangerousPattern {
        DangerousPattern::new(&[name], risk, name)
    }

    #[test]
    fn builtin_partitions_tiers() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.high().len(), 6);
        assert_eq!(catalog.medium().len(), 6);
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.high()[0].display(), "rm -rf");
        assert_eq!(catalog.medium()[0].display(), "chmod 777");
    }

    #[test]
    fn low_and_none_are_dropped() {
        let catalog = Catalog::from_patterns(vec![
            pattern("ls", RiskLevel::None),
            pattern("cat", RiskLevel::Low),
        ]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn critical_is_dropped() {
        let catalog = Catalog::from_patterns(vec![
            pattern("a", RiskLevel::High),
            pattern("b", RiskLevel::Critical),
            pattern("c", RiskLevel::Medium),
        ]);
        let high: Vec<_> = catalog.high().iter().map(|p| p.display()).collect();
        assert_eq!(high, vec!["a"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn order_within_tier_is_preserved() {
        let catalog = Catalog::from_patterns(vec![
            pattern("m1", RiskLevel::Medium),
            pattern("h1", RiskLevel::High),
            pattern("m2", RiskLevel::Medium),
            pattern("h2", RiskLevel::High),
        ]);
        let [high, medium] = catalog.tiers();
        assert_eq!(high[0].display(), "h1");
        assert_eq!(high[1].display(), "h2");
        assert_eq!(medium[0].display(), "m1");
        assert_eq!(medium[1].display(), "m2");
    }

    #[test]
    fn empty_token_pattern_is_kept_but_inert() {
        let catalog = Catalog::from_patterns(vec![DangerousPattern::new(
            &[],
            RiskLevel::High,
            "malformed",
        )]);
        assert_eq!(catalog.high().len(), 1);
        assert_eq!(catalog.high()[0].command(), None);
    }
}
