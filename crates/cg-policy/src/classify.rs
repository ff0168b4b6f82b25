//! Tiered risk classification of a single command invocation.

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::resolve::Resolver;
use crate::risk::RiskLevel;

/// Reason reported when a symlink chain cannot be fully resolved.
pub const DEPTH_EXCEEDED_REASON: &str = "symbolic link depth exceeds security limit";

/// Result of classifying one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub risk: RiskLevel,
    /// Space-joined pattern tokens, or the command name for depth violations.
    pub pattern: String,
    pub reason: String,
}

impl Verdict {
    /// No pattern matched.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_flagged(&self) -> bool {
        self.risk != RiskLevel::None
    }
}

/// Classify `name` with `args` against `catalog`.
///
/// An exceeded symlink depth pre-empts every pattern check. Otherwise the
/// high tier is scanned before the medium tier and the first match in
/// catalog order wins.
pub fn classify<A: AsRef<str>>(
    catalog: &Catalog,
    resolver: &Resolver<'_>,
    name: &str,
    args: &[A],
) -> Verdict {
    let variants = resolver.resolve(name);
    if variants.exceeded_depth() {
        return Verdict {
            risk: RiskLevel::High,
            pattern: name.to_string(),
            reason: DEPTH_EXCEEDED_REASON.to_string(),
        };
    }
    if name.is_empty() {
        return Verdict::none();
    }

    for tier in catalog.tiers() {
        if let Some(hit) = tier.iter().find(|p| p.matches_resolved(&variants, args)) {
            debug!(command = name, pattern = %hit.display(), risk = %hit.risk, "pattern matched");
            return Verdict {
                risk: hit.risk,
                pattern: hit.display(),
                reason: hit.reason.clone(),
            };
        }
    }

    Verdict::none()
}
