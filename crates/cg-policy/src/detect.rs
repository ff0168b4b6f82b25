//! Privilege-escalation and network-operation detectors.
//!
//! Both resolve the command through the symlink chain and test the variants
//! against small fixed command sets. Neither is part of the tiered pattern
//! scan; callers invoke them as separate checks.

use serde::Serialize;

use crate::error::SecurityError;
use crate::resolve::Resolver;

pub const PRIVILEGE_ESCALATION_COMMANDS: &[&str] = &["sudo", "su", "doas"];

/// Commands that are network tools regardless of arguments.
pub const ALWAYS_NETWORK_COMMANDS: &[&str] =
    &["curl", "wget", "nc", "netcat", "telnet", "ssh", "scp"];

/// Commands that touch the network only when given a remote endpoint.
pub const CONDITIONAL_NETWORK_COMMANDS: &[&str] = &["rsync", "git"];

/// Whether `name` resolves to `sudo`, `su`, or `doas`.
///
/// A symlink chain deeper than the resolver's limit yields
/// [`SecurityError::SymlinkDepthExceeded`]; that is "cannot determine", never
/// "confirmed safe".
pub fn is_privilege_escalation(
    resolver: &Resolver<'_>,
    name: &str,
) -> Result<bool, SecurityError> {
    let variants = resolver.resolve(name);
    if variants.exceeded_depth() {
        return Err(SecurityError::SymlinkDepthExceeded);
    }
    Ok(variants.contains_any(PRIVILEGE_ESCALATION_COMMANDS))
}

/// Outcome of the network-operation check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkAssessment {
    pub is_network: bool,
    /// Set when the symlink chain could not be resolved; treat as high risk.
    pub inconclusive_high_risk: bool,
}

impl NetworkAssessment {
    fn network(is_network: bool) -> Self {
        Self {
            is_network,
            inconclusive_high_risk: false,
        }
    }

    fn inconclusive() -> Self {
        Self {
            is_network: false,
            inconclusive_high_risk: true,
        }
    }
}

/// Whether `name` with `args` performs a network operation.
pub fn is_network_operation<A: AsRef<str>>(
    resolver: &Resolver<'_>,
    name: &str,
    args: &[A],
) -> NetworkAssessment {
    let variants = resolver.resolve(name);
    if variants.exceeded_depth() {
        return NetworkAssessment::inconclusive();
    }

    if variants.contains_any(ALWAYS_NETWORK_COMMANDS) {
        return NetworkAssessment::network(true);
    }

    let joined = join_args(args);
    if variants.contains_any(CONDITIONAL_NETWORK_COMMANDS) {
        return NetworkAssessment::network(joined.contains("://") || joined.contains('@'));
    }

    // Any command handed a URL
    NetworkAssessment::network(joined.contains("://"))
}

fn join_args<A: AsRef<str>>(args: &[A]) -> String {
    args.iter().map(|a| a.as_ref()).collect::<Vec<&str>>().join(" ")
}
