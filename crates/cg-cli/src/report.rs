//! Run every check on one invocation and render the result.

use std::fmt::Write as _;

use cg_policy::{NetworkAssessment, RiskGate, SecurityError, Validator, Verdict};
use serde::Serialize;

/// Outcome of the risk gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    Allowed,
    Blocked { message: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::Blocked { .. } => "blocked",
        }
    }
}

/// Everything the validator knows about one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub command: String,
    pub args: Vec<String>,
    pub verdict: Verdict,
    /// `None` when the symlink chain could not be resolved.
    pub privilege_escalation: Option<bool>,
    pub network: NetworkAssessment,
    pub privileged_command: bool,
    pub shell_command: bool,
    pub shell_metacharacters: bool,
    pub dangerous_root_command: bool,
    pub dangerous_root_args: Vec<usize>,
    pub wildcard_args: Vec<usize>,
    pub critical_path_args: Vec<usize>,
    #[serde(flatten)]
    pub decision: Decision,
}

impl Assessment {
    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

pub fn assess(validator: &Validator, gate: &RiskGate, command: &str, args: &[String]) -> Assessment {
    let verdict = validator.analyze_command_security(command, args);
    let privilege_escalation = match validator.is_privilege_escalation_command(command) {
        Ok(escalates) => Some(escalates),
        Err(SecurityError::SymlinkDepthExceeded) => None,
        Err(e) => {
            tracing::warn!(command, error = %e, "unexpected escalation check failure");
            None
        }
    };

    let decision = match gate.evaluate(command, &verdict, privilege_escalation) {
        Ok(()) => Decision::Allowed,
        Err(e) => Decision::Blocked {
            message: e.to_string(),
        },
    };

    Assessment {
        command: command.to_string(),
        args: args.to_vec(),
        network: validator.is_network_operation(command, args),
        privileged_command: validator.is_dangerous_privileged_command(command),
        shell_command: validator.is_shell_command(command),
        shell_metacharacters: validator.has_shell_metacharacters(args),
        dangerous_root_command: validator.is_dangerous_root_command(command),
        dangerous_root_args: validator.dangerous_root_args(args),
        wildcard_args: validator.wildcard_args(args),
        critical_path_args: validator.system_critical_path_args(args),
        verdict,
        privilege_escalation,
        decision,
    }
}

/// Human-readable multi-line report.
pub fn render_text(a: &Assessment) -> String {
    let mut out = String::new();
    let invocation = std::iter::once(a.command.as_str())
        .chain(a.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "command:   {invocation}");
    let _ = writeln!(out, "risk:      {}", a.verdict.risk.label());
    if a.verdict.is_flagged() {
        let _ = writeln!(out, "pattern:   {}", a.verdict.pattern);
        let _ = writeln!(out, "reason:    {}", a.verdict.reason);
    }

    let escalation = match a.privilege_escalation {
        Some(true) => "yes",
        Some(false) => "no",
        None => "undetermined",
    };
    let _ = writeln!(out, "escalates: {escalation}");

    let network = if a.network.inconclusive_high_risk {
        "undetermined (high risk)"
    } else if a.network.is_network {
        "yes"
    } else {
        "no"
    };
    let _ = writeln!(out, "network:   {network}");

    let mut notes = Vec::new();
    if a.privileged_command {
        notes.push("dangerous with privileges".to_string());
    }
    if a.shell_command {
        notes.push("shell interpreter".to_string());
    }
    if a.shell_metacharacters {
        notes.push("shell metacharacters in arguments".to_string());
    }
    if a.dangerous_root_command {
        notes.push("destructive as root".to_string());
    }
    if !a.dangerous_root_args.is_empty() {
        notes.push(format!("destructive flags at {:?}", a.dangerous_root_args));
    }
    if !a.wildcard_args.is_empty() {
        notes.push(format!("wildcards at {:?}", a.wildcard_args));
    }
    if !a.critical_path_args.is_empty() {
        notes.push(format!("system paths at {:?}", a.critical_path_args));
    }
    for note in notes {
        let _ = writeln!(out, "note:      {note}");
    }

    match &a.decision {
        Decision::Allowed => {
            let _ = writeln!(out, "decision:  allowed");
        }
        Decision::Blocked { message } => {
            let _ = writeln!(out, "decision:  BLOCKED ({message})");
        }
    }
    out
}
