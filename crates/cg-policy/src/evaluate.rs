//! Gate an analysed invocation against a maximum acceptable risk.

use crate::classify::Verdict;
use crate::error::SecurityError;
use crate::risk::RiskLevel;

/// Upper bound on what an invocation may do before it is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskGate {
    pub max_risk: RiskLevel,
    /// Whether the caller is allowed to escalate privileges.
    pub privileged: bool,
}

impl Default for RiskGate {
    fn default() -> Self {
        Self {
            max_risk: RiskLevel::Low,
            privileged: false,
        }
    }
}

impl RiskGate {
    pub fn new(max_risk: RiskLevel, privileged: bool) -> Self {
        Self {
            max_risk,
            privileged,
        }
    }

    /// Decide whether `command` may run.
    ///
    /// `escalation` is the privilege-escalation status: `Some(true)` for
    /// sudo-like commands, `None` when it could not be determined.
    pub fn evaluate(
        &self,
        command: &str,
        verdict: &Verdict,
        escalation: Option<bool>,
    ) -> Result<(), SecurityError> {
        match escalation {
            Some(true) if !self.privileged => {
                return Err(self.violation(
                    command,
                    verdict,
                    "privilege escalation is not permitted".to_string(),
                ));
            }
            None if !self.privileged => {
                return Err(self.violation(
                    command,
                    verdict,
                    "cannot determine whether the command escalates privileges".to_string(),
                ));
            }
            _ => {}
        }

        if verdict.risk > self.max_risk {
            let mut message = format!(
                "risk level {} exceeds maximum allowed {}",
                verdict.risk, self.max_risk
            );
            if !verdict.reason.is_empty() {
                message.push_str(&format!(" ({})", verdict.reason));
            }
            return Err(self.violation(command, verdict, message));
        }

        Ok(())
    }

    fn violation(&self, command: &str, verdict: &Verdict, message: String) -> SecurityError {
        SecurityError::Violation {
            command: command.to_string(),
            risk: verdict.risk,
            max: self.max_risk,
            message,
        }
    }
}
