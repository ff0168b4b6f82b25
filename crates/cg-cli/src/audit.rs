//! Append-only JSONL audit logger for analysed invocations.
//!
//! Writes one JSON object per line to a log file, recording the verdict,
//! detector flags, and gate decision of every command that was checked.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::report::{Assessment, Decision};

/// Append-only JSONL audit logger.
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
    session_id: String,
}

impl AuditLogger {
    /// Create a new audit logger that writes to the given path.
    /// Creates parent directories if they don't exist.
    pub fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            session_id: generate_session_id(),
        })
    }

    /// Create a no-op logger that discards all events.
    pub fn noop() -> Self {
        Self {
            writer: None,
            session_id: generate_session_id(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Log one analysed invocation.
    pub fn log_assessment(&mut self, a: &Assessment) {
        let message = match &a.decision {
            Decision::Blocked { message } => Some(message.as_str()),
            Decision::Allowed => None,
        };
        self.write_event(serde_json::json!({
            "ts": epoch_secs(),
            "session": self.session_id,
            "command": a.command,
            "args": a.args,
            "risk": a.verdict.risk,
            "pattern": a.verdict.pattern,
            "reason": a.verdict.reason,
            "privilege_escalation": a.privilege_escalation,
            "network": a.network.is_network,
            "network_inconclusive": a.network.inconclusive_high_risk,
            "decision": a.decision.as_str(),
            "message": message,
        }));
    }

    fn write_event(&mut self, value: serde_json::Value) {
        if let Some(ref mut writer) = self.writer {
            if let Ok(line) = serde_json::to_string(&value) {
                let _ = writeln!(writer, "{line}");
                let _ = writer.flush();
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn generate_session_id() -> String {
    let pid = std::process::id();
    let ts = epoch_secs();
    format!("s{:x}", pid ^ (ts as u32))
}
