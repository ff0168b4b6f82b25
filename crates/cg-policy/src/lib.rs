//! cg-policy: Command risk analysis for cmdguard.
//!
//! Classifies a proposed command invocation (name plus argument vector)
//! against a catalog of dangerous patterns, and detects privilege escalation
//! and network access. Command names are resolved through symbolic link
//! chains first, so an innocuously named link to `/bin/rm` is still caught.
//!
//! # Usage
//!
//! ```no_run
//! use cg_policy::{RiskGate, RiskLevel, SecurityConfig, Validator};
//!
//! let validator = Validator::new(SecurityConfig::default()).expect("valid config");
//! let verdict = validator.analyze_command_security("/tmp/innocuous", &["-rf", "/"]);
//! let escalation = validator.is_privilege_escalation_command("/tmp/innocuous").ok();
//!
//! let gate = RiskGate::new(RiskLevel::Medium, false);
//! if let Err(e) = gate.evaluate("/tmp/innocuous", &verdict, escalation) {
//!     eprintln!("refused: {e}");
//! }
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod evaluate;
pub mod pattern;
pub mod resolve;
pub mod risk;
pub mod validator;

pub use catalog::{default_patterns, Catalog};
pub use classify::{classify, Verdict, DEPTH_EXCEEDED_REASON};
pub use config::SecurityConfig;
pub use detect::{is_network_operation, is_privilege_escalation, NetworkAssessment};
pub use error::{ConfigError, SecurityError};
pub use evaluate::RiskGate;
pub use pattern::{matches, DangerousPattern};
pub use resolve::{base_name, resolve, LinkSource, NameVariants, OsLinks, Resolver, MAX_SYMLINK_DEPTH};
pub use risk::RiskLevel;
pub use validator::Validator;
