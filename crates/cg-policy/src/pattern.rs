//! Dangerous command patterns and the order-independent matcher.
//!
//! Pattern matching rules:
//!  1. An empty command name or an empty token list never matches.
//!  2. `tokens[0]` must be an exact member of the resolved name variants
//!     (original string, base name, every symlink hop).
//!  3. Argument tokens are matched in any order, each against a distinct
//!     command argument. Extra command arguments are ignored.
//!  4. An argument token ending in `=` is a prefix token (`if=` matches
//!     `if=/dev/zero`); all other tokens require an exact match.

use serde::{Deserialize, Serialize};

use crate::resolve::{NameVariants, Resolver};
use crate::risk::RiskLevel;

/// A dangerous command pattern: command name token, argument tokens, risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerousPattern {
    /// Full pattern including the command name at index 0.
    pub tokens: Vec<String>,
    pub risk: RiskLevel,
    pub reason: String,
}

impl DangerousPattern {
    pub fn new(tokens: &[&str], risk: RiskLevel, reason: &str) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            risk,
            reason: reason.to_string(),
        }
    }

    /// The command-name token, if any.
    pub fn command(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn arg_tokens(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    /// Space-joined rendering used in verdicts and reports.
    pub fn display(&self) -> String {
        self.tokens.join(" ")
    }

    /// Match against a name whose variants are already resolved.
    pub fn matches_resolved<A: AsRef<str>>(&self, variants: &NameVariants, args: &[A]) -> bool {
        let Some(command) = self.command() else {
            return false;
        };
        if !variants.contains(command) {
            return false;
        }
        args_satisfy(self.arg_tokens(), args)
    }
}

/// Whether `name` invoked with `args` satisfies `pattern`.
pub fn matches<A: AsRef<str>>(
    resolver: &Resolver<'_>,
    name: &str,
    args: &[A],
    pattern: &DangerousPattern,
) -> bool {
    if name.is_empty() || pattern.tokens.is_empty() {
        return false;
    }
    let variants = resolver.resolve(name);
    pattern.matches_resolved(&variants, args)
}

enum ArgToken<'a> {
    Prefix(&'a str),
    Exact(&'a str),
}

impl<'a> ArgToken<'a> {
    fn parse(token: &'a str) -> Self {
        if token.ends_with('=') {
            ArgToken::Prefix(token)
        } else {
            ArgToken::Exact(token)
        }
    }

    fn accepts(&self, arg: &str) -> bool {
        match self {
            ArgToken::Prefix(prefix) => arg.starts_with(prefix),
            ArgToken::Exact(exact) => arg == *exact,
        }
    }
}

/// Subset match with one-time consumption of command arguments.
fn args_satisfy<A: AsRef<str>>(tokens: &[String], args: &[A]) -> bool {
    if args.len() < tokens.len() {
        return false;
    }

    let mut consumed = vec![false; args.len()];
    tokens.iter().all(|token| {
        let token = ArgToken::parse(token);
        let found = args
            .iter()
            .enumerate()
            .find(|(i, arg)| !consumed[*i] && token.accepts(arg.as_ref()))
            .map(|(i, _)| i);
        match found {
            Some(i) => {
                consumed[i] = true;
                true
            }
            None => false,
        }
    })
}
