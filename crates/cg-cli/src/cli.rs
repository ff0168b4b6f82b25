//! Command-line argument parsing.

use std::path::PathBuf;

use cg_policy::RiskLevel;

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub max_risk: Option<RiskLevel>,
    pub privileged: bool,
    pub json: bool,
    pub no_audit: bool,
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum Invocation {
    Help,
    Version,
    Check(Options),
}

/// Parse everything after the program name.
///
/// Options are only recognised before the command; the first non-option
/// word (or anything after `--`) starts the invocation under test.
pub fn parse_args<I>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Options::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            "--privileged" => opts.privileged = true,
            "--json" => opts.json = true,
            "--no-audit" => opts.no_audit = true,
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                opts.config = Some(PathBuf::from(value));
            }
            "--max-risk" => {
                let value = iter.next().ok_or("--max-risk requires a level")?;
                opts.max_risk = Some(parse_level(&value)?);
            }
            "--" => {
                let command = iter.next().ok_or("missing command after --")?;
                return finish(opts, command, iter);
            }
            other => {
                if let Some(value) = other.strip_prefix("--config=") {
                    opts.config = Some(PathBuf::from(value));
                } else if let Some(value) = other.strip_prefix("--max-risk=") {
                    opts.max_risk = Some(parse_level(value)?);
                } else if other.starts_with('-') {
                    return Err(format!("unknown option: {other}"));
                } else {
                    return finish(opts, other.to_string(), iter);
                }
            }
        }
    }

    Err("missing command".to_string())
}

fn finish<I>(mut opts: Options, command: String, rest: I) -> Result<Invocation, String>
where
    I: Iterator<Item = String>,
{
    opts.command = command;
    opts.args = rest.collect();
    Ok(Invocation::Check(opts))
}

fn parse_level(value: &str) -> Result<RiskLevel, String> {
    value.parse::<RiskLevel>().map_err(|e| e.to_string())
}

pub fn print_help() {
    println!("cmdguard - check a command invocation for dangerous behaviour");
    println!();
    println!("Usage:");
    println!("  cmdguard [OPTIONS] [--] COMMAND [ARGS...]");
    println!();
    println!("Options:");
    println!("  --config PATH     Read configuration from PATH");
    println!("  --max-risk LEVEL  Highest allowed risk: none, low, medium, high, critical");
    println!("  --privileged      Allow privilege escalation (sudo, su, doas)");
    println!("  --json            Print the assessment as JSON");
    println!("  --no-audit        Do not write an audit record");
    println!("  --version         Print version");
    println!("  --help            Print this help");
    println!();
    println!("Exit status: 0 allowed, 1 usage or configuration error, 2 blocked.");
    println!("Set CMDGUARD_LOG (e.g. CMDGUARD_LOG=debug) for diagnostic logging.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    fn check(args: &[&str]) -> Options {
        match parse(args) {
            Ok(Invocation::Check(opts)) => opts,
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn bare_command() {
        let opts = check(&["rm", "-rf", "/tmp/x"]);
        assert_eq!(opts.command, "rm");
        assert_eq!(opts.args, vec!["-rf", "/tmp/x"]);
        assert!(!opts.json);
        assert_eq!(opts.max_risk, None);
    }

    #[test]
    fn options_before_command() {
        let opts = check(&[
            "--json",
            "--privileged",
            "--no-audit",
            "--max-risk",
            "medium",
            "--config",
            "/etc/cg.toml",
            "curl",
            "https://example.com",
        ]);
        assert!(opts.json);
        assert!(opts.privileged);
        assert!(opts.no_audit);
        assert_eq!(opts.max_risk, Some(RiskLevel::Medium));
        assert_eq!(opts.config, Some(PathBuf::from("/etc/cg.toml")));
        assert_eq!(opts.command, "curl");
    }

    #[test]
    fn equals_forms() {
        let opts = check(&["--max-risk=HIGH", "--config=cg.toml", "ls"]);
        assert_eq!(opts.max_risk, Some(RiskLevel::High));
        assert_eq!(opts.config, Some(PathBuf::from("cg.toml")));
    }

    #[test]
    fn options_after_command_belong_to_it() {
        let opts = check(&["ls", "--json", "--help"]);
        assert!(!opts.json);
        assert_eq!(opts.args, vec!["--json", "--help"]);
    }

    #[test]
    fn double_dash_allows_dash_command() {
        let opts = check(&["--", "-weird", "x"]);
        assert_eq!(opts.command, "-weird");
        assert_eq!(opts.args, vec!["x"]);
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"]), Ok(Invocation::Help));
        assert_eq!(parse(&["-V"]), Ok(Invocation::Version));
    }

    #[test]
    fn usage_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--json"]).is_err());
        assert!(parse(&["--bogus", "ls"]).is_err());
        assert!(parse(&["--max-risk"]).is_err());
        assert!(parse(&["--max-risk", "extreme", "ls"]).is_err());
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--"]).is_err());
    }
}
