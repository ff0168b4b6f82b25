use std::process::ExitCode;

use cg_cli::audit::AuditLogger;
use cg_cli::cli::{parse_args, print_help, Invocation, Options};
use cg_cli::config::Config;
use cg_cli::logging::init_logging;
use cg_cli::report::{assess, render_text};
use cg_policy::Validator;

const EXIT_USAGE: u8 = 1;
const EXIT_BLOCKED: u8 = 2;

fn main() -> ExitCode {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("cmdguard {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Check(opts)) => opts,
        Err(e) => {
            eprintln!("[cg:args] error: {e}");
            eprintln!("hint: run `cmdguard --help` for usage");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    init_logging();
    run(opts)
}

fn run(opts: Options) -> ExitCode {
    let config = match &opts.config {
        Some(path) => match Config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("[cg:config] error: {e}");
                return ExitCode::from(EXIT_USAGE);
            }
        },
        None => Config::load_or_default(),
    };

    let mut gate = config.gate.risk_gate();
    if let Some(max) = opts.max_risk {
        gate.max_risk = max;
    }
    if opts.privileged {
        gate.privileged = true;
    }

    let validator = match Validator::new(config.security) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[cg:config] error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let assessment = assess(&validator, &gate, &opts.command, &opts.args);

    let mut audit = if config.audit.enabled && !opts.no_audit {
        let path = config.audit.resolve_path();
        AuditLogger::new(&path).unwrap_or_else(|e| {
            eprintln!(
                "[cg:audit] warning: cannot open {}: {e}, auditing disabled",
                path.display()
            );
            AuditLogger::noop()
        })
    } else {
        AuditLogger::noop()
    };
    audit.log_assessment(&assessment);

    if opts.json {
        match serde_json::to_string_pretty(&assessment) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("[cg:report] error: {e}");
                return ExitCode::from(EXIT_USAGE);
            }
        }
    } else {
        print!("{}", render_text(&assessment));
    }

    if assessment.is_allowed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_BLOCKED)
    }
}
