//! cg-cli: Command-line front end for the cmdguard analysis engine.
//!
//! Loads configuration, runs every check on a single invocation, renders a
//! report, and appends an audit record. Exposed as a library for
//! integration testing.

pub mod audit;
pub mod cli;
pub mod config;
pub mod logging;
pub mod report;
