//! Subcommand implementations.
//!
//! Each command builds a serializable report, then prints it either as
//! plain text or, with `--json`, as pretty JSON on stdout.

pub mod path;
pub mod roi;
pub mod zone;

use serde::Serialize;

use crate::error::CliError;

/// Print `report` as JSON or through its text renderer.
pub fn emit<T: Serialize>(
    report: &T,
    json: bool,
    text: impl FnOnce(&T) -> String,
) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", text(report));
    }
    Ok(())
}
