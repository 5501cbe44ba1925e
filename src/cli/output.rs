//! Output formatting utilities for the CLI.

use serde::Serialize;

/// Command result that can be printed for people or for scripts.
pub trait CommandOutput: Serialize {
    /// Plain-text rendering for a terminal.
    fn to_human(&self) -> String;
    /// Machine-readable rendering for `--json`.
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}
