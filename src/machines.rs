//! Built-in machine descriptions, embedded at compile time.

use crate::parser::parse;
use crate::types::Program;
use std::collections::HashMap;

// Default embedded descriptions
const MACHINE_TEXTS: [(&str, &str); 2] = [
    ("decrement", include_str!("../machines/decrement.txt")),
    ("increment", include_str!("../machines/increment.txt")),
];

/// The machine used when the caller names none: the binary decrementer.
pub const DEFAULT_MACHINE: &str = "decrement";

lazy_static::lazy_static! {
    static ref MACHINES: HashMap<&'static str, Program> = MACHINE_TEXTS
        .iter()
        .filter_map(|(name, text)| match parse(text) {
            Ok(program) => Some((*name, program)),
            Err(e) => {
                eprintln!("failed to parse built-in machine '{name}': {e}");
                None
            }
        })
        .collect();
}

/// Names of all built-in machines, in embed order.
pub fn names() -> Vec<&'static str> {
    MACHINE_TEXTS.iter().map(|(name, _)| *name).collect()
}

/// Looks up a built-in machine description by name.
pub fn get(name: &str) -> Option<Program> {
    MACHINES.get(name).cloned()
}

/// The raw description text of a built-in machine.
pub fn text(name: &str) -> Option<&'static str> {
    MACHINE_TEXTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, text)| *text)
}
