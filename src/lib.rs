//! Core logic for a deterministic single-tape Turing machine simulator:
//! parsing transition-table descriptions, the two-stack tape, and the
//! execution engine that drives a machine over an input until it halts.

pub mod loader;
pub mod machine;
pub mod machines;
pub mod parser;
pub mod tape;
pub mod types;

/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the machine and its execution types from the machine module.
pub use machine::{Execution, Machine, Step};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the core data types and errors from the types module.
pub use types::{Action, MachineError, Program, Section, State, Symbol};
