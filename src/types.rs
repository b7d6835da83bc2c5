//! Core data types for the simulator: the tape alphabet, per-state actions,
//! the parsed machine description, and the error types shared by the parser,
//! loader, and machine construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A state index into the machine's per-state tables.
///
/// States are numbered `0..N-1` contiguously; there are no named states
/// and no gaps.
pub type State = usize;

/// A symbol of the tape alphabet.
///
/// The alphabet is closed: `Zero` and `One` carry the input, `Blank` is both
/// the tape filler and the end-of-input marker. Every transition table is a
/// total function over these three symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Zero,
    One,
    Blank,
}

impl Symbol {
    /// Number of symbols in the alphabet.
    pub const COUNT: usize = 3;

    /// All symbols, in table-column order (`0`, `1`, `#`).
    pub const ALPHABET: [Symbol; Symbol::COUNT] = [Symbol::Zero, Symbol::One, Symbol::Blank];

    /// The table column for this symbol.
    pub fn index(self) -> usize {
        match self {
            Symbol::Zero => 0,
            Symbol::One => 1,
            Symbol::Blank => 2,
        }
    }

    /// Maps a character to a symbol. Accepts exactly `'0'`, `'1'`, and `'#'`.
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            '#' => Some(Symbol::Blank),
            _ => None,
        }
    }

    /// The character this symbol renders as.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
            Symbol::Blank => '#',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The action associated with a state.
///
/// The move is applied when the machine *enters* the state, not when it
/// leaves it; a `Halt` state ends the run without consulting its tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Move the head one cell to the left.
    MoveLeft,
    /// Move the head one cell to the right.
    MoveRight,
    /// Stop the machine.
    Halt,
}

impl Action {
    /// Maps a description character (`'L'`, `'R'`, `'H'`) to an action.
    pub fn from_char(c: char) -> Option<Action> {
        match c {
            'L' => Some(Action::MoveLeft),
            'R' => Some(Action::MoveRight),
            'H' => Some(Action::Halt),
            _ => None,
        }
    }

    /// The description character for this action.
    pub fn as_char(self) -> char {
        match self {
            Action::MoveLeft => 'L',
            Action::MoveRight => 'R',
            Action::Halt => 'H',
        }
    }
}

/// A parsed machine description, not yet validated.
///
/// The per-state tables are kept as maps so an incomplete table (a state
/// missing an entry for some symbol) is representable here and rejected by
/// [`Machine::new`](crate::machine::Machine::new) rather than silently
/// defaulted. The parser always produces complete rows; hand-built programs
/// go through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The start state.
    pub start: State,
    /// Per-state action, index = state.
    pub actions: Vec<Action>,
    /// Per-state next-state table, index = state.
    pub next: Vec<HashMap<Symbol, State>>,
    /// Per-state output-symbol table, index = state.
    pub out: Vec<HashMap<Symbol, Symbol>>,
}

impl Program {
    /// Number of states in the description.
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }
}

/// The description section an error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Actions,
    NextStates,
    Outputs,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::Actions => "action list",
            Section::NextStates => "next-state table",
            Section::Outputs => "output table",
        };
        write!(f, "{name}")
    }
}

/// Errors raised while loading a machine. All of them are fatal: the
/// process reports and terminates rather than running a partial machine.
/// Execution itself has no error path once construction succeeds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The description text is malformed or incomplete.
    #[error("config parse error in {0}: {1}")]
    ConfigParse(Section, String),
    /// The description parsed but the table is semantically invalid
    /// (out-of-range state references, missing symbol entries).
    #[error("malformed machine: {0}")]
    MalformedMachine(String),
    /// A file could not be read.
    #[error("file error: {0}")]
    File(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_char_round_trip() {
        for sym in Symbol::ALPHABET {
            assert_eq!(Symbol::from_char(sym.as_char()), Some(sym));
        }
        assert_eq!(Symbol::from_char('x'), None);
        assert_eq!(Symbol::from_char('2'), None);
    }

    #[test]
    fn test_symbol_indices_match_column_order() {
        assert_eq!(Symbol::Zero.index(), 0);
        assert_eq!(Symbol::One.index(), 1);
        assert_eq!(Symbol::Blank.index(), 2);
    }

    #[test]
    fn test_action_char_round_trip() {
        for c in ['L', 'R', 'H'] {
            let action = Action::from_char(c).unwrap();
            assert_eq!(action.as_char(), c);
        }
        assert_eq!(Action::from_char('S'), None);
    }

    #[test]
    fn test_action_serialization() {
        let left = Action::MoveLeft;
        let halt = Action::Halt;

        let left_json = serde_json::to_string(&left).unwrap();
        let halt_json = serde_json::to_string(&halt).unwrap();

        assert_eq!(left_json, "\"MoveLeft\"");
        assert_eq!(halt_json, "\"Halt\"");

        let left_deserialized: Action = serde_json::from_str(&left_json).unwrap();
        let halt_deserialized: Action = serde_json::from_str(&halt_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(halt, halt_deserialized);
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::ConfigParse(Section::Actions, "line 3: bad action".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("action list"));
        assert!(error_msg.contains("line 3"));

        let error = MachineError::MalformedMachine("start state 5 out of range".to_string());
        assert!(format!("{}", error).contains("start state 5"));
    }
}
