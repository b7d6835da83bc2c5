//! The tape: an unbounded two-sided sequence of symbols with a single
//! read/write head, realized as two stacks. Cells are materialized lazily,
//! so the tape only ever holds the region the head has actually touched.

use crate::types::Symbol;
use std::fmt;

/// A two-stack tape.
///
/// `left` holds the cells strictly left of the head, nearest cell on top;
/// `right` holds the head cell and everything to its right, head on top.
/// A head position past the materialized right end is represented by an
/// empty `right` stack and reads as [`Symbol::Blank`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    left: Vec<Symbol>,
    right: Vec<Symbol>,
}

impl Tape {
    /// Creates an empty tape with the head on an unmaterialized blank cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tape seeded with `input` on the right half, head on the
    /// first input symbol. The left half starts empty.
    pub fn with_input(input: &[Symbol]) -> Self {
        Self {
            left: Vec::new(),
            right: input.iter().rev().copied().collect(),
        }
    }

    /// Returns the symbol under the head without moving it.
    ///
    /// Past the materialized right end this is `Blank`, and the cell is
    /// *not* materialized by the read.
    pub fn read(&self) -> Symbol {
        self.right.last().copied().unwrap_or(Symbol::Blank)
    }

    /// Overwrites the symbol under the head, materializing the cell if the
    /// head is past the right end.
    pub fn write(&mut self, sym: Symbol) {
        match self.right.last_mut() {
            Some(cell) => *cell = sym,
            None => self.right.push(sym),
        }
    }

    /// Moves the head one cell to the right. The departed cell becomes the
    /// rightmost cell of `left`; if it was never materialized, a `Blank` is
    /// synthesized for it.
    pub fn move_right(&mut self) {
        let cell = self.right.pop().unwrap_or(Symbol::Blank);
        self.left.push(cell);
    }

    /// Moves the head one cell to the left, synthesizing a `Blank` when the
    /// tape has never extended that far.
    pub fn move_left(&mut self) {
        let cell = self.left.pop().unwrap_or(Symbol::Blank);
        self.right.push(cell);
    }

    /// Number of materialized cells left of the head.
    pub fn head_offset(&self) -> usize {
        self.left.len()
    }

    /// The materialized tape, leftmost cell first. Blanks synthesized by
    /// head motion are included as-is; nothing is trimmed.
    pub fn contents(&self) -> Vec<Symbol> {
        let mut cells = self.left.clone();
        cells.extend(self.right.iter().rev().copied());
        cells
    }

    /// Consumes the tape and returns its contents, leftmost cell first.
    pub fn into_contents(self) -> Vec<Symbol> {
        let mut cells = self.left;
        cells.extend(self.right.into_iter().rev());
        cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sym in self.contents() {
            write!(f, "{}", sym.as_char())?;
        }
        Ok(())
    }
}
