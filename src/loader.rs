//! Loading machine descriptions from the filesystem.

use crate::parser::parse;
use crate::types::{MachineError, Program};
use std::fs;
use std::path::Path;

/// Utility for turning description files into [`Program`]s.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a machine description from a file.
    ///
    /// # Errors
    ///
    /// * [`MachineError::File`] if the file cannot be read.
    /// * [`MachineError::ConfigParse`] if the content is not a valid
    ///   description.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::File(format!("failed to read {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Parses a machine description from already-read text. Useful for
    /// descriptions that are not stored in files, e.g. embedded defaults.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        parse(content)
    }
}
