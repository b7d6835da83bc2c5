//! Parser for machine description text, using `pest` for the line-level
//! syntax. The format is line oriented: a header line, then three blocks
//! (actions, next-state rows, output rows), each terminated by an empty
//! line. The splitter here assigns every line to its section so syntax
//! errors always name the section they were found in.

use crate::types::{Action, MachineError, Program, Section, State, Symbol};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use std::collections::HashMap;

/// Derives a `PestParser` for the line grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses a machine description into a [`Program`].
///
/// This checks syntax only; semantic validation (state ranges, table
/// completeness) happens in [`Machine::new`](crate::machine::Machine::new).
///
/// # Errors
///
/// Returns [`MachineError::ConfigParse`] naming the offending section when
/// the header is unparsable, a block line has the wrong shape, the action
/// list is empty, or a table block's row count does not match the action
/// count. Anything after the output table's terminating blank line is
/// never read.
pub fn parse(input: &str) -> Result<Program, MachineError> {
    let lines: Vec<&str> = input.lines().collect();

    let header = lines.first().ok_or_else(|| {
        MachineError::ConfigParse(Section::Header, "empty description".to_string())
    })?;
    let start = parse_header(header)?;

    let mut cursor = 1;
    let action_lines = take_block(&lines, &mut cursor);
    let next_lines = take_block(&lines, &mut cursor);
    let out_lines = take_block(&lines, &mut cursor);

    let actions = parse_actions(&action_lines)?;
    let next = parse_next_table(&next_lines, actions.len())?;
    let out = parse_out_table(&out_lines, actions.len())?;

    Ok(Program {
        start,
        actions,
        next,
        out,
    })
}

/// Collects lines until the next empty line or end of input, tagged with
/// 1-based line numbers. Only an exactly empty line terminates a block; a
/// line of spaces is content and will fail its section's line rule.
fn take_block<'a>(lines: &[&'a str], cursor: &mut usize) -> Vec<(usize, &'a str)> {
    let mut block = Vec::new();
    while *cursor < lines.len() && !lines[*cursor].is_empty() {
        block.push((*cursor + 1, lines[*cursor]));
        *cursor += 1;
    }
    *cursor += 1; // past the terminating blank line
    block
}

/// Parses one line under the given rule, tagging any syntax error with its
/// section and line number.
fn parse_line<'a>(
    rule: Rule,
    section: Section,
    line_no: usize,
    line: &'a str,
) -> Result<Pair<'a, Rule>, MachineError> {
    DescriptionParser::parse(rule, line)
        .map(|mut pairs| pairs.next().unwrap())
        .map_err(|e| MachineError::ConfigParse(section, format!("line {line_no}: {e}")))
}

/// Extracts the start state from the header line. The first two tokens are
/// free form (machine name, arity in the stock descriptions) and ignored.
fn parse_header(line: &str) -> Result<State, MachineError> {
    let pair = parse_line(Rule::header, Section::Header, 1, line)?;

    // The grammar guarantees exactly one index in a header.
    let start = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::index)
        .unwrap();
    parse_index(start.as_str(), Section::Header, 1)
}

fn parse_actions(lines: &[(usize, &str)]) -> Result<Vec<Action>, MachineError> {
    if lines.is_empty() {
        return Err(MachineError::ConfigParse(
            Section::Actions,
            "empty action list".to_string(),
        ));
    }

    lines
        .iter()
        .map(|&(line_no, line)| {
            let pair = parse_line(Rule::action_row, Section::Actions, line_no, line)?;
            let action = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::action)
                .unwrap();
            let text = action.as_str();
            text.chars().next().and_then(Action::from_char).ok_or_else(|| {
                MachineError::ConfigParse(
                    Section::Actions,
                    format!("line {line_no}: unrecognized action '{text}'"),
                )
            })
        })
        .collect()
}

fn parse_next_table(
    lines: &[(usize, &str)],
    states: usize,
) -> Result<Vec<HashMap<Symbol, State>>, MachineError> {
    check_row_count(lines.len(), states, Section::NextStates)?;

    lines
        .iter()
        .map(|&(line_no, line)| {
            let pair = parse_line(Rule::next_row, Section::NextStates, line_no, line)?;
            let mut row = HashMap::new();
            for (sym, index) in Symbol::ALPHABET
                .into_iter()
                .zip(pair.into_inner().filter(|p| p.as_rule() == Rule::index))
            {
                row.insert(sym, parse_index(index.as_str(), Section::NextStates, line_no)?);
            }
            Ok(row)
        })
        .collect()
}

fn parse_out_table(
    lines: &[(usize, &str)],
    states: usize,
) -> Result<Vec<HashMap<Symbol, Symbol>>, MachineError> {
    check_row_count(lines.len(), states, Section::Outputs)?;

    lines
        .iter()
        .map(|&(line_no, line)| {
            let pair = parse_line(Rule::out_row, Section::Outputs, line_no, line)?;
            let mut row = HashMap::new();
            for (sym, written) in Symbol::ALPHABET
                .into_iter()
                .zip(pair.into_inner().filter(|p| p.as_rule() == Rule::symbol))
            {
                let text = written.as_str();
                let written = text.chars().next().and_then(Symbol::from_char).ok_or_else(|| {
                    MachineError::ConfigParse(
                        Section::Outputs,
                        format!("line {line_no}: unrecognized symbol '{text}'"),
                    )
                })?;
                row.insert(sym, written);
            }
            Ok(row)
        })
        .collect()
}

/// Checks that a table block has exactly one row per state.
fn check_row_count(found: usize, expected: usize, section: Section) -> Result<(), MachineError> {
    if found != expected {
        return Err(MachineError::ConfigParse(
            section,
            format!("expected {expected} rows, found {found}"),
        ));
    }
    Ok(())
}

/// Parses a state index, rejecting values that overflow `usize`.
fn parse_index(text: &str, section: Section, line_no: usize) -> Result<State, MachineError> {
    text.parse::<State>().map_err(|_| {
        MachineError::ConfigParse(
            section,
            format!("line {line_no}: state index '{text}' too large"),
        )
    })
}
