//! Transition table parsing
//!
//! Layout: a header row `Valid Chars,<label>,sym_2,sym_3,...` followed by
//! state rows `name,accepted_or_empty,dest_2,dest_3,...`. Cell `i` of a state
//! row is the destination on the symbol in header cell `i`. Header symbols are
//! a literal character (first char of the cell) or a `0xHH` escape.

use super::machine::{StateMachine, ALPHABET_SIZE};
use super::TableError;
use crate::config::compile_time::table_loading::MAX_TABLE_FILE_SIZE;
use crate::conversions::hex_token_to_char;
use crate::logging::codes;
use crate::{log_debug, log_warning};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// First cell of the header row
pub const HEADER_MARKER: &str = "Valid Chars";

/// Index of the first symbol column in both header and state rows
const FIRST_SYMBOL_COLUMN: usize = 2;

/// What the loader recovered from while parsing a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLoadReport {
    pub rows: usize,
    pub states: usize,
    pub duplicate_rows: usize,
    pub absent_columns: usize,
    pub dangling_transitions: usize,
    pub shadowed_transitions: usize,
    pub missing_header: bool,
}

impl TableLoadReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_rows == 0
            && self.absent_columns == 0
            && self.dangling_transitions == 0
            && self.shadowed_transitions == 0
            && !self.missing_header
    }
}

pub struct TransitionTableLoader;

impl TransitionTableLoader {
    /// Parse table text. Never fails: malformed cells are skipped and
    /// counted in the report.
    pub fn parse(source: &str) -> (StateMachine, TableLoadReport) {
        let mut report = TableLoadReport::default();
        let mut seen = HashSet::new();
        let mut header: Option<Vec<&str>> = None;
        let mut rows: Vec<Vec<&str>> = Vec::new();

        for line in source.lines().filter(|line| !line.is_empty()) {
            report.rows += 1;
            let cells: Vec<&str> = line.split(',').collect();

            if !seen.insert(cells[0]) {
                report.duplicate_rows += 1;
                log_debug!("Duplicate table row ignored", "row" => cells[0]);
                continue;
            }

            if cells[0] == HEADER_MARKER {
                header = Some(cells);
            } else {
                rows.push(cells);
            }
        }

        let header = header.unwrap_or_else(|| {
            report.missing_header = true;
            Vec::new()
        });
        let (alphabet, column_classes) = Self::decode_header(&header, &mut report);

        let mut machine = StateMachine::with_alphabet(alphabet);

        // First pass: every row becomes a state so destinations can resolve
        let ids: Vec<_> = rows
            .iter()
            .map(|cells| {
                let accepted = cells.get(1).copied().filter(|name| !name.is_empty());
                machine.add_state(cells[0], accepted)
            })
            .collect();
        report.states = ids.len();

        // Second pass: resolve destination names
        for (cells, &from) in rows.iter().zip(&ids) {
            for (column, destination) in cells.iter().enumerate().skip(FIRST_SYMBOL_COLUMN) {
                if destination.is_empty() {
                    continue;
                }

                let Some(class) = column_classes.get(column).copied().flatten() else {
                    continue;
                };

                match machine.state_id(destination) {
                    Some(to) => {
                        if !machine.add_transition(from, class, to) {
                            report.shadowed_transitions += 1;
                        }
                    }
                    None => {
                        report.dangling_transitions += 1;
                        log_debug!("Dangling transition dropped",
                            "state" => cells[0],
                            "destination" => destination
                        );
                    }
                }
            }
        }

        if report.missing_header {
            log_warning!(codes::table_loading::INVALID_SYMBOL_COLUMN,
                "Transition table has no header row; states have no transitions"
            );
        }
        if report.absent_columns > 0 {
            log_warning!(codes::table_loading::INVALID_SYMBOL_COLUMN,
                "Header columns ignored",
                "count" => report.absent_columns
            );
        }
        if report.duplicate_rows > 0 {
            log_warning!(codes::table_loading::DUPLICATE_STATE_ROW,
                "Duplicate table rows ignored",
                "count" => report.duplicate_rows
            );
        }
        if report.dangling_transitions > 0 || report.shadowed_transitions > 0 {
            log_warning!(codes::table_loading::DANGLING_TRANSITION,
                "Transitions dropped",
                "dangling" => report.dangling_transitions,
                "shadowed" => report.shadowed_transitions
            );
        }

        (machine, report)
    }

    /// Map header cells to alphabet classes; repeated symbols share a class
    fn decode_header(
        header: &[&str],
        report: &mut TableLoadReport,
    ) -> (Vec<char>, Vec<Option<usize>>) {
        let mut alphabet: Vec<char> = Vec::new();
        let mut column_classes = vec![None; header.len()];

        for (column, cell) in header.iter().enumerate().skip(FIRST_SYMBOL_COLUMN) {
            let symbol = decode_symbol(cell).filter(|c| (*c as usize) < ALPHABET_SIZE);

            let Some(symbol) = symbol else {
                report.absent_columns += 1;
                log_debug!("Header column ignored", "column" => column, "cell" => cell);
                continue;
            };

            let class = match alphabet.iter().position(|c| *c == symbol) {
                Some(existing) => existing,
                None => {
                    alphabet.push(symbol);
                    alphabet.len() - 1
                }
            };
            column_classes[column] = Some(class);
        }

        (alphabet, column_classes)
    }
}

/// A header cell containing `0x` is a hex escape; otherwise its first char
pub fn decode_symbol(cell: &str) -> Option<char> {
    if cell.contains("0x") {
        hex_token_to_char(cell)
    } else {
        cell.chars().next()
    }
}

/// Read a table or keyword resource within the compile-time size limit
pub(crate) fn read_table_source(path: &Path) -> Result<String, TableError> {
    let unreadable = |message: String| TableError::Unreadable {
        path: path.display().to_string(),
        message,
    };

    let metadata = fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }

    if metadata.len() > MAX_TABLE_FILE_SIZE {
        return Err(TableError::TooLarge {
            path: path.display().to_string(),
            size: metadata.len(),
            max_size: MAX_TABLE_FILE_SIZE,
        });
    }

    fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))
}
