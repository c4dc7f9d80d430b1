//! Table-driven deterministic automaton
//!
//! `loader` turns a comma-separated transition table into a `StateMachine`:
//! an arena of `State`s addressed by `StateId`, with transitions stored as
//! dense per-state vectors indexed by alphabet class. Names are resolved to
//! ids once, at load time; traversal itself lives in the analyzers.

pub mod loader;
pub mod machine;
pub mod state;

use crate::config::compile_time::table_loading::{MAX_KEYWORDS, MAX_STATES};
use crate::logging::codes;

pub use loader::{TableLoadReport, TransitionTableLoader};
pub use machine::{StateMachine, ALPHABET_SIZE};
pub use state::{State, StateId};

/// Table and keyword resource errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    #[error("Cannot read transition table {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Cannot read keyword table {path}: {message}")]
    KeywordTableUnreadable { path: String, message: String },

    #[error("Table {path} too large: {size} bytes (max: {max_size})")]
    TooLarge {
        path: String,
        size: u64,
        max_size: u64,
    },

    #[error("Too many states: {count} (max {MAX_STATES})")]
    TooManyStates { count: usize },

    #[error("Too many keywords: {count} (max {MAX_KEYWORDS})")]
    TooManyKeywords { count: usize },

    #[error("Unknown state: {name}")]
    UnknownState { name: String },
}

impl TableError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            TableError::Unreadable { .. } => codes::table_loading::TABLE_UNREADABLE,
            TableError::KeywordTableUnreadable { .. } => {
                codes::table_loading::KEYWORD_TABLE_UNREADABLE
            }
            TableError::TooLarge { .. }
            | TableError::TooManyStates { .. }
            | TableError::TooManyKeywords { .. } => codes::table_loading::TABLE_TOO_LARGE,
            TableError::UnknownState { .. } => codes::table_loading::UNKNOWN_ENTRY_STATE,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let unreadable = TableError::Unreadable {
            path: "missing.csv".to_string(),
            message: "No such file".to_string(),
        };
        assert_eq!(unreadable.error_code().as_str(), "E060");
        assert!(unreadable.requires_halt());

        let unknown = TableError::UnknownState {
            name: "Start".to_string(),
        };
        assert!(!unknown.requires_halt());
        assert_eq!(unknown.to_string(), "Unknown state: Start");
    }
}
