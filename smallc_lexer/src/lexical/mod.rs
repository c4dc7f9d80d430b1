//! Lexical analysis over a table-driven automaton
//!
//! The analyzer walks the lexical state machine one character at a time and
//! stops at the longest prefix that ends in an accepting state. Identifier
//! tokens are checked against the keyword table afterwards, and comment
//! categories are discarded before a token reaches the caller.

pub mod analyzer;

use crate::config::compile_time::lexical::{MAX_LEXEME_LENGTH, MAX_TOKEN_COUNT};
use crate::config::runtime::{LexicalPreferences, TablePreferences};
use crate::logging::codes;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

// ============================================================================
// MODULE API
// ============================================================================

/// Build an analyzer from the configured table locations
pub fn create_analyzer(
    tables: &TablePreferences,
    preferences: LexicalPreferences,
) -> Result<LexicalAnalyzer, LexerError> {
    let machine = crate::automaton::StateMachine::load(tables.lexical_table_path());
    let keywords = crate::keywords::KeywordTable::load(tables.keyword_table_path());
    LexicalAnalyzer::with_preferences(machine, keywords, preferences)
}

/// Check that every lexical code is registered
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::BAD_TOKEN,
        codes::lexical::UNRECOGNIZED_CHARACTER,
        codes::lexical::LEXEME_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_lexeme_length" => MAX_LEXEME_LENGTH
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_init_lexical_analysis_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_create_analyzer_from_table_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Lexical Analyzer Table.csv"),
            "Valid Chars,Accepted,a\n0,,1\n1,Identifier,1\n",
        )
        .unwrap();
        fs::write(dir.path().join("Keyword Table.csv"), "aa,Keyword\n").unwrap();

        let tables = TablePreferences::in_dir(dir.path());
        let mut lexer = create_analyzer(&tables, LexicalPreferences::default()).unwrap();
        let stream = lexer.tokenize("aa").unwrap();

        assert_eq!(stream.len(), 1);
        assert_eq!(stream.tokens()[0].value.name(), Some("Keyword"));
    }

    #[test]
    fn test_missing_tables_are_fatal() {
        let dir = tempdir().unwrap();
        let tables = TablePreferences::in_dir(dir.path());

        assert!(matches!(
            create_analyzer(&tables, LexicalPreferences::default()),
            Err(LexerError::EmptyStateMachine)
        ));
    }
}
