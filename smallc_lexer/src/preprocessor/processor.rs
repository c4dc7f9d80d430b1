//! Directive pass that rewrites program text before lexing

use crate::automaton::{StateId, StateMachine};
use crate::config::runtime::PreprocessorPreferences;
use crate::conversions::to_literal;
use crate::file_processor::{FileProcessor, FileProcessorError};
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success, log_warning};
use std::path::Path;

/// Preprocessor errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PreprocessorError {
    #[error("Preprocessor state machine has no states")]
    EmptyStateMachine,

    #[error("No program is open")]
    ProgramNotOpen,

    #[error(transparent)]
    File(#[from] FileProcessorError),
}

impl PreprocessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PreprocessorError::EmptyStateMachine => codes::table_loading::EMPTY_STATE_MACHINE,
            PreprocessorError::ProgramNotOpen => codes::preprocessor::PROGRAM_NOT_OPEN,
            PreprocessorError::File(error) => error.error_code(),
        }
    }
}

/// Result of one full preprocessing pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreProcessorResponse {
    /// Rewritten program, the input of the lexical analyzer
    pub text: String,
    pub warnings: Vec<SpannedToken>,
    pub errors: Vec<SpannedToken>,
}

impl PreProcessorResponse {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Consumes a program through the preprocessor table.
///
/// Unlike the lexical analyzer every character read is consumed, and a dead
/// state means "emit what we have".
#[derive(Debug)]
pub struct PreProcessor {
    machine: StateMachine,
    entry: StateId,
    preferences: PreprocessorPreferences,
    file_processor: FileProcessor,
    program: Option<Vec<char>>,
    cursor: usize,
    position: Position,
}

impl PreProcessor {
    pub fn new(machine: StateMachine) -> Result<Self, PreprocessorError> {
        Self::with_preferences(machine, PreprocessorPreferences::default())
    }

    pub fn with_preferences(
        machine: StateMachine,
        preferences: PreprocessorPreferences,
    ) -> Result<Self, PreprocessorError> {
        let entry = machine
            .entry()
            .ok_or(PreprocessorError::EmptyStateMachine)?;

        Ok(Self {
            machine,
            entry,
            preferences,
            file_processor: FileProcessor::new(),
            program: None,
            cursor: 0,
            position: Position::start(),
        })
    }

    /// Load the preprocessor table; an unreadable table is fatal here
    pub fn from_table<P: AsRef<Path>>(table_path: P) -> Result<Self, PreprocessorError> {
        let preprocessor = Self::new(StateMachine::load(table_path));

        if let Err(error) = &preprocessor {
            log_error!(error.error_code(), &error.to_string());
        }

        preprocessor
    }

    pub fn with_file_processor(mut self, file_processor: FileProcessor) -> Self {
        self.file_processor = file_processor;
        self
    }

    /// Read a program file, replacing any open program
    pub fn open_program<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PreprocessorError> {
        let result = self.file_processor.process_file(path)?;
        self.set_program(&result.source);
        Ok(())
    }

    /// Drop the open program; false when none was open
    pub fn close_program(&mut self) -> bool {
        self.cursor = 0;
        self.position = Position::start();
        self.program.take().is_some()
    }

    pub fn set_program(&mut self, text: &str) {
        self.program = Some(text.chars().collect());
        self.cursor = 0;
        self.position = Position::start();
    }

    pub fn is_open(&self) -> bool {
        self.program.is_some()
    }

    /// True while the open program has unread characters
    pub fn has_next_token(&self) -> bool {
        self.program
            .as_ref()
            .is_some_and(|program| self.cursor < program.len())
    }

    /// Run the open program to completion and sort tokens by category
    pub fn process(&mut self) -> Result<PreProcessorResponse, PreprocessorError> {
        if !self.is_open() {
            let error = PreprocessorError::ProgramNotOpen;
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }

        let mut response = PreProcessorResponse::default();
        let mut dropped = 0usize;

        while self.has_next_token() {
            let token = self.next_token();
            let name = token.value.name();

            if token.value.is_bad() {
                log_error!(codes::preprocessor::ERROR_TOKEN, "Preprocessor error token",
                    span = token.span,
                    "lexeme" => to_literal(token.value.lexeme())
                );
                response.errors.push(token);
            } else if name == Some(self.preferences.passthrough_category.as_str()) {
                response.text.push_str(token.value.lexeme());
            } else if name == Some(self.preferences.warning_category.as_str()) {
                log_warning!(codes::preprocessor::WARNING_TOKEN, "Preprocessor warning token",
                    span = token.span,
                    "lexeme" => to_literal(token.value.lexeme())
                );
                response.warnings.push(token);
            } else {
                dropped += 1;
            }
        }

        log_success!(codes::success::PREPROCESSING_COMPLETE, "Preprocessing completed",
            "chars" => response.text.chars().count(),
            "warnings" => response.warnings.len(),
            "errors" => response.errors.len(),
            "dropped" => dropped
        );

        Ok(response)
    }

    /// One always-consume traversal from the entry state
    fn next_token(&mut self) -> SpannedToken {
        let start = self.position;
        let mut state = self.entry;
        let mut lexeme = String::new();

        while let Some(ch) = self.read_char() {
            lexeme.push(ch);

            let current = self.machine.state(state);
            match self.machine.transition(state, ch) {
                None if current.is_accepting() => {
                    return self.finish(lexeme, current.accepted_name(), start);
                }
                Some(next) => state = next,
                None => {}
            }

            if self.machine.state(state).is_dead() {
                break;
            }
        }

        let accepted = self.machine.state(state).accepted_name();
        self.finish(lexeme, accepted, start)
    }

    fn finish(&self, lexeme: String, category: Option<&str>, start: Position) -> SpannedToken {
        log_debug!("Preprocessor token",
            "lexeme" => to_literal(&lexeme),
            "category" => category.unwrap_or("<bad>")
        );
        Spanned::new(
            Token::with_name(lexeme, category),
            Span::new(start, self.position),
        )
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.program.as_ref()?.get(self.cursor).copied()?;
        self.cursor += 1;
        self.position = self.position.advance(ch);
        Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::TransitionTableLoader;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    // Columns: a b { \ newline space
    //   a, newline, space -> Add (dead); b+ -> Add (looping)
    //   { -> Brace; \ ... newline -> Continuation (dropped)
    const TABLE: &str = "\
Valid Chars,Accepted,a,b,{,\\,0x0A,0x20
0,,1,5,2,3,1,1
1,Add,,,,,,
2,Brace,,,,,,
3,,,,,,4,
4,Continuation,,,,,,
5,Add,,5,,,,
";

    fn preprocessor() -> PreProcessor {
        let (machine, report) = TransitionTableLoader::parse(TABLE);
        assert!(report.is_clean());
        PreProcessor::new(machine).unwrap()
    }

    fn run(text: &str) -> PreProcessorResponse {
        let mut preprocessor = preprocessor();
        preprocessor.set_program(text);
        preprocessor.process().unwrap()
    }

    fn lexemes(tokens: &[SpannedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.lexeme()).collect()
    }

    #[test]
    fn test_empty_machine_rejected() {
        assert_matches!(
            PreProcessor::new(StateMachine::empty()),
            Err(PreprocessorError::EmptyStateMachine)
        );
    }

    #[test]
    fn test_from_table_reads_resource() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preprocessor.csv");
        fs::write(&path, TABLE).unwrap();

        let mut preprocessor = PreProcessor::from_table(&path).unwrap();
        preprocessor.set_program("a \\\na\n");
        assert_eq!(preprocessor.process().unwrap().text, "a a\n");

        assert_matches!(
            PreProcessor::from_table(dir.path().join("missing.csv")),
            Err(PreprocessorError::EmptyStateMachine)
        );
    }

    #[test]
    fn test_passthrough_and_dropped_categories() {
        let response = run("a \\\na\n");

        assert_eq!(response.text, "a a\n");
        assert!(!response.has_warnings());
        assert!(!response.has_errors());
    }

    #[test]
    fn test_warning_and_error_tokens() {
        let response = run("{a\\");

        assert_eq!(response.text, "a");
        assert_eq!(lexemes(&response.warnings), vec!["{"]);
        assert_eq!(response.warnings[0].value.name(), Some("Brace"));
        assert_eq!(lexemes(&response.errors), vec!["\\"]);
        assert!(response.errors[0].value.is_bad());
        assert_eq!(response.errors[0].span.start.offset, 2);
    }

    #[test]
    fn test_accepting_without_transition_consumes_the_character() {
        let mut preprocessor = preprocessor();
        preprocessor.set_program("bba");

        let token = preprocessor.next_token();
        assert_eq!(token.value, Token::new("bba", "Add"));
        assert!(!preprocessor.has_next_token());
    }

    #[test]
    fn test_unknown_character_stays_in_lexeme() {
        let mut preprocessor = preprocessor();
        preprocessor.set_program("za");

        assert_eq!(preprocessor.next_token().value, Token::new("za", "Add"));
    }

    #[test]
    fn test_continuation_swallows_until_newline() {
        let mut preprocessor = preprocessor();
        preprocessor.set_program("\\ab\na");

        assert_eq!(
            preprocessor.next_token().value,
            Token::new("\\ab\n", "Continuation")
        );
        assert_eq!(preprocessor.next_token().value, Token::new("a", "Add"));
    }

    #[test]
    fn test_passthrough_output_is_fixed_point() {
        let first = run("ab {a\\\nbb\n");
        let second = run(&first.text);

        assert_eq!(first.text, "ab abb\n");
        assert!(first.has_warnings());
        assert_eq!(second.text, first.text);
        assert!(!second.has_warnings());
        assert!(!second.has_errors());
    }

    #[test]
    fn test_process_requires_open_program() {
        let mut preprocessor = preprocessor();

        assert_matches!(preprocessor.process(), Err(PreprocessorError::ProgramNotOpen));
        assert!(!preprocessor.close_program());
    }

    #[test]
    fn test_open_and_close_program() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("program.c");
        fs::write(&path, "a{").unwrap();

        let mut preprocessor = preprocessor();
        preprocessor.open_program(&path).unwrap();
        assert!(preprocessor.has_next_token());

        let response = preprocessor.process().unwrap();
        assert_eq!(response.text, "a");
        assert_eq!(response.warnings.len(), 1);

        assert!(preprocessor.close_program());
        assert!(!preprocessor.has_next_token());
        assert!(!preprocessor.close_program());

        assert_matches!(
            preprocessor.open_program(dir.path().join("missing.c")),
            Err(PreprocessorError::File(FileProcessorError::FileNotFound { .. }))
        );
    }

    #[test]
    fn test_custom_category_names() {
        let (machine, _) = TransitionTableLoader::parse(TABLE);
        let preferences = PreprocessorPreferences {
            passthrough_category: "Brace".to_string(),
            warning_category: "Add".to_string(),
        };
        let mut preprocessor = PreProcessor::with_preferences(machine, preferences).unwrap();
        preprocessor.set_program("{a");

        let response = preprocessor.process().unwrap();
        assert_eq!(response.text, "{");
        assert_eq!(lexemes(&response.warnings), vec!["a"]);
    }
}
