//! Longest-match tokenizer over a loaded transition table

use crate::automaton::{StateId, StateMachine};
use crate::config::compile_time::lexical::{MAX_LEXEME_LENGTH, MAX_TOKEN_COUNT};
use crate::config::runtime::LexicalPreferences;
use crate::conversions::to_literal;
use crate::keywords::KeywordTable;
use crate::logging::codes;
use crate::tokens::{Token, TokenOutcome, TokenStream};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};
use std::collections::BTreeMap;
use std::path::Path;

/// Lexical analysis errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Lexical state machine has no states")]
    EmptyStateMachine,

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Lexeme too long: {length} characters (max {MAX_LEXEME_LENGTH})")]
    LexemeTooLong { length: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::EmptyStateMachine => codes::table_loading::EMPTY_STATE_MACHINE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::LexemeTooLong { .. } => codes::lexical::LEXEME_TOO_LONG,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// Counters for one program
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub bad_tokens: usize,
    pub unrecognized_chars: usize,
    pub skipped_tokens: usize,
    pub max_lexeme_length: usize,
    pub category_counts: BTreeMap<String, usize>,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, keyword: bool, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        self.max_lexeme_length = self.max_lexeme_length.max(token.lexeme().chars().count());

        let Some(name) = token.name() else {
            self.bad_tokens += 1;
            return;
        };

        if keyword {
            self.keyword_tokens += 1;
        } else if name == preferences.identifier_category {
            self.identifier_tokens += 1;
        }

        if preferences.collect_category_counts {
            *self.category_counts.entry(name.to_string()).or_insert(0) += 1;
        }
    }
}

/// Table-driven tokenizer.
///
/// Owns its automaton and keyword table, so independent analyzers over
/// different tables can coexist.
#[derive(Debug)]
pub struct LexicalAnalyzer {
    machine: StateMachine,
    entry: StateId,
    keywords: KeywordTable,
    preferences: LexicalPreferences,
    program: Vec<char>,
    cursor: usize,
    position: Position,
    token_start: Position,
    metrics: LexicalMetrics,
}

impl LexicalAnalyzer {
    /// Fails when the machine has no states, the fatal table configuration error
    pub fn new(machine: StateMachine, keywords: KeywordTable) -> Result<Self, LexerError> {
        Self::with_preferences(machine, keywords, LexicalPreferences::default())
    }

    pub fn with_preferences(
        machine: StateMachine,
        keywords: KeywordTable,
        preferences: LexicalPreferences,
    ) -> Result<Self, LexerError> {
        let entry = machine.entry().ok_or(LexerError::EmptyStateMachine)?;

        Ok(Self {
            machine,
            entry,
            keywords,
            preferences,
            program: Vec::new(),
            cursor: 0,
            position: Position::start(),
            token_start: Position::start(),
            metrics: LexicalMetrics::default(),
        })
    }

    /// Load both tables; unreadable resources surface as an empty machine
    pub fn from_tables<P: AsRef<Path>, Q: AsRef<Path>>(
        table_path: P,
        keyword_path: Q,
    ) -> Result<Self, LexerError> {
        let machine = StateMachine::load(table_path);
        let keywords = KeywordTable::load(keyword_path);
        let analyzer = Self::new(machine, keywords);

        if let Err(error) = &analyzer {
            log_error!(error.error_code(), &error.to_string());
        }

        analyzer
    }

    /// Replace the program and rewind
    pub fn set_program(&mut self, text: &str) {
        self.program = text.chars().collect();
        self.cursor = 0;
        self.position = Position::start();
        self.token_start = Position::start();
        self.metrics = LexicalMetrics::default();
    }

    /// True while unconsumed input remains
    pub fn has_next_token(&self) -> bool {
        self.cursor < self.program.len()
    }

    /// Current line and column
    pub fn position(&self) -> Position {
        self.position
    }

    /// Span of the lexeme behind the most recent outcome
    pub fn token_span(&self) -> Span {
        Span::new(self.token_start, self.position)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Discard one character to resynchronize after a lexical error
    pub fn skip_char(&mut self) -> Option<char> {
        let ch = self.program.get(self.cursor).copied()?;
        self.token_start = self.position;
        self.consume(ch);
        Some(ch)
    }

    /// Next token, with skip categories discarded
    pub fn next_token(&mut self) -> TokenOutcome {
        loop {
            let outcome = self.scan();

            if let TokenOutcome::Token(token) = &outcome {
                if token
                    .name()
                    .is_some_and(|name| self.preferences.is_skip_category(name))
                {
                    self.metrics.skipped_tokens += 1;
                    continue;
                }
            }

            return outcome;
        }
    }

    /// Tokenize a whole buffer. Bad tokens and unrecognized characters are
    /// recorded in the stream; only resource limits abort.
    pub fn tokenize(&mut self, text: &str) -> Result<TokenStream, LexerError> {
        self.set_program(text);
        let mut stream = TokenStream::default();

        log_debug!("Starting lexical analysis",
            "char_count" => self.program.len(),
            "states" => self.machine.len(),
            "keywords" => self.keywords.len()
        );

        while self.has_next_token() {
            if stream.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens { count: stream.len() };
                log_error!(error.error_code(), "Token limit exceeded",
                    span = self.token_span(),
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            match self.next_token() {
                TokenOutcome::Token(token) => {
                    let length = token.lexeme().chars().count();
                    if length > MAX_LEXEME_LENGTH {
                        let error = LexerError::LexemeTooLong { length };
                        log_error!(error.error_code(), &error.to_string(),
                            span = self.token_span()
                        );
                        return Err(error);
                    }
                    stream.push(Spanned::new(token, self.token_span()));
                }
                TokenOutcome::BadToken(lexeme) => {
                    if self.preferences.log_bad_tokens {
                        log_error!(codes::lexical::BAD_TOKEN, "Bad token",
                            span = self.token_span(),
                            "lexeme" => to_literal(&lexeme)
                        );
                    }
                    stream.push(Spanned::new(Token::bad(lexeme), self.token_span()));
                }
                TokenOutcome::NoTokenAvailable => {
                    let Some(ch) = self.skip_char() else {
                        break;
                    };
                    self.metrics.unrecognized_chars += 1;
                    if self.preferences.log_bad_tokens {
                        log_error!(codes::lexical::UNRECOGNIZED_CHARACTER,
                            "Unrecognized character",
                            span = self.token_span(),
                            "character" => to_literal(&ch.to_string())
                        );
                    }
                    stream.push(Spanned::new(Token::bad(ch), self.token_span()));
                }
            }
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Lexical analysis completed",
            "tokens" => stream.len(),
            "bad_tokens" => stream.bad_count(),
            "skipped" => self.metrics.skipped_tokens
        );

        Ok(stream)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// One traversal from the entry state, skip categories included
    fn scan(&mut self) -> TokenOutcome {
        let mut state = self.entry;
        let mut lexeme = String::new();
        self.token_start = self.position;

        while !self.machine.state(state).is_dead() {
            let Some(&ch) = self.program.get(self.cursor) else {
                break;
            };

            if state == self.entry {
                lexeme.clear();
                self.token_start = self.position;
            }

            let current = self.machine.state(state);
            match self.machine.transition(state, ch) {
                None if current.is_accepting() && !lexeme.is_empty() => {
                    return self.accept(state, lexeme);
                }
                Some(next) => {
                    self.consume(ch);
                    lexeme.push(ch);
                    state = next;
                }
                None => break,
            }
        }

        if self.machine.state(state).is_accepting() && !lexeme.is_empty() {
            self.accept(state, lexeme)
        } else if state == self.entry {
            TokenOutcome::NoTokenAvailable
        } else {
            self.metrics.total_tokens += 1;
            self.metrics.bad_tokens += 1;
            self.metrics.max_lexeme_length =
                self.metrics.max_lexeme_length.max(lexeme.chars().count());
            TokenOutcome::BadToken(lexeme)
        }
    }

    /// Build the token for an accepting state, applying keyword lookup
    fn accept(&mut self, state: StateId, lexeme: String) -> TokenOutcome {
        let category = self
            .machine
            .state(state)
            .accepted_name()
            .unwrap_or_default();

        if self.preferences.is_skip_category(category) {
            return TokenOutcome::Token(Token::new(lexeme, category));
        }

        let resolved =
            self.keywords
                .resolve(category, &lexeme, &self.preferences.identifier_category);
        let keyword = resolved != category;
        let token = Token::new(lexeme.as_str(), resolved);

        self.metrics.record_token(&token, keyword, &self.preferences);
        TokenOutcome::Token(token)
    }

    fn consume(&mut self, ch: char) {
        self.cursor += 1;
        self.position = self.position.advance(ch);
    }
}
