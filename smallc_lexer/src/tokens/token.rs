//! Token value type and the three-way tokenizer outcome

use serde::{Deserialize, Serialize};
use std::fmt;

/// A consumed lexeme and its category.
///
/// `name` is `None` for a bad token: traversal never reached an accepting state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    lexeme: String,
    name: Option<String>,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            lexeme: lexeme.into(),
            name: Some(name.into()),
        }
    }

    pub fn bad(lexeme: impl Into<String>) -> Self {
        Self {
            lexeme: lexeme.into(),
            name: None,
        }
    }

    /// Token whose category may be absent
    pub fn with_name(lexeme: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            lexeme: lexeme.into(),
            name: name.map(str::to_string),
        }
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_bad(&self) -> bool {
        self.name.is_none()
    }

    /// True when the category equals `category`
    pub fn is(&self, category: &str) -> bool {
        self.name.as_deref() == Some(category)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "({}, {})", self.lexeme, name),
            None => write!(f, "({}, <bad>)", self.lexeme),
        }
    }
}

/// Result of one tokenizer step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// An accepting state was reached
    Token(Token),
    /// Nothing was consumed from the entry state
    NoTokenAvailable,
    /// Traversal stopped in a non-accepting state; carries the partial lexeme
    BadToken(String),
}

impl TokenOutcome {
    pub fn is_token(&self) -> bool {
        matches!(self, TokenOutcome::Token(_))
    }

    /// Collapse into the nullable-category token form; `None` for no token
    pub fn into_token(self) -> Option<Token> {
        match self {
            TokenOutcome::Token(token) => Some(token),
            TokenOutcome::BadToken(lexeme) => Some(Token::bad(lexeme)),
            TokenOutcome::NoTokenAvailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accessors() {
        let token = Token::new("foo", "Identifier");
        assert_eq!(token.lexeme(), "foo");
        assert_eq!(token.name(), Some("Identifier"));
        assert!(token.is("Identifier"));
        assert!(!token.is_bad());
        assert_eq!(token.to_string(), "(foo, Identifier)");

        let bad = Token::bad("\"ab");
        assert!(bad.is_bad());
        assert!(!bad.is("Identifier"));
        assert_eq!(bad.to_string(), "(\"ab, <bad>)");

        assert_eq!(Token::with_name("x", None), Token::bad("x"));
    }

    #[test]
    fn test_outcome_into_token() {
        assert_eq!(
            TokenOutcome::Token(Token::new("a", "Letter")).into_token(),
            Some(Token::new("a", "Letter"))
        );
        assert_eq!(
            TokenOutcome::BadToken("\"a".to_string()).into_token(),
            Some(Token::bad("\"a"))
        );
        assert_eq!(TokenOutcome::NoTokenAvailable.into_token(), None);
        assert!(!TokenOutcome::NoTokenAvailable.is_token());
    }
}
