//! Ordered token sequence produced by one tokenizer run

use crate::tokens::token::Token;
use crate::utils::Spanned;
use std::collections::BTreeMap;

/// A token with the span of its lexeme
pub type SpannedToken = Spanned<Token>;

/// Tokens in source order, bad tokens included, with a read cursor
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn push(&mut self, token: SpannedToken) {
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpannedToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    pub fn current(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.position)
    }

    pub fn peek(&self, offset: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.position + offset)
    }

    /// Return the current token and move past it
    pub fn advance(&mut self) -> Option<&SpannedToken> {
        let index = self.position;
        if index < self.tokens.len() {
            self.position += 1;
        }
        self.tokens.get(index)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn bad_tokens(&self) -> impl Iterator<Item = &SpannedToken> {
        self.tokens.iter().filter(|t| t.value.is_bad())
    }

    pub fn bad_count(&self) -> usize {
        self.bad_tokens().count()
    }

    pub fn good_count(&self) -> usize {
        self.len() - self.bad_count()
    }

    /// Tokens whose category is `category`
    pub fn with_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a SpannedToken> + 'a {
        self.tokens.iter().filter(move |t| t.value.is(category))
    }

    /// Occurrences per category; bad tokens are not counted
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for name in self.tokens.iter().filter_map(|t| t.value.name()) {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a SpannedToken;
    type IntoIter = std::slice::Iter<'a, SpannedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    fn spanned(token: Token, start: usize, end: usize) -> SpannedToken {
        Spanned::new(
            token,
            Span::new(
                Position::new(start, 1, start as u32 + 1),
                Position::new(end, 1, end as u32 + 1),
            ),
        )
    }

    fn sample() -> TokenStream {
        TokenStream::new(vec![
            spanned(Token::new("int", "Keyword"), 0, 3),
            spanned(Token::new("x", "Identifier"), 4, 5),
            spanned(Token::bad("@"), 5, 6),
            spanned(Token::new("y", "Identifier"), 6, 7),
        ])
    }

    #[test]
    fn test_cursor_navigation() {
        let mut stream = sample();

        assert_eq!(stream.current().map(|t| t.value.lexeme()), Some("int"));
        assert_eq!(stream.peek(1).map(|t| t.value.lexeme()), Some("x"));
        assert_eq!(stream.advance().map(|t| t.value.lexeme()), Some("int"));
        assert_eq!(stream.current().map(|t| t.value.lexeme()), Some("x"));

        while stream.advance().is_some() {}
        assert!(stream.is_at_end());
        assert!(stream.current().is_none());

        stream.reset();
        assert!(!stream.is_at_end());
    }

    #[test]
    fn test_counts() {
        let stream = sample();

        assert_eq!(stream.len(), 4);
        assert_eq!(stream.bad_count(), 1);
        assert_eq!(stream.good_count(), 3);
        assert_eq!(stream.with_category("Identifier").count(), 2);

        let counts = stream.category_counts();
        assert_eq!(counts.get("Identifier"), Some(&2));
        assert_eq!(counts.get("Keyword"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_empty_stream() {
        let mut stream = TokenStream::default();
        assert!(stream.is_empty());
        assert!(stream.is_at_end());
        assert!(stream.advance().is_none());
    }
}
