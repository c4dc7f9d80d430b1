//! Reserved-word table consulted after identifier classification

use crate::automaton::loader::read_table_source;
use crate::automaton::TableError;
use crate::config::compile_time::table_loading::MAX_KEYWORDS;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;
use std::path::Path;

/// Exact lexeme to reserved category, e.g. `while` to `While`.
///
/// Lookup never touches tokenizer state; it only rewrites the category of
/// a token the automaton already classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: HashMap<String, String>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `lexeme,category` lines. The first entry for a lexeme wins;
    /// lines without a category are skipped.
    pub fn parse(source: &str) -> Self {
        let mut table = Self::new();

        for line in source.lines().filter(|line| !line.is_empty()) {
            let mut cells = line.split(',');
            let lexeme = cells.next().unwrap_or_default();
            let category = cells.next().unwrap_or_default();

            if lexeme.is_empty() || category.is_empty() {
                log_debug!("Keyword line skipped", "line" => line);
                continue;
            }

            if !table.insert(lexeme, category) {
                log_debug!("Duplicate keyword ignored", "lexeme" => lexeme);
            }
        }

        table
    }

    /// Load a keyword table, propagating resource failures
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let source = read_table_source(path).map_err(|error| match error {
            TableError::Unreadable { path, message } => {
                TableError::KeywordTableUnreadable { path, message }
            }
            other => other,
        })?;

        let table = Self::parse(&source);
        if table.len() > MAX_KEYWORDS {
            return Err(TableError::TooManyKeywords { count: table.len() });
        }

        log_success!(codes::success::KEYWORDS_LOADED, "Keyword table loaded",
            "table" => path.display(),
            "keywords" => table.len()
        );

        Ok(table)
    }

    /// Load a keyword table; an unreadable resource yields an empty table
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(table) => table,
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "table" => path.display()
                );
                Self::new()
            }
        }
    }

    /// Add an entry unless the lexeme is already present
    pub fn insert(&mut self, lexeme: &str, category: &str) -> bool {
        if self.entries.contains_key(lexeme) {
            return false;
        }
        self.entries
            .insert(lexeme.to_string(), category.to_string());
        true
    }

    pub fn get(&self, lexeme: &str) -> Option<&str> {
        self.entries.get(lexeme).map(String::as_str)
    }

    /// Category after keyword lookup. Only `identifier_category` is ever
    /// rewritten, so resolving an already resolved category is a no-op.
    pub fn resolve<'a>(
        &'a self,
        category: &'a str,
        lexeme: &str,
        identifier_category: &str,
    ) -> &'a str {
        if category != identifier_category {
            return category;
        }
        self.get(lexeme).unwrap_or(category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const KEYWORDS: &str = "while,While\nint,Int\nwhile,Loop\n\nbroken\n,Empty\n";

    #[test]
    fn test_parse_first_duplicate_wins() {
        let table = KeywordTable::parse(KEYWORDS);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("while"), Some("While"));
        assert_eq!(table.get("int"), Some("Int"));
        assert_eq!(table.get("broken"), None);
    }

    #[test]
    fn test_resolve_only_rewrites_identifiers() {
        let table = KeywordTable::parse(KEYWORDS);

        assert_eq!(table.resolve("Identifier", "while", "Identifier"), "While");
        assert_eq!(table.resolve("Identifier", "whilst", "Identifier"), "Identifier");
        assert_eq!(table.resolve("String", "while", "Identifier"), "String");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = KeywordTable::parse("Identifier,Keyword\nint,Int\n");

        let once = table.resolve("Identifier", "int", "Identifier");
        let twice = table.resolve(once, "int", "Identifier");
        assert_eq!(once, "Int");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_try_load_and_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Keyword Table.csv");
        fs::write(&path, "if,If\r\nelse,Else\r\n").unwrap();

        let table = KeywordTable::try_load(&path).unwrap();
        assert_eq!(table.get("else"), Some("Else"));

        let missing = dir.path().join("missing.csv");
        assert_matches!(
            KeywordTable::try_load(&missing),
            Err(TableError::KeywordTableUnreadable { .. })
        );
        assert!(KeywordTable::load(&missing).is_empty());
    }
}
