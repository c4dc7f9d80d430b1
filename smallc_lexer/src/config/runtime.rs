// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file names of the three table resources
pub const DEFAULT_LEXICAL_TABLE: &str = "Lexical Analyzer Table.csv";
pub const DEFAULT_KEYWORD_TABLE: &str = "Keyword Table.csv";
pub const DEFAULT_PREPROCESSOR_TABLE: &str = "PreProcessor Table.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePreferences {
    /// Directory the table files are resolved against
    pub table_dir: PathBuf,

    /// File name of the lexical analyzer transition table
    pub lexical_table: String,

    /// File name of the keyword table
    pub keyword_table: String,

    /// File name of the preprocessor transition table
    pub preprocessor_table: String,
}

impl TablePreferences {
    /// Preferences rooted at a specific directory, default file names
    pub fn in_dir<P: Into<PathBuf>>(table_dir: P) -> Self {
        Self {
            table_dir: table_dir.into(),
            ..Self::default()
        }
    }

    pub fn lexical_table_path(&self) -> PathBuf {
        self.table_dir.join(&self.lexical_table)
    }

    pub fn keyword_table_path(&self) -> PathBuf {
        self.table_dir.join(&self.keyword_table)
    }

    pub fn preprocessor_table_path(&self) -> PathBuf {
        self.table_dir.join(&self.preprocessor_table)
    }
}

impl Default for TablePreferences {
    fn default() -> Self {
        Self {
            table_dir: env::var(env_vars::TABLE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("tables")),
            lexical_table: env::var(env_vars::LEXICAL_TABLE)
                .unwrap_or_else(|_| DEFAULT_LEXICAL_TABLE.to_string()),
            keyword_table: env::var(env_vars::KEYWORD_TABLE)
                .unwrap_or_else(|_| DEFAULT_KEYWORD_TABLE.to_string()),
            preprocessor_table: env::var(env_vars::PREPROCESSOR_TABLE)
                .unwrap_or_else(|_| DEFAULT_PREPROCESSOR_TABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to enable detailed performance logging (user preference)
    pub enable_performance_logging: bool,

    /// Whether to reject programs that contain only whitespace
    pub reject_empty_programs: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            reject_empty_programs: env::var(env_vars::REJECT_EMPTY_PROGRAMS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Category the DFA assigns to identifiers; only these go through keyword lookup
    pub identifier_category: String,

    /// Categories discarded by the tokenizer instead of being returned
    pub skip_categories: Vec<String>,

    /// Whether to count tokens per category in the metrics
    pub collect_category_counts: bool,

    /// Whether to log every bad token as it is produced
    pub log_bad_tokens: bool,
}

impl LexicalPreferences {
    pub fn is_skip_category(&self, category: &str) -> bool {
        self.skip_categories.iter().any(|c| c == category)
    }
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            identifier_category: env::var(env_vars::LEXICAL_IDENTIFIER_CATEGORY)
                .unwrap_or_else(|_| "Identifier".to_string()),
            skip_categories: env::var(env_vars::LEXICAL_SKIP_CATEGORIES)
                .ok()
                .map(|v| parse_category_list(&v))
                .unwrap_or_else(|| vec!["Line Comment".to_string(), "Block Comment".to_string()]),
            collect_category_counts: env::var(env_vars::LEXICAL_CATEGORY_COUNTS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_bad_tokens: env::var(env_vars::LEXICAL_LOG_BAD_TOKENS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorPreferences {
    /// Category whose lexemes are copied to the rewritten program
    pub passthrough_category: String,

    /// Category whose tokens are reported as warnings
    pub warning_category: String,
}

impl Default for PreprocessorPreferences {
    fn default() -> Self {
        Self {
            passthrough_category: env::var(env_vars::PREPROCESSOR_PASSTHROUGH_CATEGORY)
                .unwrap_or_else(|_| "Add".to_string()),
            warning_category: env::var(env_vars::PREPROCESSOR_WARNING_CATEGORY)
                .unwrap_or_else(|_| "Brace".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            enable_cargo_style_output: env::var(env_vars::LOGGING_CARGO_STYLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_file_context: env::var(env_vars::LOGGING_INCLUDE_FILE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Parse a comma separated category list, e.g. "Line Comment,Block Comment"
fn parse_category_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tables: TablePreferences,
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub preprocessor: PreprocessorPreferences,
    pub logging: LoggingPreferences,
}

/// Preferences file failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read preferences file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid preferences file {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl RuntimeConfig {
    /// Parse TOML preferences. Omitted sections and keys keep their
    /// environment-derived defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&source).map_err(|source| ConfigError::Invalid {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Tables
    pub const TABLE_DIR: &str = "SMALLC_TABLE_DIR";
    pub const LEXICAL_TABLE: &str = "SMALLC_LEXICAL_TABLE";
    pub const KEYWORD_TABLE: &str = "SMALLC_KEYWORD_TABLE";
    pub const PREPROCESSOR_TABLE: &str = "SMALLC_PREPROCESSOR_TABLE";

    // File Processor
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "SMALLC_ENABLE_PERFORMANCE_LOGGING";
    pub const REJECT_EMPTY_PROGRAMS: &str = "SMALLC_REJECT_EMPTY_PROGRAMS";

    // Lexical
    pub const LEXICAL_IDENTIFIER_CATEGORY: &str = "SMALLC_LEXICAL_IDENTIFIER_CATEGORY";
    pub const LEXICAL_SKIP_CATEGORIES: &str = "SMALLC_LEXICAL_SKIP_CATEGORIES";
    pub const LEXICAL_CATEGORY_COUNTS: &str = "SMALLC_LEXICAL_CATEGORY_COUNTS";
    pub const LEXICAL_LOG_BAD_TOKENS: &str = "SMALLC_LEXICAL_LOG_BAD_TOKENS";

    // Preprocessor
    pub const PREPROCESSOR_PASSTHROUGH_CATEGORY: &str = "SMALLC_PREPROCESSOR_PASSTHROUGH";
    pub const PREPROCESSOR_WARNING_CATEGORY: &str = "SMALLC_PREPROCESSOR_WARNING";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SMALLC_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "SMALLC_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "SMALLC_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "SMALLC_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "SMALLC_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_category_list_parsing() {
        assert_eq!(
            parse_category_list(" Line Comment , Block Comment,,"),
            vec!["Line Comment".to_string(), "Block Comment".to_string()]
        );
        assert!(parse_category_list("").is_empty());
    }

    #[test]
    fn test_table_paths() {
        let prefs = TablePreferences {
            table_dir: PathBuf::from("/opt/tables"),
            lexical_table: DEFAULT_LEXICAL_TABLE.to_string(),
            keyword_table: DEFAULT_KEYWORD_TABLE.to_string(),
            preprocessor_table: DEFAULT_PREPROCESSOR_TABLE.to_string(),
        };

        assert_eq!(
            prefs.lexical_table_path(),
            PathBuf::from("/opt/tables/Lexical Analyzer Table.csv")
        );
        assert_eq!(
            prefs.keyword_table_path(),
            PathBuf::from("/opt/tables/Keyword Table.csv")
        );
        assert_eq!(
            prefs.preprocessor_table_path(),
            PathBuf::from("/opt/tables/PreProcessor Table.csv")
        );
    }

    #[test]
    fn test_preferences_from_toml() {
        let config = RuntimeConfig::from_toml_str(
            r#"
[tables]
table_dir = "/opt/tables"

[lexical]
skip_categories = ["Line Comment"]
log_bad_tokens = true

[preprocessor]
warning_category = "Trigraph"

[logging]
min_log_level = "Debug"
"#,
        )
        .unwrap();

        assert_eq!(config.tables.table_dir, PathBuf::from("/opt/tables"));
        assert_eq!(config.lexical.skip_categories, vec!["Line Comment".to_string()]);
        assert!(config.lexical.log_bad_tokens);
        assert_eq!(config.preprocessor.warning_category, "Trigraph");
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_preferences_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = RuntimeConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Unreadable { .. })));

        let path = dir.path().join("bad.toml");
        fs::write(&path, "[lexical]\nlog_bad_tokens = \"sometimes\"\n").unwrap();
        assert!(matches!(
            RuntimeConfig::from_file(&path),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_skip_category_lookup() {
        let prefs = LexicalPreferences {
            identifier_category: "Identifier".to_string(),
            skip_categories: vec!["Line Comment".to_string()],
            collect_category_counts: false,
            log_bad_tokens: false,
        };

        assert!(prefs.is_skip_category("Line Comment"));
        assert!(!prefs.is_skip_category("Identifier"));
    }
}
