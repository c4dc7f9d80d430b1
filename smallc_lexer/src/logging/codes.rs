//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const EVENT_LIMIT_REACHED: Code = Code::new("W003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Transition and keyword table loading codes
pub mod table_loading {
    use super::Code;

    pub const TABLE_UNREADABLE: Code = Code::new("E060");
    pub const EMPTY_STATE_MACHINE: Code = Code::new("E061");
    pub const DANGLING_TRANSITION: Code = Code::new("W062");
    pub const INVALID_SYMBOL_COLUMN: Code = Code::new("W063");
    pub const DUPLICATE_STATE_ROW: Code = Code::new("W064");
    pub const KEYWORD_TABLE_UNREADABLE: Code = Code::new("E065");
    pub const TABLE_TOO_LARGE: Code = Code::new("E066");
    pub const UNKNOWN_ENTRY_STATE: Code = Code::new("W067");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const BAD_TOKEN: Code = Code::new("E020");
    pub const UNRECOGNIZED_CHARACTER: Code = Code::new("E021");
    pub const LEXEME_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Preprocessor codes
pub mod preprocessor {
    use super::Code;

    pub const ERROR_TOKEN: Code = Code::new("E070");
    pub const WARNING_TOKEN: Code = Code::new("W071");
    pub const PROGRAM_NOT_OPEN: Code = Code::new("E072");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TABLE_LOADED: Code = Code::new("I010");
    pub const KEYWORDS_LOADED: Code = Code::new("I011");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PREPROCESSING_COMPLETE: Code = Code::new("I030");
    pub const PIPELINE_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();
        let mut register = |metadata: ErrorMetadata| {
            registry.insert(metadata.code, metadata);
        };

        // System errors
        register(ErrorMetadata::new(
            "ERR001",
            "System",
            Severity::Critical,
            false,
            true,
            "Critical internal system error",
            "File a bug report with the input that triggered it",
        ));
        register(ErrorMetadata::new(
            "ERR002",
            "System",
            Severity::Critical,
            false,
            true,
            "System initialization failure",
            "Check logging and table configuration",
        ));
        register(ErrorMetadata::new(
            "W003",
            "System",
            Severity::Low,
            true,
            false,
            "Per-file event limit reached; later events dropped",
            "Fix the reported problems and rerun",
        ));

        // File processing errors
        register(ErrorMetadata::new(
            "E005",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "File not found at specified path",
            "Check file path and ensure file exists",
        ));
        register(ErrorMetadata::new(
            "E007",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "File exceeds maximum size limit",
            "Reduce file size or rebuild with a larger profile limit",
        ));
        register(ErrorMetadata::new(
            "E008",
            "FileProcessing",
            Severity::Low,
            true,
            false,
            "Program contains no characters to analyze",
            "Provide a program with content",
        ));
        register(ErrorMetadata::new(
            "E009",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Permission denied accessing file",
            "Check file permissions and user access rights",
        ));
        register(ErrorMetadata::new(
            "E010",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "File is not valid UTF-8",
            "Save the file with a single-byte compatible encoding",
        ));
        register(ErrorMetadata::new(
            "E011",
            "FileProcessing",
            Severity::High,
            false,
            true,
            "I/O error while reading file",
            "Check storage and retry",
        ));
        register(ErrorMetadata::new(
            "E012",
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Path is not a readable file",
            "Provide a path to a regular file",
        ));

        // Table loading errors
        register(ErrorMetadata::new(
            "E060",
            "TableLoading",
            Severity::Critical,
            false,
            true,
            "Transition table resource could not be read",
            "Check the table path and the SMALLC_TABLE_DIR setting",
        ));
        register(ErrorMetadata::new(
            "E061",
            "TableLoading",
            Severity::Critical,
            false,
            true,
            "State machine has no states",
            "Provide a transition table with a header row and at least one state row",
        ));
        register(ErrorMetadata::new(
            "W062",
            "TableLoading",
            Severity::Low,
            true,
            false,
            "Transition names a destination state that does not exist",
            "Fix the destination cell or add the missing state row",
        ));
        register(ErrorMetadata::new(
            "W063",
            "TableLoading",
            Severity::Low,
            true,
            false,
            "Header symbol could not be decoded; column ignored",
            "Use a single character or a 0xHH escape in the header row",
        ));
        register(ErrorMetadata::new(
            "W064",
            "TableLoading",
            Severity::Low,
            true,
            false,
            "State row declared more than once; first occurrence kept",
            "Remove the duplicate state row",
        ));
        register(ErrorMetadata::new(
            "E065",
            "TableLoading",
            Severity::Critical,
            false,
            true,
            "Keyword table resource could not be read",
            "Check the keyword table path",
        ));
        register(ErrorMetadata::new(
            "E066",
            "TableLoading",
            Severity::High,
            false,
            true,
            "Table exceeds compile-time size limits",
            "Split the table or rebuild with a larger profile limit",
        ));
        register(ErrorMetadata::new(
            "W067",
            "TableLoading",
            Severity::Medium,
            true,
            false,
            "Requested entry state is not declared in the table",
            "Use a state name that has a row in the table",
        ));

        // Lexical errors
        register(ErrorMetadata::new(
            "E020",
            "Lexical",
            Severity::Low,
            true,
            false,
            "Input reached a non-accepting state with no transition",
            "Check the program text at the reported position",
        ));
        register(ErrorMetadata::new(
            "E021",
            "Lexical",
            Severity::Low,
            true,
            false,
            "Character cannot start any token",
            "Remove the character or extend the transition table",
        ));
        register(ErrorMetadata::new(
            "E023",
            "Lexical",
            Severity::Low,
            true,
            false,
            "Lexeme longer than the configured maximum",
            "Check for an unterminated literal or comment",
        ));
        register(ErrorMetadata::new(
            "E027",
            "Lexical",
            Severity::High,
            false,
            true,
            "Token count exceeds compile-time limit",
            "Split the program into smaller files",
        ));

        // Preprocessor diagnostics
        register(ErrorMetadata::new(
            "E070",
            "Preprocessor",
            Severity::Low,
            true,
            false,
            "Preprocessor reached a state with no category",
            "Check the program text near the reported lexeme",
        ));
        register(ErrorMetadata::new(
            "W071",
            "Preprocessor",
            Severity::Low,
            true,
            false,
            "Preprocessor flagged a construct as a warning",
            "Review the flagged lexeme",
        ));
        register(ErrorMetadata::new(
            "E072",
            "Preprocessor",
            Severity::Medium,
            true,
            false,
            "No program is open for preprocessing",
            "Open a program before processing",
        ));

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            system::EVENT_LIMIT_REACHED,
            file_processing::FILE_NOT_FOUND,
            file_processing::FILE_TOO_LARGE,
            file_processing::EMPTY_FILE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            table_loading::TABLE_UNREADABLE,
            table_loading::EMPTY_STATE_MACHINE,
            table_loading::DANGLING_TRANSITION,
            table_loading::INVALID_SYMBOL_COLUMN,
            table_loading::DUPLICATE_STATE_ROW,
            table_loading::KEYWORD_TABLE_UNREADABLE,
            table_loading::TABLE_TOO_LARGE,
            table_loading::UNKNOWN_ENTRY_STATE,
            lexical::BAD_TOKEN,
            lexical::UNRECOGNIZED_CHARACTER,
            lexical::LEXEME_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            preprocessor::ERROR_TOKEN,
            preprocessor::WARNING_TOKEN,
            preprocessor::PROGRAM_NOT_OPEN,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_table_errors_are_fatal_but_cells_recover() {
        assert!(requires_halt(table_loading::TABLE_UNREADABLE.as_str()));
        assert!(requires_halt(table_loading::EMPTY_STATE_MACHINE.as_str()));
        assert!(is_recoverable(table_loading::DANGLING_TRANSITION.as_str()));
        assert!(is_recoverable(table_loading::INVALID_SYMBOL_COLUMN.as_str()));
        assert!(!requires_halt(lexical::BAD_TOKEN.as_str()));
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
        assert!(is_recoverable("Z999"));
        assert!(!requires_halt("Z999"));
    }
}
