// Internal modules
pub mod automaton;
pub mod config;
pub mod conversions;
pub mod file_processor;
pub mod keywords;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod preprocessor;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use automaton::{StateMachine, TableError, TransitionTableLoader};
pub use keywords::KeywordTable;
pub use lexical::{LexerError, LexicalAnalyzer};
pub use pipeline::{Pipeline, PipelineError, PipelineResult};
pub use preprocessor::{PreProcessor, PreProcessorResponse, PreprocessorError};
pub use tokens::{Token, TokenOutcome, TokenStream};
