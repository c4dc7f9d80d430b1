//! Preprocessing pass
//!
//! Runs the program through its own transition table before lexing. Tokens
//! in the passthrough category are copied to the output text, tokens in the
//! warning category and bad tokens are collected as diagnostics, and every
//! other category is dropped. The output text is what the lexical analyzer
//! sees.

mod processor;

pub use processor::{PreProcessor, PreProcessorResponse, PreprocessorError};
