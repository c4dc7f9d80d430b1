//! Token values and token streams
//!
//! A [`Token`] pairs a lexeme with the category name of the accepting state
//! that produced it. The category is absent for a bad token. Categories are
//! plain strings taken from the transition and keyword tables; no category
//! is known to the code ahead of time.
//!
//! [`TokenOutcome`] distinguishes the three results of a single tokenizer
//! step, and [`TokenStream`] holds the tokens of a whole program in source
//! order.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenOutcome};
pub use token_stream::{SpannedToken, TokenStream};
