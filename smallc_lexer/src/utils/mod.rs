//! Shared source-location types used by the analyzers and the logging layer

pub mod span;

pub use span::{Position, Span, Spanned};
