//! Implementation of the template language.
//!
//! Includes the parser and runtime.
pub mod expression;
pub mod op;
pub mod program;
pub mod statement;
pub mod term;

pub use expression::Expression;
pub use op::Op;
pub use program::Program;
pub use statement::Statement;
pub use term::Term;

/// How deep blocks, brackets and unary operators can nest. Parsing
/// recurses once per level, so templates from untrusted sources must be bounded.
pub const MAX_DEPTH: usize = 64;
