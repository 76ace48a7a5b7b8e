use std::fmt;

use crate::grammar::ModeId;

/// A grammar that is structurally inconsistent and cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A begin, end, illegal, lexeme or terminator pattern was rejected by the
    /// regular expression engine.
    Pattern { pattern: String, message: String },
    /// A keyword carried a `|` suffix that isn't a number.
    KeywordWeight { keyword: String },
    /// A `contains` or `starts` entry refers outside the grammar.
    DanglingMode(ModeId),
    /// A mode was reserved during compilation but never filled in.
    Unresolved(usize),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Pattern { pattern, message } => {
                write!(f, "invalid pattern /{}/: {}", pattern, message)
            }
            CompileError::KeywordWeight { keyword } => {
                write!(f, "invalid relevance weight in keyword \"{}\"", keyword)
            }
            CompileError::DanglingMode(id) => {
                write!(f, "reference to mode {} which is not in the grammar", id.0)
            }
            CompileError::Unresolved(index) => {
                write!(f, "compiled mode {} was never resolved", index)
            }
        }
    }
}

impl std::error::Error for CompileError {}
