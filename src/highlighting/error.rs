use std::fmt;

use crate::compiler::CompileError;

/// Reasons a highlight call can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// No language is registered under this name or alias.
    UnknownLanguage(String),
    /// Input matched the illegal pattern of the active mode. Top level calls
    /// recover from this by returning the input unclassified.
    IllegalLexeme { mode: String, lexeme: String },
    /// The grammar could not be compiled.
    MalformedGrammar(CompileError),
    /// The pattern engine gave up while matching, typically on hitting its
    /// backtracking limit.
    Regex(String),
    /// A continuation saved by one language was handed to another.
    ForeignContinuation { expected: String, found: String },
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightError::UnknownLanguage(name) => write!(f, "Unknown language: \"{}\"", name),
            HighlightError::IllegalLexeme { mode, lexeme } => {
                write!(f, "Illegal lexeme \"{}\" for mode \"{}\"", lexeme, mode)
            }
            HighlightError::MalformedGrammar(error) => write!(f, "Malformed grammar: {}", error),
            HighlightError::Regex(message) => write!(f, "Pattern failed to match: {}", message),
            HighlightError::ForeignContinuation { expected, found } => write!(
                f,
                "Continuation from \"{}\" cannot resume \"{}\"",
                found, expected
            ),
        }
    }
}

impl std::error::Error for HighlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HighlightError::MalformedGrammar(error) => Some(error),
            _ => None,
        }
    }
}

impl From<CompileError> for HighlightError {
    fn from(error: CompileError) -> Self {
        HighlightError::MalformedGrammar(error)
    }
}

impl From<fancy_regex::Error> for HighlightError {
    fn from(error: fancy_regex::Error) -> Self {
        HighlightError::Regex(error.to_string())
    }
}
