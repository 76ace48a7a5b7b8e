//! Grammars: the declarative description of a language's lexical structure

pub mod common;
mod definition;
mod error;
mod types;

pub use definition::{
    from_str, load, KeywordsDefinition, LanguageDefinition, ModeDefinition, Reference,
    SubLanguageDefinition,
};
pub use error::{DefinitionError, LoadingError};
pub use types::*;
