//! Syntax highlighting driven by grammars of nested lexical modes.
//!
//! A [`Language`](grammar::Language) describes its lexical structure as a
//! tree of modes: regions delimited by begin and end patterns, carrying a
//! class name, keywords, and the modes allowed inside them. The
//! [`Highlighter`](highlighting::Highlighter) scans text with the compiled
//! form of that tree, producing a stream of classified tokens and a
//! relevance score that is used to guess the language of unlabelled text.

pub mod compiler;
pub mod grammar;
pub mod highlighting;
pub mod output;
mod regex;
pub mod registry;
pub mod rendering;
