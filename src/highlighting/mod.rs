//! Highlighting text with a compiled grammar
//!
//! A call walks the input searching for the current mode's terminator
//! pattern. Text between matches accumulates in a buffer; each match either
//! opens a child mode, closes the current mode (and possibly some of its
//! ancestors), or is illegal for the current mode. Whenever the mode changes
//! the buffer is classified, by keyword table or by handing it to an embedded
//! language, and appended to the token stream.

use tracing::debug;

use crate::grammar::Language;
use crate::registry::Registry;

mod classifier;
mod engine;
mod error;
mod stack;
mod token;

pub use classifier::classify;
pub use error::HighlightError;
pub use stack::{Continuation, Frame, Stack};
pub use token::{plain, push_text, push_token, Scope, Token};

/// Settings for a single call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options<'c> {
    /// Treat input matching a mode's illegal pattern as ordinary text.
    pub ignore_illegals: bool,
    /// Resume where an earlier call on the preceding text finished.
    pub continuation: Option<&'c Continuation>,
}

/// The outcome of a highlight call.
#[derive(Debug, Clone)]
pub struct Highlighted {
    /// The language used, or `None` if the text was left unclassified.
    pub language: Option<String>,
    pub relevance: u32,
    pub tokens: Vec<Token>,
    pub continuation: Option<Continuation>,
    /// For auto-detection, the runner up.
    pub second_best: Option<Box<Highlighted>>,
}

impl Highlighted {
    /// The text as a single unclassified token, scoring nothing.
    pub fn verbatim(text: &str) -> Highlighted {
        let mut tokens = Vec::new();
        push_text(&mut tokens, text);

        Highlighted {
            language: None,
            relevance: 0,
            tokens,
            continuation: None,
            second_best: None,
        }
    }

    /// The source text this result was made from.
    pub fn text(&self) -> String {
        plain(&self.tokens)
    }
}

/// Entry point for highlighting. Holds nothing but the registry it resolves
/// language names (including those of embedded sub-languages) against, so
/// one instance can serve any number of calls.
#[derive(Debug, Clone)]
pub struct Highlighter<'r> {
    registry: &'r Registry,
    languages: Option<Vec<String>>,
}

impl<'r> Highlighter<'r> {
    pub fn new(registry: &'r Registry) -> Highlighter<'r> {
        Highlighter {
            registry,
            languages: None,
        }
    }

    /// Restrict auto-detection to these languages when a call doesn't name
    /// its own candidates.
    pub fn with_languages(mut self, names: &[&str]) -> Highlighter<'r> {
        self.languages = Some(
            names
                .iter()
                .map(|name| name.to_string())
                .collect(),
        );
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Highlight text with the named language, starting from its root.
    pub fn highlight(&self, name: &str, text: &str) -> Result<Highlighted, HighlightError> {
        self.highlight_with(name, text, &Options::default())
    }

    pub fn highlight_with(
        &self,
        name: &str,
        text: &str,
        options: &Options,
    ) -> Result<Highlighted, HighlightError> {
        let language = self
            .registry
            .get(name)
            .ok_or_else(|| HighlightError::UnknownLanguage(name.to_string()))?;

        self.highlight_language(language, text, options)
    }

    /// Highlight text with a language that need not be registered. Embedded
    /// sub-languages are still looked up in the registry.
    ///
    /// Illegal input doesn't fail the call; the text comes back unclassified
    /// with no relevance instead.
    pub fn highlight_language(
        &self,
        language: &Language,
        text: &str,
        options: &Options,
    ) -> Result<Highlighted, HighlightError> {
        let grammar = language.compile()?;
        let scanner = engine::Scanner::new(self, language, grammar, options)?;

        match scanner.run(text) {
            Ok(result) => {
                debug!(
                    language = %language.name,
                    relevance = result.relevance,
                    "Highlighted {} byte{}",
                    text.len(),
                    if text.len() == 1 { "" } else { "s" }
                );
                Ok(result)
            }
            Err(HighlightError::IllegalLexeme { mode, lexeme }) => {
                debug!(?mode, ?lexeme, "Illegal lexeme; {} left unclassified", language.name);
                Ok(Highlighted::verbatim(text))
            }
            Err(error) => Err(error),
        }
    }

    /// Highlight the text with every candidate language and keep the one
    /// that scores best.
    pub fn highlight_auto(&self, text: &str) -> Result<Highlighted, HighlightError> {
        self.highlight_among(text, &[])
    }

    /// As [`highlight_auto`](Self::highlight_auto), choosing among the named
    /// languages. An empty list means every candidate.
    pub fn highlight_among(
        &self,
        text: &str,
        names: &[String],
    ) -> Result<Highlighted, HighlightError> {
        let candidates: Vec<&Language> = if !names.is_empty() {
            self.lookup_all(names)
        } else if let Some(languages) = &self.languages {
            self.lookup_all(languages)
        } else {
            self.registry
                .languages()
                .collect()
        };

        let mut best = Highlighted::verbatim(text);
        let mut second = Highlighted::verbatim(text);

        for language in candidates
            .into_iter()
            .filter(|language| !language.disable_autodetect)
        {
            let current = self.highlight_language(language, text, &Options::default())?;

            if current.relevance > best.relevance {
                second = std::mem::replace(&mut best, current);
            } else if current.relevance > second.relevance {
                second = current;
            }
        }

        if second
            .language
            .is_some()
        {
            best.second_best = Some(Box::new(second));
        }

        Ok(best)
    }

    fn lookup_all(&self, names: &[String]) -> Vec<&'r Language> {
        names
            .iter()
            .filter_map(|name| {
                let language = self
                    .registry
                    .get(name);
                if language.is_none() {
                    debug!("Skipping unknown candidate language {}", name);
                }
                language
            })
            .collect()
    }
}
