//! Looking up languages by name or alias

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::grammar::Language;

/// The set of languages available to a highlighter, including those embedded
/// inside other languages. Names and aliases are matched without regard to
/// case.
#[derive(Debug, Default)]
pub struct Registry {
    languages: BTreeMap<String, Language>,
    aliases: HashMap<String, String>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Add a language, replacing any already registered under the same name.
    pub fn register(&mut self, language: Language) {
        let name = language
            .name
            .to_lowercase();

        for alias in &language.aliases {
            self.aliases
                .insert(alias.to_lowercase(), name.clone());
        }

        debug!(
            "Registered {}{}",
            name,
            if language
                .aliases
                .is_empty()
            {
                String::new()
            } else {
                format!(
                    " (aliases {})",
                    language
                        .aliases
                        .join(", ")
                )
            }
        );

        self.languages
            .insert(name, language);
    }

    pub fn get(&self, name: &str) -> Option<&Language> {
        let name = name.to_lowercase();

        match self
            .languages
            .get(&name)
        {
            Some(language) => Some(language),
            None => self
                .aliases
                .get(&name)
                .and_then(|canonical| {
                    self.languages
                        .get(canonical)
                }),
        }
    }

    /// Registered languages, ordered by name.
    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.languages
            .values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.languages
            .keys()
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.languages
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages
            .is_empty()
    }
}
