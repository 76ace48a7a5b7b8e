//! Flattening keyword declarations into a lookup table

use std::collections::HashMap;

use crate::compiler::CompileError;
use crate::grammar::Keywords;

/// Keywords of one mode, keyed by lexeme. Lexemes are stored lower-cased if
/// the language is case insensitive; callers fold before looking up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: HashMap<String, (String, u32)>,
}

impl KeywordTable {
    /// The class and relevance weight of the given lexeme, if it is a
    /// keyword.
    pub fn lookup(&self, lexeme: &str) -> Option<(&str, u32)> {
        self.entries
            .get(lexeme)
            .map(|(class, weight)| (class.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .is_empty()
    }

    fn insert(
        &mut self,
        class: &str,
        words: &str,
        case_insensitive: bool,
    ) -> Result<(), CompileError> {
        let words = if case_insensitive {
            words.to_lowercase()
        } else {
            words.to_string()
        };

        for word in words.split_whitespace() {
            let (lexeme, weight) = match word.split_once('|') {
                Some((lexeme, "")) => (lexeme, 1),
                Some((lexeme, weight)) => {
                    let weight = weight
                        .parse::<u32>()
                        .map_err(|_| CompileError::KeywordWeight {
                            keyword: word.to_string(),
                        })?;
                    (lexeme, weight)
                }
                None => (word, 1),
            };

            self.entries
                .insert(lexeme.to_string(), (class.to_string(), weight));
        }

        Ok(())
    }
}

/// Build the lookup table for a keyword declaration. A plain list is
/// classified as "keyword"; a per-class declaration uses its keys.
pub fn flatten(keywords: &Keywords, case_insensitive: bool) -> Result<KeywordTable, CompileError> {
    let mut table = KeywordTable::default();

    match keywords {
        Keywords::Plain(words) => {
            table.insert("keyword", words, case_insensitive)?;
        }
        Keywords::Classes(classes) => {
            for (class, words) in classes {
                table.insert(class, words, case_insensitive)?;
            }
        }
    }

    Ok(table)
}
