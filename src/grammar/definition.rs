//! Grammars declared in JSON files
//!
//! A definition names the language and describes its root mode inline.
//! Modes used in more than one place (or recursively) are declared once
//! under `modes` and referred to by name; the name `"self"` in a `contains`
//! list means the containing mode.
//!
//! ```json
//! {
//!   "name": "ini",
//!   "aliases": ["toml"],
//!   "modes": {
//!     "string": { "className": "string", "begin": "\"", "end": "\"" }
//!   },
//!   "illegal": "\\S",
//!   "contains": ["string", { "className": "comment", "begin": ";", "end": "$" }]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::error::{DefinitionError, LoadingError};
use super::types::{Contained, Grammar, Keywords, Language, Mode, ModeId, SubLanguage};

const SELF: &str = "self";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub disable_autodetect: bool,
    #[serde(default)]
    pub modes: BTreeMap<String, ModeDefinition>,
    #[serde(flatten)]
    pub root: ModeDefinition,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModeDefinition {
    pub class_name: Option<String>,
    pub begin: Option<String>,
    pub begin_keywords: Option<String>,
    pub end: Option<String>,
    pub illegal: Option<String>,
    pub lexemes: Option<String>,
    pub keywords: Option<KeywordsDefinition>,
    pub relevance: Option<u32>,
    pub contains: Vec<Reference>,
    pub variants: Vec<ModeDefinition>,
    pub starts: Option<Reference>,
    pub sub_language: Option<SubLanguageDefinition>,
    pub skip: bool,
    pub exclude_begin: bool,
    pub exclude_end: bool,
    pub return_begin: bool,
    pub return_end: bool,
    pub ends_with_parent: bool,
    pub ends_parent: bool,
    pub end_same_as_begin: bool,
}

/// A mode given by name or written out in place.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Named(String),
    Inline(Box<ModeDefinition>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeywordsDefinition {
    Plain(String),
    Classes(BTreeMap<String, String>),
}

/// A single name is fixed; a list (possibly empty) means auto-detection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubLanguageDefinition {
    Fixed(String),
    Auto(Vec<String>),
}

/// Read a grammar definition file.
pub fn load(filename: &Path) -> Result<Language, LoadingError> {
    let content = match std::fs::read_to_string(filename) {
        Ok(content) => content,
        Err(error) => {
            debug!(?error);
            return Err(match error.kind() {
                std::io::ErrorKind::NotFound => LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename: filename.to_path_buf(),
                },
                _ => LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename: filename.to_path_buf(),
                },
            });
        }
    };

    from_str(&content).map_err(|error| LoadingError {
        problem: "Invalid grammar".to_string(),
        details: error.to_string(),
        filename: filename.to_path_buf(),
    })
}

/// Parse a grammar definition.
pub fn from_str(content: &str) -> Result<Language, DefinitionError> {
    let definition: LanguageDefinition = serde_json::from_str(content)?;
    definition.into_language()
}

impl LanguageDefinition {
    pub fn into_language(self) -> Result<Language, DefinitionError> {
        let mut builder = Builder {
            grammar: Grammar::new(Mode::new()),
            names: HashMap::new(),
        };

        // every named mode gets its id up front so that references can run
        // in any direction, cycles included
        for name in self
            .modes
            .keys()
        {
            let id = builder
                .grammar
                .add(Mode::new());
            builder
                .names
                .insert(name.clone(), id);
        }

        for (name, definition) in &self.modes {
            let mode = builder.convert(definition)?;
            let id = builder.names[name];
            builder
                .grammar
                .set(id, mode);
        }

        let root = builder.convert(&self.root)?;
        builder
            .grammar
            .set(ModeId::ROOT, root);

        debug!(
            "Loaded {} with {} mode{}",
            self.name,
            builder
                .grammar
                .len(),
            if builder
                .grammar
                .len()
                == 1
            {
                ""
            } else {
                "s"
            }
        );

        let mut language = Language::new(&self.name, builder.grammar);
        language.aliases = self.aliases;
        language.case_insensitive = self.case_insensitive;
        language.disable_autodetect = self.disable_autodetect;
        Ok(language)
    }
}

struct Builder {
    grammar: Grammar,
    names: HashMap<String, ModeId>,
}

impl Builder {
    fn lookup(&self, name: &str) -> Result<ModeId, DefinitionError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| DefinitionError::UnknownMode(name.to_string()))
    }

    fn reference(&mut self, reference: &Reference) -> Result<ModeId, DefinitionError> {
        match reference {
            Reference::Named(name) => self.lookup(name),
            Reference::Inline(definition) => {
                let mode = self.convert(definition)?;
                Ok(self
                    .grammar
                    .add(mode))
            }
        }
    }

    fn convert(&mut self, definition: &ModeDefinition) -> Result<Mode, DefinitionError> {
        let mut contains = Vec::new();
        for reference in &definition.contains {
            match reference {
                Reference::Named(name) if name == SELF => contains.push(Contained::This),
                _ => contains.push(Contained::Mode(self.reference(reference)?)),
            }
        }

        let mut variants = Vec::new();
        for variant in &definition.variants {
            variants.push(self.convert(variant)?);
        }

        let starts = match &definition.starts {
            Some(reference) => Some(self.reference(reference)?),
            None => None,
        };

        let keywords = definition
            .keywords
            .as_ref()
            .map(|keywords| match keywords {
                KeywordsDefinition::Plain(words) => Keywords::Plain(words.clone()),
                KeywordsDefinition::Classes(classes) => Keywords::Classes(classes.clone()),
            });

        let sub_language = definition
            .sub_language
            .as_ref()
            .map(|sub| match sub {
                SubLanguageDefinition::Fixed(name) => SubLanguage::Fixed(name.clone()),
                SubLanguageDefinition::Auto(names) => SubLanguage::Auto(names.clone()),
            });

        Ok(Mode {
            class_name: definition
                .class_name
                .clone(),
            begin: definition
                .begin
                .clone(),
            begin_keywords: definition
                .begin_keywords
                .clone(),
            end: definition
                .end
                .clone(),
            illegal: definition
                .illegal
                .clone(),
            lexemes: definition
                .lexemes
                .clone(),
            keywords,
            relevance: definition.relevance,
            contains,
            variants,
            starts,
            sub_language,
            skip: definition.skip,
            exclude_begin: definition.exclude_begin,
            exclude_end: definition.exclude_end,
            return_begin: definition.return_begin,
            return_end: definition.return_end,
            ends_with_parent: definition.ends_with_parent,
            ends_parent: definition.ends_parent,
            end_same_as_begin: definition.end_same_as_begin,
        })
    }
}
