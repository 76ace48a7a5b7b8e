//! Types describing a language's lexical structure as it is authored

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::compiler::{self, CompileError, CompiledGrammar};

/// Index of a Mode within its Grammar. The root is always `ModeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeId(pub usize);

impl ModeId {
    pub const ROOT: ModeId = ModeId(0);
}

/// An entry in a Mode's `contains` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contained {
    /// The containing mode itself, for recursive structures such as nested
    /// brackets.
    This,
    Mode(ModeId),
}

/// Keyword declarations. Each word list is space separated, with an optional
/// `|N` suffix giving the word's relevance weight, as in `"if|2 else"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keywords {
    /// A single list, classified as "keyword".
    Plain(String),
    /// Lists keyed by the class name their words are classified as.
    Classes(BTreeMap<String, String>),
}

/// The embedded grammar used to highlight a mode's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubLanguage {
    /// Always the named language.
    Fixed(String),
    /// Whichever of these languages scores best; all registered languages if
    /// the list is empty.
    Auto(Vec<String>),
}

/// A lexical region declaration. Everything is optional; the compiler fills
/// in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mode {
    pub class_name: Option<String>,
    pub begin: Option<String>,
    pub begin_keywords: Option<String>,
    pub end: Option<String>,
    pub illegal: Option<String>,
    pub lexemes: Option<String>,
    pub keywords: Option<Keywords>,
    pub relevance: Option<u32>,
    pub contains: Vec<Contained>,
    pub variants: Vec<Mode>,
    pub starts: Option<ModeId>,
    pub sub_language: Option<SubLanguage>,
    pub skip: bool,
    pub exclude_begin: bool,
    pub exclude_end: bool,
    pub return_begin: bool,
    pub return_end: bool,
    pub ends_with_parent: bool,
    pub ends_parent: bool,
    pub end_same_as_begin: bool,
}

impl Mode {
    pub fn new() -> Mode {
        Mode::default()
    }

    pub fn class(mut self, name: &str) -> Mode {
        self.class_name = Some(name.to_string());
        self
    }

    pub fn begin(mut self, pattern: &str) -> Mode {
        self.begin = Some(pattern.to_string());
        self
    }

    pub fn begin_keywords(mut self, words: &str) -> Mode {
        self.begin_keywords = Some(words.to_string());
        self
    }

    pub fn end(mut self, pattern: &str) -> Mode {
        self.end = Some(pattern.to_string());
        self
    }

    pub fn illegal(mut self, pattern: &str) -> Mode {
        self.illegal = Some(pattern.to_string());
        self
    }

    pub fn lexemes(mut self, pattern: &str) -> Mode {
        self.lexemes = Some(pattern.to_string());
        self
    }

    pub fn keywords(mut self, words: &str) -> Mode {
        self.keywords = Some(Keywords::Plain(words.to_string()));
        self
    }

    /// Add a word list for the given class, alongside any already declared.
    pub fn keywords_for(mut self, class: &str, words: &str) -> Mode {
        let mut classes = match self.keywords {
            Some(Keywords::Classes(classes)) => classes,
            Some(Keywords::Plain(plain)) => BTreeMap::from([("keyword".to_string(), plain)]),
            None => BTreeMap::new(),
        };
        classes.insert(class.to_string(), words.to_string());
        self.keywords = Some(Keywords::Classes(classes));
        self
    }

    pub fn relevance(mut self, relevance: u32) -> Mode {
        self.relevance = Some(relevance);
        self
    }

    pub fn contains(mut self, contains: Vec<Contained>) -> Mode {
        self.contains = contains;
        self
    }

    pub fn variants(mut self, variants: Vec<Mode>) -> Mode {
        self.variants = variants;
        self
    }

    pub fn starts(mut self, mode: ModeId) -> Mode {
        self.starts = Some(mode);
        self
    }

    pub fn sub_language(mut self, name: &str) -> Mode {
        self.sub_language = Some(SubLanguage::Fixed(name.to_string()));
        self
    }

    pub fn auto_language(mut self, names: &[&str]) -> Mode {
        self.sub_language = Some(SubLanguage::Auto(
            names
                .iter()
                .map(|name| name.to_string())
                .collect(),
        ));
        self
    }

    pub fn skip(mut self) -> Mode {
        self.skip = true;
        self
    }

    pub fn exclude_begin(mut self) -> Mode {
        self.exclude_begin = true;
        self
    }

    pub fn exclude_end(mut self) -> Mode {
        self.exclude_end = true;
        self
    }

    pub fn return_begin(mut self) -> Mode {
        self.return_begin = true;
        self
    }

    pub fn return_end(mut self) -> Mode {
        self.return_end = true;
        self
    }

    pub fn ends_with_parent(mut self) -> Mode {
        self.ends_with_parent = true;
        self
    }

    pub fn ends_parent(mut self) -> Mode {
        self.ends_parent = true;
        self
    }

    pub fn end_same_as_begin(mut self) -> Mode {
        self.end_same_as_begin = true;
        self
    }

    /// Produce a copy of this mode with the variant laid over it. Fields the
    /// variant declares win; flags set on either side stay set. The result
    /// never has variants of its own.
    pub fn overlay(&self, variant: &Mode) -> Mode {
        Mode {
            class_name: variant
                .class_name
                .clone()
                .or_else(|| self.class_name.clone()),
            begin: variant
                .begin
                .clone()
                .or_else(|| self.begin.clone()),
            begin_keywords: variant
                .begin_keywords
                .clone()
                .or_else(|| self.begin_keywords.clone()),
            end: variant
                .end
                .clone()
                .or_else(|| self.end.clone()),
            illegal: variant
                .illegal
                .clone()
                .or_else(|| self.illegal.clone()),
            lexemes: variant
                .lexemes
                .clone()
                .or_else(|| self.lexemes.clone()),
            keywords: variant
                .keywords
                .clone()
                .or_else(|| self.keywords.clone()),
            relevance: variant
                .relevance
                .or(self.relevance),
            contains: if variant
                .contains
                .is_empty()
            {
                self.contains
                    .clone()
            } else {
                variant
                    .contains
                    .clone()
            },
            variants: Vec::new(),
            starts: variant
                .starts
                .or(self.starts),
            sub_language: variant
                .sub_language
                .clone()
                .or_else(|| self.sub_language.clone()),
            skip: self.skip || variant.skip,
            exclude_begin: self.exclude_begin || variant.exclude_begin,
            exclude_end: self.exclude_end || variant.exclude_end,
            return_begin: self.return_begin || variant.return_begin,
            return_end: self.return_end || variant.return_end,
            ends_with_parent: self.ends_with_parent || variant.ends_with_parent,
            ends_parent: self.ends_parent || variant.ends_parent,
            end_same_as_begin: self.end_same_as_begin || variant.end_same_as_begin,
        }
    }
}

/// An arena of Mode declarations. Modes refer to each other by `ModeId`, so
/// a mode may be shared by several parents or contain one of its own
/// ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    modes: Vec<Mode>,
}

impl Grammar {
    pub fn new(root: Mode) -> Grammar {
        Grammar { modes: vec![root] }
    }

    pub fn add(&mut self, mode: Mode) -> ModeId {
        let id = ModeId(
            self.modes
                .len(),
        );
        self.modes
            .push(mode);
        id
    }

    /// Replace a previously added mode. Used to close reference cycles: add a
    /// placeholder, hand its id out, then fill it in.
    pub fn set(&mut self, id: ModeId, mode: Mode) {
        if let Some(slot) = self
            .modes
            .get_mut(id.0)
        {
            *slot = mode;
        }
    }

    pub fn get(&self, id: ModeId) -> Option<&Mode> {
        self.modes
            .get(id.0)
    }

    pub fn get_mut(&mut self, id: ModeId) -> Option<&mut Mode> {
        self.modes
            .get_mut(id.0)
    }

    pub fn root(&self) -> &Mode {
        &self.modes[0]
    }

    pub fn root_mut(&mut self) -> &mut Mode {
        &mut self.modes[0]
    }

    pub fn len(&self) -> usize {
        self.modes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes
            .is_empty()
    }
}

/// A named grammar, compiled on first use.
#[derive(Debug)]
pub struct Language {
    pub name: String,
    pub aliases: Vec<String>,
    pub case_insensitive: bool,
    pub disable_autodetect: bool,
    pub grammar: Grammar,
    compiled: OnceLock<CompiledGrammar>,
}

impl Language {
    pub fn new(name: &str, grammar: Grammar) -> Language {
        Language {
            name: name.to_string(),
            aliases: Vec::new(),
            case_insensitive: false,
            disable_autodetect: false,
            grammar,
            compiled: OnceLock::new(),
        }
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Language {
        self.aliases = aliases
            .iter()
            .map(|alias| alias.to_string())
            .collect();
        self
    }

    pub fn case_insensitive(mut self) -> Language {
        self.case_insensitive = true;
        self
    }

    pub fn disable_autodetect(mut self) -> Language {
        self.disable_autodetect = true;
        self
    }

    /// Compile the grammar if that hasn't happened yet, and return the
    /// executable form. Calling this again returns the same compiled grammar
    /// without doing any work.
    pub fn compile(&self) -> Result<&CompiledGrammar, CompileError> {
        if let Some(compiled) = self
            .compiled
            .get()
        {
            return Ok(compiled);
        }

        let compiled = compiler::compile(&self.grammar, self.case_insensitive)?;
        debug!(
            "Compiled {} into {} mode{}",
            self.name,
            compiled.len(),
            if compiled.len() == 1 { "" } else { "s" }
        );

        // if another thread got there first, theirs is kept and ours dropped
        Ok(self
            .compiled
            .get_or_init(|| compiled))
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
            .get()
            .is_some()
    }
}
