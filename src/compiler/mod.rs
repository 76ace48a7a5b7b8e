//! Compiling a declared grammar into its executable form
//!
//! Every mode gets its keyword table flattened, its begin, end and illegal
//! patterns compiled, and a single "terminator" pattern built from the begin
//! patterns of its children, its own end, and its illegal pattern. The
//! highlighter only ever searches for a mode's terminator; which of the
//! alternatives matched is worked out afterwards from the lexeme.

use std::borrow::Cow;
use std::collections::HashMap;

use fancy_regex::Regex;

use crate::grammar::{Contained, Grammar, Keywords, Mode, ModeId, SubLanguage};

mod compose;
mod error;
mod keywords;

pub use compose::compose;
pub use error::CompileError;
pub use keywords::{flatten, KeywordTable};

/// Matches anywhere, consuming nothing. The default begin and end.
const ANYWHERE: &str = r"\B|\b";

/// Default pattern for the candidate words checked against a keyword table.
const LEXEMES: &str = r"\w+";

/// Index of a compiled mode. The root is always `ModeIdx(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeIdx(pub usize);

impl ModeIdx {
    pub const ROOT: ModeIdx = ModeIdx(0);
}

/// A compiled pattern, keeping the text it was built from since the compiler
/// splices sources together when building terminators.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub source: String,
    pub regex: Regex,
}

#[derive(Debug, Clone)]
pub struct CompiledMode {
    pub class_name: Option<String>,
    pub begin: Option<Pattern>,
    pub end: Option<Pattern>,
    pub illegal: Option<Pattern>,
    pub lexemes: Regex,
    /// Search pattern for the next boundary; `None` when there is nothing
    /// that could ever match.
    pub terminators: Option<Regex>,
    /// Source text of the end alternatives, including those inherited from
    /// the parent when this mode ends with it.
    pub terminator_end: String,
    pub keywords: Option<KeywordTable>,
    pub relevance: u32,
    pub contains: Vec<ModeIdx>,
    pub starts: Option<ModeIdx>,
    pub sub_language: Option<SubLanguage>,
    pub begin_keywords: bool,
    pub skip: bool,
    pub exclude_begin: bool,
    pub exclude_end: bool,
    pub return_begin: bool,
    pub return_end: bool,
    pub ends_with_parent: bool,
    pub ends_parent: bool,
    pub end_same_as_begin: bool,
}

/// The executable form of a grammar. Read only once built; many highlight
/// calls can share it.
#[derive(Debug)]
pub struct CompiledGrammar {
    modes: Vec<CompiledMode>,
    case_insensitive: bool,
}

impl CompiledGrammar {
    pub fn root(&self) -> &CompiledMode {
        &self.modes[0]
    }

    pub fn mode(&self, idx: ModeIdx) -> &CompiledMode {
        &self.modes[idx.0]
    }

    pub fn modes(&self) -> &[CompiledMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes
            .is_empty()
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

/// Compile the grammar, starting from its root.
pub fn compile(grammar: &Grammar, case_insensitive: bool) -> Result<CompiledGrammar, CompileError> {
    let mut compiler = Compiler::new(grammar, case_insensitive);

    let root = compiler.lookup(ModeId::ROOT)?;
    compiler.ensure(root, None)?;

    let modes = compiler
        .slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(CompileError::Unresolved(index)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledGrammar {
        modes,
        case_insensitive,
    })
}

struct Compiler<'g> {
    grammar: &'g Grammar,
    case_insensitive: bool,
    /// Compiled modes, `None` while reserved but not yet started.
    slots: Vec<Option<CompiledMode>>,
    /// Reserved modes waiting to be compiled against whichever parent reaches
    /// them first.
    pending: HashMap<ModeIdx, Mode>,
    /// Declared modes already given a slot.
    declared: HashMap<ModeId, ModeIdx>,
    /// Clones made from modes with variants, shared by every position that
    /// contains the base mode.
    variants: HashMap<ModeId, Vec<ModeIdx>>,
}

impl<'g> Compiler<'g> {
    fn new(grammar: &'g Grammar, case_insensitive: bool) -> Compiler<'g> {
        Compiler {
            grammar,
            case_insensitive,
            slots: Vec::new(),
            pending: HashMap::new(),
            declared: HashMap::new(),
            variants: HashMap::new(),
        }
    }

    fn declaration(&self, id: ModeId) -> Result<&'g Mode, CompileError> {
        self.grammar
            .get(id)
            .ok_or(CompileError::DanglingMode(id))
    }

    fn reserve(&mut self, mode: Mode) -> ModeIdx {
        let idx = ModeIdx(
            self.slots
                .len(),
        );
        self.slots
            .push(None);
        self.pending
            .insert(idx, mode);
        idx
    }

    /// The slot of a declared mode, reserving one the first time it is seen.
    fn lookup(&mut self, id: ModeId) -> Result<ModeIdx, CompileError> {
        if let Some(idx) = self
            .declared
            .get(&id)
        {
            return Ok(*idx);
        }

        let mode = self
            .declaration(id)?
            .clone();
        let idx = self.reserve(mode);
        self.declared
            .insert(id, idx);
        Ok(idx)
    }

    /// Compile the mode in this slot unless that has already happened (or is
    /// underway further up the stack).
    fn ensure(&mut self, idx: ModeIdx, parent: Option<ModeIdx>) -> Result<(), CompileError> {
        match self
            .pending
            .remove(&idx)
        {
            Some(mode) => self.compile_mode(idx, mode, parent),
            None => Ok(()),
        }
    }

    /// A `contains` entry can stand for several modes: one per variant, or a
    /// private copy when the mode ends with its parent and so must not be
    /// shared between positions.
    fn expand(&mut self, entry: Contained, this: ModeIdx) -> Result<Vec<ModeIdx>, CompileError> {
        let id = match entry {
            Contained::This => return Ok(vec![this]),
            Contained::Mode(id) => id,
        };

        let mode = self.declaration(id)?;

        if !mode
            .variants
            .is_empty()
        {
            if let Some(cached) = self
                .variants
                .get(&id)
            {
                return Ok(cached.clone());
            }

            let clones = mode
                .variants
                .iter()
                .map(|variant| mode.overlay(variant))
                .collect::<Vec<_>>();
            let clones = clones
                .into_iter()
                .map(|clone| self.reserve(clone))
                .collect::<Vec<_>>();

            self.variants
                .insert(id, clones.clone());
            return Ok(clones);
        }

        if mode.ends_with_parent {
            let clone = mode.clone();
            return Ok(vec![self.reserve(clone)]);
        }

        Ok(vec![self.lookup(id)?])
    }

    fn pattern(&self, source: &str) -> Result<Pattern, CompileError> {
        Ok(Pattern {
            source: source.to_string(),
            regex: self.regex(source)?,
        })
    }

    fn regex(&self, source: &str) -> Result<Regex, CompileError> {
        let flags = if self.case_insensitive { "(?mi)" } else { "(?m)" };

        Regex::new(&format!("{}{}", flags, source)).map_err(|error| CompileError::Pattern {
            pattern: source.to_string(),
            message: error.to_string(),
        })
    }

    fn compile_mode(
        &mut self,
        idx: ModeIdx,
        mode: Mode,
        parent: Option<ModeIdx>,
    ) -> Result<(), CompileError> {
        let keywords = match mode
            .keywords
            .clone()
            .or_else(|| {
                mode.begin_keywords
                    .clone()
                    .map(Keywords::Plain)
            }) {
            Some(keywords) => Some(flatten(&keywords, self.case_insensitive)?),
            None => None,
        };

        let lexemes = self.regex(
            mode.lexemes
                .as_deref()
                .unwrap_or(LEXEMES),
        )?;

        let mut begin = None;
        let mut end = None;
        let mut terminator_end = String::new();

        if let Some(parent) = parent {
            // an empty pattern counts as not declared at all
            let declared_begin = mode
                .begin
                .as_deref()
                .filter(|begin| !begin.is_empty());
            let declared_end = mode
                .end
                .as_deref()
                .filter(|end| !end.is_empty());

            let source: Cow<str> = match (&mode.begin_keywords, declared_begin) {
                (Some(words), _) => Cow::Owned(format!(
                    r"\b({})\b",
                    words
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join("|")
                )),
                (None, Some(begin)) => Cow::Borrowed(begin),
                (None, None) => Cow::Borrowed(ANYWHERE),
            };

            let end_source: Option<Cow<str>> = if mode.end_same_as_begin {
                Some(source.clone())
            } else {
                match declared_end {
                    Some(end) => Some(Cow::Borrowed(end)),
                    None if !mode.ends_with_parent => Some(Cow::Borrowed(ANYWHERE)),
                    None => None,
                }
            };

            begin = Some(self.pattern(&source)?);

            if let Some(end_source) = &end_source {
                end = Some(self.pattern(end_source)?);
                terminator_end.push_str(end_source);
            }

            if mode.ends_with_parent {
                let inherited = self.slot(parent)?;
                if !inherited
                    .terminator_end
                    .is_empty()
                {
                    if end_source.is_some() {
                        terminator_end.push('|');
                    }
                    terminator_end.push_str(&inherited.terminator_end);
                }
            }
        }

        let illegal = match mode
            .illegal
            .as_deref()
            .filter(|illegal| !illegal.is_empty())
        {
            Some(illegal) => Some(self.pattern(illegal)?),
            None => None,
        };

        self.slots[idx.0] = Some(CompiledMode {
            class_name: mode
                .class_name
                .clone()
                .filter(|name| !name.is_empty()),
            begin,
            end,
            illegal,
            lexemes,
            terminators: None,
            terminator_end,
            keywords,
            relevance: mode
                .relevance
                .unwrap_or(1),
            contains: Vec::new(),
            starts: None,
            sub_language: mode
                .sub_language
                .clone(),
            begin_keywords: mode
                .begin_keywords
                .is_some(),
            skip: mode.skip,
            exclude_begin: mode.exclude_begin,
            exclude_end: mode.exclude_end,
            return_begin: mode.return_begin,
            return_end: mode.return_end,
            ends_with_parent: mode.ends_with_parent,
            ends_parent: mode.ends_parent,
            end_same_as_begin: mode.end_same_as_begin,
        });

        // expand everything first, then compile each child against us
        let mut contains = Vec::new();
        for entry in &mode.contains {
            contains.extend(self.expand(*entry, idx)?);
        }
        for child in &contains {
            self.ensure(*child, Some(idx))?;
        }

        // a continuation starts where this mode ends, so it lives in our parent
        let starts = match mode.starts {
            Some(id) => {
                let starts = self.lookup(id)?;
                self.ensure(starts, parent)?;
                Some(starts)
            }
            None => None,
        };

        let terminators = self.terminators(idx, &contains)?;

        let compiled = self.slot_mut(idx)?;
        compiled.contains = contains;
        compiled.starts = starts;
        compiled.terminators = terminators;

        Ok(())
    }

    fn terminators(
        &self,
        idx: ModeIdx,
        contains: &[ModeIdx],
    ) -> Result<Option<Regex>, CompileError> {
        let mut alternatives = Vec::new();

        for child in contains {
            let child = self.slot(*child)?;
            if let Some(begin) = &child.begin {
                if child.begin_keywords {
                    alternatives.push(format!(r"\.?(?:{})\.?", begin.source));
                } else {
                    alternatives.push(
                        begin
                            .source
                            .clone(),
                    );
                }
            }
        }

        let this = self.slot(idx)?;
        alternatives.push(
            this.terminator_end
                .clone(),
        );
        if let Some(illegal) = &this.illegal {
            alternatives.push(
                illegal
                    .source
                    .clone(),
            );
        }

        alternatives.retain(|alternative| !alternative.is_empty());

        if alternatives.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.regex(&compose(&alternatives, "|"))?))
    }

    fn slot(&self, idx: ModeIdx) -> Result<&CompiledMode, CompileError> {
        self.slots
            .get(idx.0)
            .and_then(Option::as_ref)
            .ok_or(CompileError::Unresolved(idx.0))
    }

    fn slot_mut(&mut self, idx: ModeIdx) -> Result<&mut CompiledMode, CompileError> {
        self.slots
            .get_mut(idx.0)
            .and_then(Option::as_mut)
            .ok_or(CompileError::Unresolved(idx.0))
    }
}
