//! The scanning state machine behind a single highlight call

use std::collections::HashMap;
use std::sync::Arc;

use fancy_regex::{Match, Regex};
use tracing::debug;

use crate::compiler::{CompiledGrammar, CompiledMode, ModeIdx};
use crate::grammar::{Language, SubLanguage};
use crate::highlighting::classifier::{char_width, classify};
use crate::highlighting::stack::{Continuation, Frame, Stack};
use crate::highlighting::token::{push_text, push_token, Scope, Token};
use crate::highlighting::{HighlightError, Highlighted, Highlighter, Options};

/// Find a match of the pattern that starts at the very beginning of the
/// lexeme.
fn match_at_start<'t>(regex: &Regex, lexeme: &'t str) -> Result<Option<Match<'t>>, HighlightError> {
    Ok(regex
        .find(lexeme)?
        .filter(|found| found.start() == 0))
}

/// A pattern matching exactly this text and nothing else.
fn literal(text: &str) -> Result<Regex, HighlightError> {
    Regex::new(&format!("(?m){}", fancy_regex::escape(text)))
        .map_err(|error| HighlightError::Regex(error.to_string()))
}

/// Per call state. Nothing here is shared with any other call, so any number
/// of these can run against the same compiled grammar at once.
pub(crate) struct Scanner<'a> {
    highlighter: &'a Highlighter<'a>,
    language: &'a Language,
    grammar: &'a CompiledGrammar,
    stack: Stack,
    buffer: String,
    relevance: u32,
    tokens: Vec<Token>,
    /// Where each explicitly named sub-language left off, so its next chunk
    /// resumes rather than starting over.
    continuations: HashMap<String, Continuation>,
    ignore_illegals: bool,
    /// Offset of the previous lexeme, if it opened a mode.
    entered: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(
        highlighter: &'a Highlighter<'a>,
        language: &'a Language,
        grammar: &'a CompiledGrammar,
        options: &Options,
    ) -> Result<Scanner<'a>, HighlightError> {
        let stack = match options.continuation {
            Some(continuation) if continuation.language != language.name => {
                return Err(HighlightError::ForeignContinuation {
                    expected: language
                        .name
                        .clone(),
                    found: continuation
                        .language
                        .clone(),
                })
            }
            Some(continuation) => continuation
                .stack
                .clone(),
            None => Stack::new(),
        };

        Ok(Scanner {
            highlighter,
            language,
            grammar,
            stack,
            buffer: String::new(),
            relevance: 0,
            tokens: Vec::new(),
            continuations: HashMap::new(),
            ignore_illegals: options.ignore_illegals,
            entered: None,
        })
    }

    fn mode(&self, idx: ModeIdx) -> &'a CompiledMode {
        self.grammar
            .mode(idx)
    }

    fn top(&self) -> &'a CompiledMode {
        self.mode(
            self.stack
                .current()
                .mode,
        )
    }

    pub(crate) fn run(mut self, text: &str) -> Result<Highlighted, HighlightError> {
        // re-open the regions a continuation left us inside
        for frame in self
            .stack
            .open()
        {
            if let Some(class) = &self
                .mode(frame.mode)
                .class_name
            {
                self.tokens
                    .push(Token::Begin(Scope::Class(class.clone())));
            }
        }

        let mut index = 0;
        while index <= text.len() {
            let terminators = match &self
                .top()
                .terminators
            {
                Some(terminators) => terminators,
                None => break,
            };

            let found = match terminators.find_from_pos(text, index)? {
                Some(found) => found,
                None => break,
            };

            let count = self.process_lexeme(
                &text[index..found.start()],
                found.as_str(),
                text,
                found.start(),
            )?;
            index = found.start() + count;
        }

        if let Some(rest) = text.get(index..) {
            self.buffer
                .push_str(rest);
        }
        self.flush()?;

        // close whatever is still open
        for frame in self
            .stack
            .open()
            .rev()
        {
            if let Some(class) = &self
                .mode(frame.mode)
                .class_name
            {
                self.tokens
                    .push(Token::End(Scope::Class(class.clone())));
            }
        }

        Ok(Highlighted {
            language: Some(
                self.language
                    .name
                    .clone(),
            ),
            relevance: self.relevance,
            tokens: self.tokens,
            continuation: Some(Continuation {
                language: self
                    .language
                    .name
                    .clone(),
                stack: self.stack,
            }),
            second_best: None,
        })
    }

    /// Deal with the text up to a terminator match and the matched lexeme
    /// itself. Returns how far past the start of the lexeme to continue.
    fn process_lexeme(
        &mut self,
        before: &str,
        lexeme: &str,
        text: &str,
        offset: usize,
    ) -> Result<usize, HighlightError> {
        self.buffer
            .push_str(before);

        let entered = self
            .entered
            .take();

        // a mode entered here without consuming anything must not be entered
        // or left again at the same spot, or we would go round forever
        let stalled = lexeme.is_empty() && entered == Some(offset);

        if let Some((child, end)) = self.sub_mode(lexeme)? {
            if stalled {
                return Ok(self.step_over(text, offset));
            }
            self.entered = Some(offset);
            return self.enter(child, end, lexeme);
        }

        if let Some(depth) = self.end_of_mode(lexeme)? {
            if stalled {
                return Ok(self.step_over(text, offset));
            }
            return self.leave(depth, lexeme);
        }

        let top = self.top();
        if !self.ignore_illegals {
            if let Some(illegal) = &top.illegal {
                if match_at_start(&illegal.regex, lexeme)?.is_some() {
                    return Err(HighlightError::IllegalLexeme {
                        mode: top
                            .class_name
                            .clone()
                            .unwrap_or_else(|| "<unnamed>".to_string()),
                        lexeme: lexeme.to_string(),
                    });
                }
            }
        }

        // only reachable with a grammar whose terminators and begin/end
        // patterns disagree; make sure we still move forward
        self.buffer
            .push_str(lexeme);
        if lexeme.is_empty() {
            Ok(char_width(text, offset))
        } else {
            Ok(lexeme.len())
        }
    }

    /// Move the character at offset into the buffer untouched.
    fn step_over(&mut self, text: &str, offset: usize) -> usize {
        let width = char_width(text, offset);
        if let Some(skipped) = text.get(offset..offset + width) {
            self.buffer
                .push_str(skipped);
        }
        width
    }

    /// The first child of the current mode whose begin pattern matches at the
    /// start of the lexeme.
    fn sub_mode(&self, lexeme: &str) -> Result<Option<(ModeIdx, Option<Arc<Regex>>)>, HighlightError> {
        for child in &self
            .top()
            .contains
        {
            let mode = self.mode(*child);
            let begin = match &mode.begin {
                Some(begin) => begin,
                None => continue,
            };

            if let Some(found) = match_at_start(&begin.regex, lexeme)? {
                let end = if mode.end_same_as_begin {
                    Some(Arc::new(literal(found.as_str())?))
                } else {
                    None
                };
                return Ok(Some((*child, end)));
            }
        }

        Ok(None)
    }

    /// Depth of the frame that the lexeme ends: the current one, or an
    /// ancestor reached through modes that end with their parent.
    fn end_of_mode(&self, lexeme: &str) -> Result<Option<usize>, HighlightError> {
        let mut depth = self
            .stack
            .depth();

        while let Some(frame) = self
            .stack
            .get(depth)
        {
            let mode = self.mode(frame.mode);
            let end = match &frame.end {
                Some(end) => Some(end.as_ref()),
                None => mode
                    .end
                    .as_ref()
                    .map(|end| &end.regex),
            };

            if let Some(end) = end {
                if match_at_start(end, lexeme)?.is_some() {
                    while depth > 1 && self.ends_parent(depth) {
                        depth -= 1;
                    }
                    return Ok(Some(depth));
                }
            }

            if mode.ends_with_parent && depth > 0 {
                depth -= 1;
            } else {
                break;
            }
        }

        Ok(None)
    }

    fn ends_parent(&self, depth: usize) -> bool {
        self.stack
            .get(depth)
            .map(|frame| {
                self.mode(frame.mode)
                    .ends_parent
            })
            .unwrap_or(false)
    }

    fn enter(
        &mut self,
        child: ModeIdx,
        end: Option<Arc<Regex>>,
        lexeme: &str,
    ) -> Result<usize, HighlightError> {
        let mode = self.mode(child);

        if mode.skip {
            self.buffer
                .push_str(lexeme);
        } else {
            if mode.exclude_begin {
                self.buffer
                    .push_str(lexeme);
            }
            self.flush()?;
            if !mode.return_begin && !mode.exclude_begin {
                self.buffer = lexeme.to_string();
            }
        }

        self.start(child, end);

        Ok(if mode.return_begin { 0 } else { lexeme.len() })
    }

    fn start(&mut self, idx: ModeIdx, end: Option<Arc<Regex>>) {
        if let Some(class) = &self
            .mode(idx)
            .class_name
        {
            self.tokens
                .push(Token::Begin(Scope::Class(class.clone())));
        }
        self.stack
            .push(Frame { mode: idx, end });
    }

    fn leave(&mut self, depth: usize, lexeme: &str) -> Result<usize, HighlightError> {
        let origin = self.top();

        if origin.skip {
            self.buffer
                .push_str(lexeme);
        } else {
            if !(origin.return_end || origin.exclude_end) {
                self.buffer
                    .push_str(lexeme);
            }
            self.flush()?;
            if origin.exclude_end {
                self.buffer = lexeme.to_string();
            }
        }

        let ended = match self
            .stack
            .get(depth)
        {
            Some(frame) => frame.clone(),
            None => return Ok(lexeme.len()),
        };

        while self
            .stack
            .depth()
            >= depth
        {
            let frame = match self
                .stack
                .pop()
            {
                Some(frame) => frame,
                None => break,
            };
            let mode = self.mode(frame.mode);

            if let Some(class) = &mode.class_name {
                self.tokens
                    .push(Token::End(Scope::Class(class.clone())));
            }
            if !mode.skip && mode.sub_language.is_none() {
                self.relevance = self
                    .relevance
                    .saturating_add(mode.relevance);
            }
        }

        let mode = self.mode(ended.mode);
        if let Some(starts) = mode.starts {
            let end = if mode.end_same_as_begin {
                ended
                    .end
                    .clone()
                    .or_else(|| {
                        mode.end
                            .as_ref()
                            .map(|end| Arc::new(end.regex.clone()))
                    })
            } else {
                None
            };
            self.start(starts, end);
        }

        Ok(if origin.return_end { 0 } else { lexeme.len() })
    }

    /// Classify the pending buffer in the context of the current mode and
    /// append the result to the output.
    fn flush(&mut self) -> Result<(), HighlightError> {
        let buffer = std::mem::take(&mut self.buffer);
        if buffer.is_empty() {
            return Ok(());
        }

        let top = self.top();
        match &top.sub_language {
            Some(sub) => self.process_sub_language(sub, top.relevance, &buffer),
            None => {
                let relevance = classify(
                    top,
                    &buffer,
                    self.grammar
                        .case_insensitive(),
                    &mut self.tokens,
                )?;
                self.relevance = self
                    .relevance
                    .saturating_add(relevance);
                Ok(())
            }
        }
    }

    fn process_sub_language(
        &mut self,
        sub: &SubLanguage,
        container_relevance: u32,
        buffer: &str,
    ) -> Result<(), HighlightError> {
        let result = match sub {
            SubLanguage::Fixed(name) => {
                if self
                    .highlighter
                    .registry()
                    .get(name)
                    .is_none()
                {
                    debug!("Sub-language {} not registered; leaving text as is", name);
                    push_text(&mut self.tokens, buffer);
                    return Ok(());
                }

                let options = Options {
                    ignore_illegals: true,
                    continuation: self
                        .continuations
                        .get(name),
                };

                let result = match self
                    .highlighter
                    .highlight_with(name, buffer, &options)
                {
                    Ok(result) => result,
                    Err(HighlightError::IllegalLexeme { mode, lexeme }) => {
                        debug!(?mode, ?lexeme, "Illegal lexeme in {}; leaving text as is", name);
                        Highlighted::verbatim(buffer)
                    }
                    Err(error) => return Err(error),
                };

                match &result.continuation {
                    Some(continuation) => {
                        self.continuations
                            .insert(name.clone(), continuation.clone());
                    }
                    None => {
                        self.continuations
                            .remove(name);
                    }
                }

                result
            }
            SubLanguage::Auto(names) => self
                .highlighter
                .highlight_among(buffer, names)?,
        };

        // a container with no relevance of its own keeps the embedded
        // language's score out of ours
        if container_relevance > 0 {
            self.relevance = self
                .relevance
                .saturating_add(result.relevance);
        }

        match result.language {
            Some(language) => {
                self.tokens
                    .push(Token::Begin(Scope::Language(language.clone())));
                self.tokens
                    .extend(result.tokens);
                self.tokens
                    .push(Token::End(Scope::Language(language)));
            }
            None => {
                for token in result.tokens {
                    push_token(&mut self.tokens, token);
                }
            }
        }

        Ok(())
    }
}
