//! Classifying the words of a text span against a keyword table

use std::borrow::Cow;

use crate::compiler::CompiledMode;
use crate::highlighting::token::{push_text, Token};
use crate::highlighting::HighlightError;

/// Width in bytes of the character at `offset`, or 1 past the end.
pub(crate) fn char_width(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|rest| {
            rest.chars()
                .next()
        })
        .map(char::len_utf8)
        .unwrap_or(1)
}

/// Split the text into candidate words using the mode's lexeme pattern and
/// emit each one that is a keyword as a classified token, everything else as
/// plain text. Returns the summed relevance of the keywords found.
pub fn classify(
    mode: &CompiledMode,
    text: &str,
    case_insensitive: bool,
    tokens: &mut Vec<Token>,
) -> Result<u32, HighlightError> {
    let keywords = match &mode.keywords {
        Some(keywords) => keywords,
        None => {
            push_text(tokens, text);
            return Ok(0);
        }
    };

    let mut relevance: u32 = 0;
    let mut last = 0;
    let mut position = 0;

    while position <= text.len() {
        let found = match mode
            .lexemes
            .find_from_pos(text, position)?
        {
            Some(found) => found,
            None => break,
        };

        if found.start() == found.end() {
            position = found.end() + char_width(text, found.end());
            continue;
        }

        push_text(tokens, &text[last..found.start()]);

        let word = found.as_str();
        let folded: Cow<str> = if case_insensitive {
            Cow::Owned(word.to_lowercase())
        } else {
            Cow::Borrowed(word)
        };

        match keywords.lookup(&folded) {
            Some((class, weight)) => {
                relevance = relevance.saturating_add(weight);
                tokens.push(Token::Keyword {
                    class: class.to_string(),
                    text: word.to_string(),
                });
            }
            None => push_text(tokens, word),
        }

        last = found.end();
        position = found.end();
    }

    push_text(tokens, &text[last..]);

    Ok(relevance)
}
