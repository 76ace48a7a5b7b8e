//! Building blocks shared by many grammars: identifiers, numbers, strings,
//! comments.
//!
//! Leaf modes are returned as a `Mode` so they can be adjusted before being
//! added; modes with children of their own are added to the grammar and
//! returned by id.

use crate::grammar::{Contained, Grammar, Mode, ModeId};

pub const IDENT: &str = r"[a-zA-Z]\w*";
pub const UNDERSCORE_IDENT: &str = r"[a-zA-Z_]\w*";
pub const NUMBER: &str = r"\b\d+(\.\d+)?";
/// Hexadecimal, integer, decimal and exponent forms.
pub const C_NUMBER: &str = r"(-?)(\b0[xX][a-fA-F0-9]+|(\b\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?)";
pub const BINARY_NUMBER: &str = r"\b(0b[01]+)";
/// Operators after which a `/` starts a regular expression literal rather
/// than a division.
pub const RE_STARTERS: &str = r"!|!=|!==|%|%=|&|&&|&=|\*|\*=|\+|\+=|,|-|-=|/=|/|:|;|<<|<<=|<=|<|===|==|=|>>>=|>>=|>=|>>>|>>|>|\?|\[|\{|\(|\^|\^=|\||\|=|\|\||~";

pub fn backslash_escape() -> Mode {
    Mode::new()
        .begin(r"\\[\s\S]")
        .relevance(0)
}

/// Common English words, so that prose in comments isn't mistaken for code.
pub fn phrasal_words() -> Mode {
    Mode::new().begin(r"\b(a|an|the|are|I'm|isn't|don't|doesn't|won't|but|just|should|pretty|simply|enough|gonna|going|wtf|so|such|will|you|your|they|like|more)\b")
}

/// A comment running from `begin` to `end`, recognising annotations like
/// `TODO:` inside it.
pub fn comment(grammar: &mut Grammar, begin: &str, end: &str) -> ModeId {
    let phrasal = grammar.add(phrasal_words());
    let doctag = grammar.add(
        Mode::new()
            .class("doctag")
            .begin("(?:TODO|FIXME|NOTE|BUG|XXX):")
            .relevance(0),
    );

    grammar.add(
        Mode::new()
            .class("comment")
            .begin(begin)
            .end(end)
            .contains(vec![Contained::Mode(phrasal), Contained::Mode(doctag)]),
    )
}

pub fn c_line_comment(grammar: &mut Grammar) -> ModeId {
    comment(grammar, "//", "$")
}

pub fn c_block_comment(grammar: &mut Grammar) -> ModeId {
    comment(grammar, r"/\*", r"\*/")
}

pub fn hash_comment(grammar: &mut Grammar) -> ModeId {
    comment(grammar, "#", "$")
}

fn string(grammar: &mut Grammar, delimiter: &str) -> ModeId {
    let escape = grammar.add(backslash_escape());

    grammar.add(
        Mode::new()
            .class("string")
            .begin(delimiter)
            .end(delimiter)
            .illegal(r"\n")
            .contains(vec![Contained::Mode(escape)]),
    )
}

pub fn apos_string(grammar: &mut Grammar) -> ModeId {
    string(grammar, "'")
}

pub fn quote_string(grammar: &mut Grammar) -> ModeId {
    string(grammar, "\"")
}

pub fn number() -> Mode {
    Mode::new()
        .class("number")
        .begin(NUMBER)
        .relevance(0)
}

pub fn c_number() -> Mode {
    Mode::new()
        .class("number")
        .begin(C_NUMBER)
        .relevance(0)
}

pub fn binary_number() -> Mode {
    Mode::new()
        .class("number")
        .begin(BINARY_NUMBER)
        .relevance(0)
}

/// A number with an optional CSS unit.
pub fn css_number() -> Mode {
    Mode::new()
        .class("number")
        .begin(&format!(
            "{}({})?",
            NUMBER,
            "%|em|ex|ch|rem|vw|vh|vmin|vmax|cm|mm|in|pt|pc|px|deg|grad|rad|turn|s|ms|Hz|kHz|dpi|dpcm|dppx"
        ))
        .relevance(0)
}

/// A `/.../flags` regular expression literal.
pub fn regexp(grammar: &mut Grammar) -> ModeId {
    let escape = grammar.add(backslash_escape());
    let class_escape = grammar.add(backslash_escape());
    let class = grammar.add(
        Mode::new()
            .begin(r"\[")
            .end(r"\]")
            .relevance(0)
            .contains(vec![Contained::Mode(class_escape)]),
    );

    grammar.add(
        Mode::new()
            .class("regexp")
            .begin("/")
            .end("/[gimuy]*")
            .illegal(r"\n")
            .contains(vec![Contained::Mode(escape), Contained::Mode(class)]),
    )
}

pub fn title() -> Mode {
    Mode::new()
        .class("title")
        .begin(IDENT)
        .relevance(0)
}

pub fn underscore_title() -> Mode {
    Mode::new()
        .class("title")
        .begin(UNDERSCORE_IDENT)
        .relevance(0)
}

/// Swallows `.name` so that method names aren't classified as keywords.
pub fn method_guard() -> Mode {
    Mode::new()
        .begin(&format!(r"\.\s*{}", UNDERSCORE_IDENT))
        .relevance(0)
}
