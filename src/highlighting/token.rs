//! The classified output of a highlight call

/// What an opened region represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A mode carrying a class name.
    Class(String),
    /// The output of an embedded sub-language.
    Language(String),
}

impl Scope {
    pub fn name(&self) -> &str {
        match self {
            Scope::Class(name) => name,
            Scope::Language(name) => name,
        }
    }
}

/// One element of the token stream. `Begin` and `End` are always balanced
/// within a single result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Source text with no classification of its own; it belongs to whatever
    /// region is open around it.
    Text(String),
    /// A word found in the active mode's keyword table.
    Keyword { class: String, text: String },
    Begin(Scope),
    End(Scope),
}

/// Append text to the stream, joining it to a preceding text token.
pub fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }

    if let Some(Token::Text(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

/// Append a token, joining adjacent text.
pub fn push_token(tokens: &mut Vec<Token>, token: Token) {
    match token {
        Token::Text(text) => push_text(tokens, &text),
        token => tokens.push(token),
    }
}

/// Reassemble the source text a token stream was made from.
pub fn plain(tokens: &[Token]) -> String {
    let mut result = String::new();

    for token in tokens {
        match token {
            Token::Text(text) => result.push_str(text),
            Token::Keyword { text, .. } => result.push_str(text),
            Token::Begin(_) | Token::End(_) => {}
        }
    }

    result
}
