//! Renderers for turning a token stream into marked up text

use crate::highlighting::{Scope, Token};

mod html;
mod terminal;

pub use html::Html;
pub use terminal::Terminal;

/// Trait for different rendering backends (the no-op no-markup one, ANSI
/// escapes for terminal colouring, HTML spans for web pages)
pub trait Render {
    /// Markup to emit where a classified region or embedded language starts.
    fn open(&self, scope: &Scope) -> String;

    /// Markup to emit where that region ends.
    fn close(&self, scope: &Scope) -> String;

    /// Render content belonging to the innermost open class, if any.
    fn style(&self, class: Option<&str>, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn open(&self, _scope: &Scope) -> String {
        String::new()
    }

    fn close(&self, _scope: &Scope) -> String {
        String::new()
    }

    fn style(&self, _class: Option<&str>, content: &str) -> String {
        content.to_string()
    }
}

/// Apply the renderer to each token in turn and combine the results. A
/// keyword is treated as a region of its own class around its text.
pub fn render(renderer: &impl Render, tokens: &[Token]) -> String {
    let mut output = String::new();
    let mut classes: Vec<&str> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => {
                let class = classes
                    .last()
                    .copied();
                output.push_str(&renderer.style(class, text));
            }
            Token::Keyword { class, text } => {
                let scope = Scope::Class(class.clone());
                output.push_str(&renderer.open(&scope));
                output.push_str(&renderer.style(Some(class), text));
                output.push_str(&renderer.close(&scope));
            }
            Token::Begin(scope) => {
                if let Scope::Class(class) = scope {
                    classes.push(class);
                }
                output.push_str(&renderer.open(scope));
            }
            Token::End(scope) => {
                if let Scope::Class(_) = scope {
                    classes.pop();
                }
                output.push_str(&renderer.close(scope));
            }
        }
    }

    output
}
