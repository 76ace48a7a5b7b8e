//! Renderer producing HTML spans

use std::borrow::Cow;

use super::Render;
use crate::highlighting::Scope;

/// Wrap classified regions in `<span class="...">` elements. Class names
/// get a prefix (by default `hljs-`) so they can't collide with a page's
/// own styles; embedded languages are marked with their bare name.
pub struct Html {
    prefix: String,
}

impl Html {
    pub fn new() -> Html {
        Html::with_prefix("hljs-")
    }

    pub fn with_prefix(prefix: &str) -> Html {
        Html {
            prefix: prefix.to_string(),
        }
    }
}

impl Default for Html {
    fn default() -> Self {
        Html::new()
    }
}

impl Render for Html {
    fn open(&self, scope: &Scope) -> String {
        match scope {
            Scope::Class(class) => format!(
                "<span class=\"{}{}\">",
                self.prefix,
                escape_html(class)
            ),
            Scope::Language(language) => format!("<span class=\"{}\">", escape_html(language)),
        }
    }

    fn close(&self, _scope: &Scope) -> String {
        "</span>".to_string()
    }

    fn style(&self, _class: Option<&str>, content: &str) -> String {
        escape_html(content).into_owned()
    }
}

fn escape_html(content: &str) -> Cow<'_, str> {
    if !content.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(content);
    }

    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}
