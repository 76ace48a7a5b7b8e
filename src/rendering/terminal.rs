//! Renderer for colourizing highlighted source in a terminal

use owo_colors::OwoColorize;

use super::Render;
use crate::highlighting::Scope;

/// Embellish content with ANSI escapes according to its class. Classes
/// without a colour of their own are left plain.
pub struct Terminal;

impl Render for Terminal {
    fn open(&self, _scope: &Scope) -> String {
        String::new()
    }

    fn close(&self, _scope: &Scope) -> String {
        String::new()
    }

    fn style(&self, class: Option<&str>, content: &str) -> String {
        let class = match class {
            Some(class) => class,
            None => return content.to_string(),
        };

        match class {
            "keyword" | "selector-tag" => content // #75507b (purple) bold
                .color(owo_colors::Rgb(0x75, 0x50, 0x7b))
                .bold()
                .to_string(),
            "built_in" | "type" | "class" => content // #8f5902 (brown) bold
                .color(owo_colors::Rgb(0x8f, 0x59, 0x02))
                .bold()
                .to_string(),
            "title" | "function" | "section" => content // #3465a4 (blue) bold
                .color(owo_colors::Rgb(0x34, 0x65, 0xa4))
                .bold()
                .to_string(),
            "string" | "regexp" | "symbol" => content // #4e9a06 (green)
                .color(owo_colors::Rgb(0x4e, 0x9a, 0x06))
                .to_string(),
            "number" | "literal" => content // #ad7fa8 (light purple)
                .color(owo_colors::Rgb(0xad, 0x7f, 0xa8))
                .to_string(),
            "comment" | "quote" => content // #999999 (grey)
                .color(owo_colors::Rgb(0x99, 0x99, 0x99))
                .italic()
                .to_string(),
            "doctag" | "meta" => content // #c4a000 (yellow) bold
                .color(owo_colors::Rgb(0xc4, 0xa0, 0x00))
                .bold()
                .to_string(),
            "variable" | "params" | "template-variable" => content // #729fcf (light blue)
                .color(owo_colors::Rgb(0x72, 0x9f, 0xcf))
                .to_string(),
            "attr" | "attribute" | "name" | "tag" => content // #60989a (teal)
                .color(owo_colors::Rgb(0x60, 0x98, 0x9a))
                .to_string(),
            "subst" | "operator" => content // #cc0000 (red)
                .color(owo_colors::Rgb(204, 0, 0))
                .to_string(),
            "strong" => content
                .bold()
                .to_string(),
            "emphasis" => content
                .italic()
                .to_string(),
            _ => content.to_string(),
        }
    }
}
