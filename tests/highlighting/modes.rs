#[cfg(test)]
mod modes {
    use hilite::grammar::{Contained, Grammar, Language, Mode};
    use hilite::highlighting::{Highlighter, Options, Token};

    use crate::{begin, end, registry_of, text};

    fn single(name: &str, grammar: Grammar) -> hilite::registry::Registry {
        registry_of(vec![Language::new(name, grammar)])
    }

    #[test]
    fn cascading_close() {
        let mut grammar = Grammar::new(Mode::new());
        let third = grammar.add(
            Mode::new()
                .class("c")
                .begin("c")
                .ends_with_parent(),
        );
        let second = grammar.add(
            Mode::new()
                .class("b")
                .begin("b")
                .ends_with_parent()
                .contains(vec![Contained::Mode(third)]),
        );
        let first = grammar.add(
            Mode::new()
                .class("a")
                .begin("<")
                .end(">")
                .contains(vec![Contained::Mode(second)]),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(first)];
        let registry = single("nested", grammar);

        let result = Highlighter::new(&registry)
            .highlight("nested", "<bc>")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                begin("a"),
                text("<"),
                begin("b"),
                text("b"),
                begin("c"),
                text("c>"),
                end("c"),
                end("b"),
                end("a"),
            ]
        );
        assert_eq!(result.relevance, 3);
        assert_eq!(
            result
                .continuation
                .unwrap()
                .depth(),
            0
        );
    }

    #[test]
    fn illegal_lexeme_at_top_level() {
        let mut grammar = Grammar::new(Mode::new().illegal("%"));
        let string = grammar.add(
            Mode::new()
                .class("string")
                .begin("'")
                .end("'"),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(string)];
        let registry = single("strict", grammar);
        let highlighter = Highlighter::new(&registry);

        let result = highlighter
            .highlight("strict", "'a' % b")
            .unwrap();
        assert_eq!(result.language, None);
        assert_eq!(result.relevance, 0);
        assert_eq!(result.tokens, vec![text("'a' % b")]);
        assert!(result
            .continuation
            .is_none());

        let options = Options {
            ignore_illegals: true,
            ..Options::default()
        };
        let result = highlighter
            .highlight_with("strict", "'a' % b", &options)
            .unwrap();
        assert_eq!(result.language, Some("strict".to_string()));
        assert_eq!(
            result.tokens,
            vec![begin("string"), text("'a'"), end("string"), text(" % b")]
        );
        assert_eq!(result.relevance, 1);
    }

    #[test]
    fn ends_parent() {
        let mut grammar = Grammar::new(Mode::new());
        let inner = grammar.add(
            Mode::new()
                .class("inner")
                .begin("i")
                .end(";")
                .ends_parent(),
        );
        let outer = grammar.add(
            Mode::new()
                .class("outer")
                .begin("<")
                .end(">")
                .contains(vec![Contained::Mode(inner)]),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(outer)];
        let registry = single("sample", grammar);

        let result = Highlighter::new(&registry)
            .highlight("sample", "<i;x")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                begin("outer"),
                text("<"),
                begin("inner"),
                text("i;"),
                end("inner"),
                end("outer"),
                text("x"),
            ]
        );
        assert_eq!(result.relevance, 2);
    }

    #[test]
    fn end_same_as_begin() {
        let mut grammar = Grammar::new(Mode::new());
        let fence = grammar.add(
            Mode::new()
                .class("string")
                .begin("=+")
                .end_same_as_begin(),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(fence)];
        let registry = single("fenced", grammar);

        let result = Highlighter::new(&registry)
            .highlight("fenced", "== a = b == c")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![begin("string"), text("== a = b =="), end("string"), text(" c")]
        );
    }

    #[test]
    fn starts_follows_the_ended_mode() {
        let mut grammar = Grammar::new(Mode::new());
        let value = grammar.add(
            Mode::new()
                .class("string")
                .end("$"),
        );
        let key = grammar.add(
            Mode::new()
                .class("attr")
                .begin("k")
                .end("=")
                .starts(value),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(key)];
        let registry = single("pairs", grammar);

        let result = Highlighter::new(&registry)
            .highlight("pairs", "k=v")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                begin("attr"),
                text("k="),
                end("attr"),
                begin("string"),
                text("v"),
                end("string"),
            ]
        );
        assert_eq!(result.relevance, 2);
    }

    #[test]
    fn exclude_begin_and_end() {
        let mut grammar = Grammar::new(Mode::new());
        let string = grammar.add(
            Mode::new()
                .class("string")
                .begin("\"")
                .end("\"")
                .exclude_begin()
                .exclude_end(),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(string)];
        let registry = single("sample", grammar);

        let result = Highlighter::new(&registry)
            .highlight("sample", "a \"b\" c")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                text("a \""),
                begin("string"),
                text("b"),
                end("string"),
                text("\" c"),
            ]
        );
    }

    #[test]
    fn return_begin_rescans_lexeme() {
        let mut grammar = Grammar::new(Mode::new());
        let name = grammar.add(
            Mode::new()
                .class("keyword")
                .begin("fn"),
        );
        let function = grammar.add(
            Mode::new()
                .class("function")
                .begin("fn")
                .end(r"\(")
                .return_begin()
                .contains(vec![Contained::Mode(name)]),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(function)];
        let registry = single("sample", grammar);

        let result = Highlighter::new(&registry)
            .highlight("sample", "fn(x")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                begin("function"),
                begin("keyword"),
                text("fn"),
                end("keyword"),
                text("("),
                end("function"),
                text("x"),
            ]
        );
        assert_eq!(result.relevance, 2);
    }

    #[test]
    fn skip_stays_in_parent() {
        let mut grammar = Grammar::new(Mode::new());
        let quoted = grammar.add(
            Mode::new()
                .begin("'")
                .end("'")
                .skip(),
        );
        let string = grammar.add(
            Mode::new()
                .class("string")
                .begin("\"")
                .end("\"")
                .contains(vec![Contained::Mode(quoted)]),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(string)];
        let registry = single("sample", grammar);

        let result = Highlighter::new(&registry)
            .highlight("sample", "\"x'\"'y\"")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![begin("string"), text("\"x'\"'y\""), end("string")]
        );
        assert_eq!(result.relevance, 1);
    }

    #[test]
    fn zero_width_modes_still_advance() {
        let mut grammar = Grammar::new(Mode::new());
        let empty = grammar.add(Mode::new().class("x"));
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(empty)];
        let registry = single("degenerate", grammar);

        let result = Highlighter::new(&registry)
            .highlight("degenerate", "ab")
            .unwrap();

        assert_eq!(result.text(), "ab");

        let opened = result
            .tokens
            .iter()
            .filter(|token| matches!(token, Token::Begin(_)))
            .count();
        let closed = result
            .tokens
            .iter()
            .filter(|token| matches!(token, Token::End(_)))
            .count();
        assert_eq!(opened, closed);
    }

    #[test]
    fn self_recursive_zero_width_mode_terminates() {
        let mut grammar = Grammar::new(Mode::new());
        let nested = grammar.add(
            Mode::new()
                .class("a")
                .contains(vec![Contained::This]),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(nested)];
        let registry = single("recursive", grammar);

        let result = Highlighter::new(&registry)
            .highlight("recursive", "ab")
            .unwrap();

        assert_eq!(result.text(), "ab");
        assert_eq!(
            result.tokens,
            vec![
                begin("a"),
                text("a"),
                begin("a"),
                text("b"),
                begin("a"),
                end("a"),
                end("a"),
                end("a"),
            ]
        );
    }

    #[test]
    fn dangling_modes_closed() {
        let mut grammar = Grammar::new(Mode::new());
        let comment = grammar.add(
            Mode::new()
                .class("comment")
                .begin(r"/\*")
                .end(r"\*/"),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(comment)];
        let registry = single("sample", grammar);

        let result = Highlighter::new(&registry)
            .highlight("sample", "a /* b")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![text("a "), begin("comment"), text("/* b"), end("comment")]
        );
        assert_eq!(result.relevance, 0);
        assert_eq!(
            result
                .continuation
                .unwrap()
                .depth(),
            1
        );
    }

    #[test]
    fn variants_each_tried() {
        let mut grammar = Grammar::new(Mode::new());
        let number = grammar.add(
            Mode::new()
                .class("number")
                .relevance(0)
                .variants(vec![
                    Mode::new().begin(r"\b0x[0-9a-f]+"),
                    Mode::new().begin(r"\b\d+"),
                ]),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(number)];
        let registry = single("numbers", grammar);

        let result = Highlighter::new(&registry)
            .highlight("numbers", "0xff 12")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                begin("number"),
                text("0xff"),
                end("number"),
                text(" "),
                begin("number"),
                text("12"),
                end("number"),
            ]
        );
        assert_eq!(result.relevance, 0);
    }
}
