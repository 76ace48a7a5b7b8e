#[cfg(test)]
mod basics {
    use std::ptr;

    use hilite::compiler::{compose, CompileError};
    use hilite::grammar::{Contained, Grammar, Language, Mode};
    use hilite::highlighting::{HighlightError, Highlighter};

    use crate::{keyword, registry_of, text};

    #[test]
    fn trivial_grammar_round_trip() {
        let registry = registry_of(vec![Language::new("plain", Grammar::new(Mode::new()))]);
        let highlighter = Highlighter::new(&registry);

        let result = highlighter
            .highlight("plain", "hello world")
            .unwrap();

        assert_eq!(result.language, Some("plain".to_string()));
        assert_eq!(result.relevance, 0);
        assert_eq!(result.tokens, vec![text("hello world")]);
        assert_eq!(result.text(), "hello world");
    }

    #[test]
    fn never_matching_terminator_flushes_everything() {
        let language = Language::new("plain", Grammar::new(Mode::new()));
        let compiled = language
            .compile()
            .unwrap();
        assert!(compiled
            .root()
            .terminators
            .is_none());

        let registry = registry_of(vec![language]);
        let result = Highlighter::new(&registry)
            .highlight("plain", "one\ntwo\n\nthree")
            .unwrap();
        assert_eq!(result.tokens, vec![text("one\ntwo\n\nthree")]);
    }

    #[test]
    fn compiling_twice_is_idempotent() {
        let mut grammar = Grammar::new(Mode::new().keywords("if else"));
        let string = grammar.add(
            Mode::new()
                .class("string")
                .begin("'")
                .end("'"),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(string)];
        let language = Language::new("sample", grammar);

        assert!(!language.is_compiled());
        let first = language
            .compile()
            .unwrap();
        assert!(language.is_compiled());
        let second = language
            .compile()
            .unwrap();

        assert!(ptr::eq(first, second));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn keyword_scoring() {
        let grammar = Grammar::new(Mode::new().keywords("if|2 else"));
        let registry = registry_of(vec![Language::new("sample", grammar)]);

        let result = Highlighter::new(&registry)
            .highlight("sample", "if else if")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                keyword("keyword", "if"),
                text(" "),
                keyword("keyword", "else"),
                text(" "),
                keyword("keyword", "if"),
            ]
        );
        assert_eq!(result.relevance, 5);
    }

    #[test]
    fn relevance_saturates() {
        let grammar = Grammar::new(Mode::new().keywords("if|4294967295"));
        let registry = registry_of(vec![Language::new("sample", grammar)]);

        let result = Highlighter::new(&registry)
            .highlight("sample", "if if")
            .unwrap();

        assert_eq!(result.relevance, u32::MAX);
        assert_eq!(result.text(), "if if");
    }

    #[test]
    fn highlighting_shared_across_threads() {
        let mut grammar = Grammar::new(Mode::new().keywords("if else|2"));
        let string = grammar.add(
            Mode::new()
                .class("string")
                .begin("'")
                .end("'"),
        );
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(string)];
        let registry = registry_of(vec![Language::new("sample", grammar)]);

        let snippets = ["if x else 'y'", "'if' else", "else if if", "nothing here"];

        // first compilation happens on the worker threads
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let registry = &registry;
                    let snippet = snippets[i % snippets.len()];
                    scope.spawn(move || {
                        let compiled = registry
                            .get("sample")
                            .unwrap()
                            .compile()
                            .unwrap();
                        let result = Highlighter::new(registry)
                            .highlight("sample", snippet)
                            .unwrap();
                        (i, compiled, result.tokens, result.relevance)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap()
                })
                .collect()
        });

        let highlighter = Highlighter::new(&registry);
        let compiled = registry
            .get("sample")
            .unwrap()
            .compile()
            .unwrap();

        for (i, shared, tokens, relevance) in results {
            let expected = highlighter
                .highlight("sample", snippets[i % snippets.len()])
                .unwrap();
            assert!(ptr::eq(shared, compiled));
            assert_eq!(tokens, expected.tokens);
            assert_eq!(relevance, expected.relevance);
        }
    }

    #[test]
    fn keyword_classes_and_case() {
        let grammar = Grammar::new(
            Mode::new()
                .keywords_for("keyword", "select from")
                .keywords_for("literal", "null|0"),
        );
        let language = Language::new("query", grammar).case_insensitive();
        let registry = registry_of(vec![language]);

        let result = Highlighter::new(&registry)
            .highlight("query", "SELECT x FROM y where NULL")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                keyword("keyword", "SELECT"),
                text(" x "),
                keyword("keyword", "FROM"),
                text(" y where "),
                keyword("literal", "NULL"),
            ]
        );
        assert_eq!(result.relevance, 2);
    }

    #[test]
    fn backreferences_renumbered() {
        let composed = compose(&[r"(a)\1", r"(b)\1"], "|");
        assert_eq!(composed, r"(a)\1|(b)\2");

        let regex = fancy_regex::Regex::new(&composed).unwrap();
        assert!(regex
            .is_match("bb")
            .unwrap());
        assert!(!regex
            .is_match("ba")
            .unwrap());
    }

    #[test]
    fn unknown_language() {
        let registry = registry_of(vec![]);

        let result = Highlighter::new(&registry).highlight("cobol", "MOVE A TO B");
        match result {
            Err(HighlightError::UnknownLanguage(name)) => assert_eq!(name, "cobol"),
            other => panic!("expected UnknownLanguage, got {:?}", other),
        }
    }

    #[test]
    fn malformed_grammar_fails_fast() {
        let mut grammar = Grammar::new(Mode::new());
        let broken = grammar.add(Mode::new().begin("(unclosed"));
        grammar
            .root_mut()
            .contains = vec![Contained::Mode(broken)];
        let registry = registry_of(vec![Language::new("broken", grammar)]);

        let result = Highlighter::new(&registry).highlight("broken", "text");
        assert!(matches!(
            result,
            Err(HighlightError::MalformedGrammar(CompileError::Pattern { .. }))
        ));
    }

    #[test]
    fn lookup_by_alias() {
        let grammar = Grammar::new(Mode::new().keywords("fn"));
        let language = Language::new("Rust", grammar).aliases(&["rs"]);
        let registry = registry_of(vec![language]);

        let result = Highlighter::new(&registry)
            .highlight("RS", "fn")
            .unwrap();
        assert_eq!(result.language, Some("Rust".to_string()));
        assert_eq!(result.relevance, 1);
    }
}
