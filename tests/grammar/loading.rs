#[cfg(test)]
mod loading {
    use std::fs;
    use std::path::{Path, PathBuf};

    use hilite::grammar::{self, LoadingError};
    use hilite::highlighting::{Highlighter, Scope, Token};
    use hilite::registry::Registry;
    use hilite::rendering::{render, Html, Identity};

    fn fixtures() -> Vec<PathBuf> {
        let dir = Path::new("tests/grammars/");

        assert!(dir.exists(), "grammars directory missing");

        let entries = fs::read_dir(dir).expect("Failed to read grammars directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("json")
            {
                files.push(path);
            }
        }
        files.sort();

        assert!(!files.is_empty(), "No .json files found in grammars directory");
        files
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        for file in fixtures() {
            let language = grammar::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load grammar {:?}: {}", file, e));
            registry.register(language);
        }
        registry
    }

    #[test]
    fn ensure_fixtures_compile() {
        let registry = registry();

        let mut failures = Vec::new();
        for language in registry.languages() {
            if let Err(e) = language.compile() {
                println!("Grammar {} failed to compile: {}", language.name, e);
                failures.push(
                    language
                        .name
                        .clone(),
                );
            }
        }

        if !failures.is_empty() {
            panic!(
                "Grammar fixtures should compile, but {} failed",
                failures.len()
            );
        }
    }

    #[test]
    fn json_document() {
        let registry = registry();
        let highlighter = Highlighter::new(&registry);
        let source = "{\"a\": [1, true]}";

        let result = highlighter
            .highlight("json", source)
            .unwrap();

        assert_eq!(result.language, Some("json".to_string()));
        assert_eq!(result.text(), source);
        assert!(result.relevance > 0);
        assert!(result
            .tokens
            .contains(&Token::Begin(Scope::Class("attr".to_string()))));
        assert!(result
            .tokens
            .contains(&Token::Begin(Scope::Class("number".to_string()))));
        assert!(result
            .tokens
            .contains(&Token::Keyword {
                class: "literal".to_string(),
                text: "true".to_string(),
            }));

        assert_eq!(render(&Identity, &result.tokens), source);
    }

    #[test]
    fn json_rejects_prose() {
        let registry = registry();

        let result = Highlighter::new(&registry)
            .highlight("json", "hello")
            .unwrap();
        assert_eq!(result.language, None);
        assert_eq!(result.relevance, 0);
    }

    #[test]
    fn case_insensitive_keywords() {
        let registry = registry();

        let result = Highlighter::new(&registry)
            .highlight("pg", "<DIV class=\"a\">")
            .unwrap();

        assert_eq!(
            result.tokens,
            vec![
                Token::Begin(Scope::Class("tag".to_string())),
                Token::Text("<".to_string()),
                Token::Keyword {
                    class: "name".to_string(),
                    text: "DIV".to_string(),
                },
                Token::Text(" class=".to_string()),
                Token::Begin(Scope::Class("string".to_string())),
                Token::Text("\"a\"".to_string()),
                Token::End(Scope::Class("string".to_string())),
                Token::Text(">".to_string()),
                Token::End(Scope::Class("tag".to_string())),
            ]
        );
        assert_eq!(result.relevance, 3);
    }

    #[test]
    fn embedded_json_rendered_as_html() {
        let registry = registry();

        let result = Highlighter::new(&registry)
            .highlight("page", "<!-- x --><script>[1]</script>")
            .unwrap();
        assert!(result.relevance >= 5);

        let html = render(&Html::new(), &result.tokens);
        assert!(html.starts_with("<span class=\"hljs-comment\">&lt;!-- x --&gt;</span>"));
        assert!(html.contains("<span class=\"json\">"));
        assert!(html.contains("<span class=\"hljs-number\">1</span>"));
        assert!(html.ends_with("&lt;/script&gt;"));
    }

    #[test]
    fn variants_from_definitions() {
        let registry = registry();

        let result = Highlighter::new(&registry)
            .highlight("bash", "echo \"hi\" 'there' # done")
            .unwrap();

        let strings = result
            .tokens
            .iter()
            .filter(|token| **token == Token::Begin(Scope::Class("string".to_string())))
            .count();
        assert_eq!(strings, 2);
        assert!(result
            .tokens
            .contains(&Token::Keyword {
                class: "built_in".to_string(),
                text: "echo".to_string(),
            }));
    }

    #[test]
    fn detection_over_fixtures() {
        let registry = registry();

        let result = Highlighter::new(&registry)
            .highlight_auto("[1, 2, {\"b\": null}]")
            .unwrap();
        assert_eq!(result.language, Some("json".to_string()));
    }

    #[test]
    fn missing_file() {
        let result = grammar::load(Path::new("tests/grammars/missing.json"));

        match result {
            Err(LoadingError { problem, filename, .. }) => {
                assert_eq!(problem, "File not found");
                assert_eq!(filename, PathBuf::from("tests/grammars/missing.json"));
            }
            Ok(_) => panic!("expected a LoadingError"),
        }
    }

    #[test]
    fn unknown_reference() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("broken.json");
        fs::write(&file, r#"{"name": "broken", "contains": ["nowhere"]}"#).unwrap();

        let error = grammar::load(&file).unwrap_err();
        assert_eq!(error.problem, "Invalid grammar");
        assert!(error
            .details
            .contains("nowhere"));
    }
}
