//! Complete documents wrapping rendered output

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::debug;

static TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{stylesheet | unescaped}
</style>
</head>
<body>
<pre><code class="hljs{{ if language }} {language}{{ endif }}">{markup | unescaped}</code></pre>
</body>
</html>
"#;

/// Colours for the classes the HTML renderer emits, matching the terminal
/// palette.
pub static STYLESHEET: &str = r#".hljs { display: block; padding: 0.5em; color: #2e3436; background: #fafafa; }
.hljs-keyword, .hljs-selector-tag { color: #75507b; font-weight: bold; }
.hljs-built_in, .hljs-type, .hljs-class { color: #8f5902; font-weight: bold; }
.hljs-title, .hljs-function, .hljs-section { color: #3465a4; font-weight: bold; }
.hljs-string, .hljs-regexp, .hljs-symbol { color: #4e9a06; }
.hljs-number, .hljs-literal { color: #ad7fa8; }
.hljs-comment, .hljs-quote { color: #999999; font-style: italic; }
.hljs-doctag, .hljs-meta { color: #c4a000; font-weight: bold; }
.hljs-variable, .hljs-params, .hljs-template-variable { color: #729fcf; }
.hljs-attr, .hljs-attribute, .hljs-name, .hljs-tag { color: #60989a; }
.hljs-subst, .hljs-operator { color: #cc0000; }
.hljs-strong { font-weight: bold; }
.hljs-emphasis { font-style: italic; }"#;

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    language: Option<&'a str>,
    stylesheet: &'a str,
    markup: &'a str,
}

/// Wrap HTML markup from the [`Html`](crate::rendering::Html) renderer in a
/// page that can be opened directly in a browser.
pub fn standalone(
    markup: &str,
    title: &str,
    language: Option<&str>,
) -> Result<String, tinytemplate::error::Error> {
    let mut tt = TinyTemplate::new();
    tt.add_template("standalone", TEMPLATE)?;

    let context = Context {
        title,
        language,
        stylesheet: STYLESHEET,
        markup,
    };

    let rendered = tt.render("standalone", &context)?;
    debug!("Wrapped {} bytes of markup", markup.len());

    Ok(rendered)
}
