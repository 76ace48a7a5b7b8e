//! Joining independently written patterns into one alternation

use crate::fixed_regex;

/// Join the patterns with the separator, renumbering backreferences so that
/// each one still refers to a group inside its own pattern. Naively
/// concatenating `(a)\1` and `(b)\1` would leave the second `\1` pointing at
/// the first pattern's group.
///
/// Character classes and escape sequences are copied through untouched, and
/// only a bare `(` counts as opening a capture group; `(?` introduces a
/// non-capturing group or a look-around.
pub fn compose<S: AsRef<str>>(patterns: &[S], separator: &str) -> String {
    let scanner = fixed_regex!(r"\[(?:[^\\\]]|\\.)*\]|\(\??|\\([1-9][0-9]*)|\\.");

    let mut captures = 0;
    let mut result = String::new();

    for (i, pattern) in patterns
        .iter()
        .enumerate()
    {
        let offset = captures;
        let mut rest = pattern.as_ref();

        if i > 0 {
            result.push_str(separator);
        }

        while !rest.is_empty() {
            let found = match scanner.captures(rest) {
                Some(found) => found,
                None => {
                    result.push_str(rest);
                    break;
                }
            };
            let (start, end, text) = match found.get(0) {
                Some(whole) => (whole.start(), whole.end(), whole.as_str()),
                None => break,
            };

            result.push_str(&rest[..start]);

            match found
                .get(1)
                .and_then(|number| {
                    number
                        .as_str()
                        .parse::<usize>()
                        .ok()
                }) {
                Some(number) => {
                    result.push('\\');
                    result.push_str(&(number + offset).to_string());
                }
                None => {
                    result.push_str(text);
                    if text == "(" {
                        captures += 1;
                    }
                }
            }

            rest = &rest[end..];
        }
    }

    result
}
