//! Statically known patterns used internally.

/// Build a pattern known at compile time on first use, and hand back the same
/// `&'static` instance on every use after that. Grammar patterns supplied at
/// runtime go through the compiler instead, since they need look-around and
/// backreferences.
#[macro_export]
macro_rules! fixed_regex {
    ($pattern:expr) => {{
        static FIXED: std::sync::OnceLock<::regex::Regex> = std::sync::OnceLock::new();
        FIXED.get_or_init(|| {
            ::regex::Regex::new($pattern)
                .unwrap_or_else(|error| panic!("invalid fixed pattern {}: {}", $pattern, error))
        })
    }};
}
