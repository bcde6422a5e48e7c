//! Helper macros used across the crate.

/// Lazily compile a [`Regex`] with a custom panic message.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
///
/// use regex::Regex;
/// static RE: LazyLock<Regex> = markrite::lazy_regex!(r"^#{1,6} ", "heading marker");
/// assert!(RE.is_match("## Title"));
/// ```
#[macro_export]
macro_rules! lazy_regex {
    ($pattern:expr, $msg:expr $(,)?) => {
        ::std::sync::LazyLock::new(|| ::regex::Regex::new($pattern).expect($msg))
    };
}
