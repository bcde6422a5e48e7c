//! Structural reassembly of multi-line constructs.
//!
//! Each builder receives the full matched span, splits it into items using
//! its own policy and emits a complete markup fragment. Lists become one
//! `<li>` per line, blockquotes merge every quoted line into one body, and
//! fenced code dispatches on its language tag.

use std::sync::LazyLock;

use regex::Regex;

use crate::{rule::ListKind, table::render_table};

static UNORDERED_MARKER_RE: LazyLock<Regex> =
    lazy_regex!(r"^[*+-][ \t]+", "unordered marker regex should compile");

/// Characters removed from the front of every ordered list line.
pub const ORDERED_MARKER_WIDTH: usize = 2;

/// Line terminator used for fenced code bodies.
pub const CODE_LINE_END: &str = "\r\n";

/// Split a matched list run into item texts.
///
/// Blank lines are dropped. For unordered lists a marker in the first column
/// is stripped along with its trailing whitespace; indented lines keep their
/// marker, so nested lists flatten into sibling items. Ordered lines lose
/// exactly [`ORDERED_MARKER_WIDTH`] characters, which covers `1.` through
/// `9.`; a wider marker leaves its tail in the item text.
///
/// # Examples
///
/// ```
/// use markrite::{blocks::list_items, rule::ListKind};
///
/// let items = list_items(ListKind::Unordered, "- one\n- two\n  - nested");
/// assert_eq!(items, vec!["one", "two", "- nested"]);
/// ```
#[must_use]
pub fn list_items(kind: ListKind, block: &str) -> Vec<String> {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match kind {
            ListKind::Unordered => UNORDERED_MARKER_RE.replace(line, "").trim().to_string(),
            ListKind::Ordered => strip_chars(line, ORDERED_MARKER_WIDTH).trim().to_string(),
        })
        .collect()
}

fn strip_chars(line: &str, count: usize) -> &str {
    line.char_indices().nth(count).map_or("", |(idx, _)| &line[idx..])
}

/// Wrap list items in their container.
#[must_use]
pub fn build_list(kind: ListKind, items: &[String]) -> String {
    let tag = kind.tag();
    let mut out = format!("<{tag}>");
    for item in items {
        out.push_str("<li>");
        out.push_str(item);
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    out
}

/// Merge quoted lines into a single body.
///
/// The leading `>` of each line is removed and empty segments are dropped.
/// Remaining segments are joined with newlines.
#[must_use]
pub fn quote_body(block: &str) -> String {
    block
        .lines()
        .map(|line| line.trim_start().strip_prefix('>').unwrap_or(line).trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn build_blockquote(body: &str) -> String {
    format!("<blockquote>{body}</blockquote>")
}

/// A fenced code block split into its language tag and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub lang: String,
    pub body: String,
}

impl FencedBlock {
    /// Decompose a matched fence.
    ///
    /// The first line carries the tag after the backticks. Lines between the
    /// opening and closing fence form the body; empty lines are skipped and
    /// every kept line ends with [`CODE_LINE_END`].
    ///
    /// # Examples
    ///
    /// ```
    /// use markrite::blocks::FencedBlock;
    ///
    /// let block = FencedBlock::parse("```rust\nfn main() {}\n\n```");
    /// assert_eq!(block.lang, "rust");
    /// assert_eq!(block.body, "fn main() {}\r\n");
    /// ```
    #[must_use]
    pub fn parse(block: &str) -> Self {
        let lines: Vec<&str> = block.lines().collect();
        let lang = lines
            .first()
            .map(|first| first.trim_start().trim_start_matches('`').trim())
            .unwrap_or_default()
            .to_string();
        let inner = if lines.len() > 2 {
            &lines[1..lines.len() - 1]
        } else {
            &[][..]
        };
        let mut body = String::new();
        for line in inner.iter().filter(|l| !l.is_empty()) {
            body.push_str(line);
            body.push_str(CODE_LINE_END);
        }
        Self { lang, body }
    }
}

/// Build the markup for a fenced block according to its tag.
///
/// `mermaid` bodies are emitted verbatim for a diagram renderer, `table`
/// bodies go through [`render_table`], and anything else becomes an escaped
/// code element carrying a `language-*` class for a highlighter.
#[must_use]
pub fn build_code_block(block: &FencedBlock) -> String {
    match block.lang.as_str() {
        "mermaid" => format!("<pre class=\"mermaid\">{}</pre>", block.body),
        "table" => render_table(&block.body),
        "" => format!(
            "<pre><code>{}</code></pre>",
            html_escape::encode_text(&block.body)
        ),
        lang => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            html_escape::encode_double_quoted_attribute(lang),
            html_escape::encode_text(&block.body)
        ),
    }
}

#[must_use]
pub fn build_checkbox(checked: bool) -> String {
    if checked {
        "<input type=\"checkbox\" disabled checked>".to_string()
    } else {
        "<input type=\"checkbox\" disabled>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("- one\n- two\n- three", vec!["one", "two", "three"])]
    #[case("* star\n+ plus", vec!["star", "plus"])]
    #[case("-\ttab", vec!["tab"])]
    #[case("- a\n    - b", vec!["a", "- b"])]
    fn unordered_items(#[case] block: &str, #[case] expected: Vec<&str>) {
        assert_eq!(list_items(ListKind::Unordered, block), expected);
    }

    #[rstest]
    #[case("1. one\n2. two", vec!["one", "two"])]
    #[case("9. nine\n10. ten", vec!["nine", ". ten"])]
    #[case("1.\tx", vec!["x"])]
    #[case("1. a\n   1. b", vec!["a", "1. b"])]
    fn ordered_items(#[case] block: &str, #[case] expected: Vec<&str>) {
        assert_eq!(list_items(ListKind::Ordered, block), expected);
    }

    #[test]
    fn blank_only_block_builds_empty_list() {
        let items = list_items(ListKind::Unordered, "\n  \n");
        assert!(items.is_empty());
        assert_eq!(build_list(ListKind::Unordered, &items), "<ul></ul>");
    }

    #[test]
    fn builds_ordered_list() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            build_list(ListKind::Ordered, &items),
            "<ol><li>a</li><li>b</li></ol>"
        );
    }

    #[test]
    fn quote_lines_merge_into_one_body() {
        assert_eq!(quote_body("> first\n> second\n>   "), "first\nsecond");
        assert_eq!(build_blockquote("x"), "<blockquote>x</blockquote>");
    }

    #[test]
    fn quote_keeps_inner_angle_brackets() {
        assert_eq!(quote_body("> a > b"), "a > b");
    }

    #[test]
    fn parses_fence_without_tag() {
        let block = FencedBlock::parse("```\na\n\nb\n```");
        assert_eq!(block.lang, "");
        assert_eq!(block.body, "a\r\nb\r\n");
    }

    #[test]
    fn empty_fence_has_empty_body() {
        let block = FencedBlock::parse("```sh\n```");
        assert_eq!(block.lang, "sh");
        assert!(block.body.is_empty());
    }

    #[test]
    fn mermaid_body_is_verbatim() {
        let block = FencedBlock::parse("```mermaid\ngraph TD\nA-->B\n```");
        assert_eq!(
            build_code_block(&block),
            "<pre class=\"mermaid\">graph TD\r\nA-->B\r\n</pre>"
        );
    }

    #[test]
    fn generic_code_is_escaped_and_tagged() {
        let block = FencedBlock::parse("```html\n<p>&</p>\n```");
        assert_eq!(
            build_code_block(&block),
            "<pre><code class=\"language-html\">&lt;p&gt;&amp;&lt;/p&gt;\r\n</code></pre>"
        );
    }

    #[test]
    fn tag_dispatch_is_case_sensitive() {
        let block = FencedBlock::parse("```Mermaid\nx\n```");
        assert!(build_code_block(&block).starts_with("<pre><code class=\"language-Mermaid\">"));
    }

    #[test]
    fn table_tag_delegates_to_table_renderer() {
        let block = FencedBlock::parse("```table\na,b\n1,2\n```");
        assert!(build_code_block(&block).starts_with("<table><thead>"));
    }

    #[rstest]
    #[case(true, "<input type=\"checkbox\" disabled checked>")]
    #[case(false, "<input type=\"checkbox\" disabled>")]
    fn checkbox_reflects_state(#[case] checked: bool, #[case] expected: &str) {
        assert_eq!(build_checkbox(checked), expected);
    }
}
