//! The ordered rule table.
//!
//! Rules are grouped into phases that run strictly in registration order.
//! Fenced blocks and link targets are sealed first so no other rule sees
//! code contents or URLs. Headers come before inline formatting, inline
//! formatting before lists, and lists before blockquotes. Quoted lines start
//! with `>`, so line-anchored rules skip them until the quote is built.
//! Media and links follow, and newline conversion runs last.

use std::sync::LazyLock;

use crate::rule::{Builder, Classification, ListKind, Rule, TextPattern};

/// Category shared by the rules of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Blocks,
    Headers,
    Dividers,
    Inline,
    Lists,
    Quotes,
    Media,
    Links,
    Whitespace,
}

/// An ordered group of rules.
#[derive(Debug)]
pub struct Phase {
    kind: PhaseKind,
    rules: Vec<Rule>,
}

impl Phase {
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Immutable, ordered collection of phases.
#[derive(Debug)]
pub struct Registry {
    phases: Vec<Phase>,
}

static STANDARD: LazyLock<Registry> = LazyLock::new(Registry::build_standard);

/// Inline span body: one line, no surrounding whitespace, no marker inside.
fn inline_span(open: &str, close: &str, marker: char) -> TextPattern {
    let m = regex::escape(&marker.to_string());
    TextPattern::line(&format!(r"{open}([^\s{m}](?:[^{m}\n]*[^\s{m}])?){close}"))
}

/// `#` spans that are not the `&#` of a numeric character reference.
fn highlight() -> Rule {
    Rule::substitute(
        Classification::Highlight,
        TextPattern::line(r"(^|[^&])#([^\s#](?:[^#\n]*[^\s#])?)#"),
        "${1}<mark>${2}</mark>",
    )
}

fn header(level: usize, template: &'static str) -> Rule {
    Rule::substitute(
        Classification::Header,
        TextPattern::line(&format!(r"^#{{{level}}}[ \t]+(.*?)\r?$")),
        template,
    )
}

impl Registry {
    /// The registry used by [`crate::transform`], built on first access.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Total number of rules across all phases.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.phases.iter().map(|p| p.rules.len()).sum()
    }

    fn build_standard() -> Self {
        use Classification as C;

        let phases = vec![
            Phase {
                kind: PhaseKind::Blocks,
                rules: vec![
                    Rule::build(
                        C::CodeBlock,
                        TextPattern::span(r"^[ \t]*```[^`\n]*\n(?s:.*?)^[ \t]*```[ \t\r]*$"),
                        Builder::FencedCode,
                    ),
                    Rule::build(
                        C::LinkTarget,
                        TextPattern::line(r"\]\(([^)\s]*)\)"),
                        Builder::LinkTarget,
                    ),
                ],
            },
            Phase {
                kind: PhaseKind::Headers,
                rules: vec![
                    header(6, "<h6>${1}</h6>"),
                    header(5, "<h5>${1}</h5>"),
                    header(4, "<h4>${1}</h4>"),
                    header(3, "<h3>${1}</h3>"),
                    header(2, "<h2>${1}</h2>"),
                    header(1, "<h1>${1}</h1>"),
                ],
            },
            Phase {
                kind: PhaseKind::Dividers,
                rules: vec![Rule::substitute(
                    C::Divider,
                    TextPattern::line(r"^---[ \t\r]*$"),
                    "<hr>",
                )],
            },
            Phase {
                kind: PhaseKind::Inline,
                rules: vec![
                    Rule::substitute(
                        C::Bold,
                        inline_span(r"\*\*", r"\*\*", '*'),
                        "<strong>${1}</strong>",
                    ),
                    Rule::substitute(
                        C::Bold,
                        inline_span(r"\*", r"\*", '*'),
                        "<strong>${1}</strong>",
                    ),
                    Rule::substitute(C::Italic, inline_span("__", "__", '_'), "<em>${1}</em>"),
                    Rule::substitute(C::Italic, inline_span("%", "%", '%'), "<em>${1}</em>"),
                    Rule::substitute(
                        C::Strikethrough,
                        inline_span("~~", "~~", '~'),
                        "<del>${1}</del>",
                    ),
                    Rule::substitute(
                        C::Strikethrough,
                        inline_span("~", "~", '~'),
                        "<del>${1}</del>",
                    ),
                    highlight(),
                    Rule::substitute(C::Underline, inline_span("_", "_", '_'), "<u>${1}</u>"),
                ],
            },
            Phase {
                kind: PhaseKind::Lists,
                rules: vec![
                    Rule::build(
                        C::UnorderedList,
                        TextPattern::run(r"[*+-][ \t]+.*", r"[ \t]*[*+-][ \t]+.*"),
                        Builder::List(ListKind::Unordered),
                    ),
                    Rule::build(
                        C::OrderedList,
                        TextPattern::run(r"\d+\.[ \t]+.*", r"[ \t]*\d+\.[ \t]+.*"),
                        Builder::List(ListKind::Ordered),
                    ),
                ],
            },
            Phase {
                kind: PhaseKind::Quotes,
                rules: vec![Rule::build(
                    C::Blockquote,
                    TextPattern::run(r">[ \t].*", r">[ \t].*"),
                    Builder::Blockquote,
                )],
            },
            Phase {
                kind: PhaseKind::Media,
                rules: vec![Rule::substitute(
                    C::Image,
                    TextPattern::line(r"!\[([^\]\n]*)\]\(([^)\s]*)\)"),
                    r#"<img src="${2}" alt="${1}" />"#,
                )],
            },
            Phase {
                kind: PhaseKind::Links,
                rules: vec![
                    Rule::substitute(
                        C::Link,
                        TextPattern::line(r"\[([^\]\n]*)\]\(([^)\s]*)\)"),
                        r#"<a href="${2}">${1}</a>"#,
                    ),
                    Rule::build(
                        C::Checkbox,
                        TextPattern::line(r"\[([ x])\]"),
                        Builder::Checkbox,
                    ),
                ],
            },
            Phase {
                kind: PhaseKind::Whitespace,
                rules: vec![Rule::substitute(
                    C::LineBreak,
                    TextPattern::line(r"\r?\n"),
                    "<br>",
                )],
            },
        ];
        Self { phases }
    }
}
