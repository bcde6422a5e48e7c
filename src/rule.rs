//! Rewrite rules: a classified pattern paired with the action that replaces
//! its matches.
//!
//! A [`Rule`] either substitutes a fixed template for every match in one
//! global pass or hands each match to a structural [`Builder`], which
//! decomposes the matched span into items before emitting markup.

use regex::{Captures, Regex};

use crate::blocks;

/// Intent of a rule. Used for dispatch and diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Header,
    Divider,
    Bold,
    Italic,
    Strikethrough,
    Highlight,
    Underline,
    UnorderedList,
    OrderedList,
    Blockquote,
    CodeBlock,
    Image,
    Checkbox,
    Link,
    LineBreak,
    /// The `(url)` part of a link or image, withheld until links are built.
    LinkTarget,
}

/// How a [`TextPattern`] walks the working text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Line-anchored or inline spans confined to one line.
    Line,
    /// The longest run of contiguous lines that satisfy a per-line shape.
    Run,
    /// A delimited span that may cross line boundaries.
    Span,
}

/// A compiled pattern together with its matching mode.
#[derive(Debug)]
pub struct TextPattern {
    regex: Regex,
    mode: MatchMode,
}

impl TextPattern {
    /// Compile a single-line pattern. `^` and `$` anchor to line boundaries.
    ///
    /// # Panics
    /// Panics if `shape` is not a valid regular expression.
    #[must_use]
    pub fn line(shape: &str) -> Self {
        Self::compile(&format!("(?m){shape}"), MatchMode::Line)
    }

    /// Compile a run pattern from the shape of its first line and the shape
    /// of every continuation line. Neither shape may match a newline.
    ///
    /// # Panics
    /// Panics if either shape is not a valid regular expression.
    #[must_use]
    pub fn run(head: &str, tail: &str) -> Self {
        Self::compile(&format!("(?m)^(?:{head})(?:\n(?:{tail}))*"), MatchMode::Run)
    }

    /// Compile a span pattern. `.` matches newlines only inside explicit
    /// `(?s:...)` groups.
    ///
    /// # Panics
    /// Panics if `shape` is not a valid regular expression.
    #[must_use]
    pub fn span(shape: &str) -> Self {
        Self::compile(&format!("(?m){shape}"), MatchMode::Span)
    }

    fn compile(source: &str, mode: MatchMode) -> Self {
        let regex = Regex::new(source)
            .unwrap_or_else(|err| panic!("invalid rule pattern {source:?}: {err}"));
        Self { regex, mode }
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

/// Kind of list a [`Builder::List`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

/// Structural builders. Each variant owns its decomposition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builder {
    List(ListKind),
    Blockquote,
    FencedCode,
    Checkbox,
    LinkTarget,
}

impl Builder {
    /// Decompose a match and build its replacement markup.
    #[must_use]
    pub fn build(self, caps: &Captures<'_>) -> String {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        match self {
            Self::List(kind) => blocks::build_list(kind, &blocks::list_items(kind, whole)),
            Self::Blockquote => blocks::build_blockquote(&blocks::quote_body(whole)),
            Self::FencedCode => blocks::build_code_block(&blocks::FencedBlock::parse(whole)),
            Self::Checkbox => {
                let state = caps.get(1).map_or("", |m| m.as_str());
                blocks::build_checkbox(state == "x")
            }
            Self::LinkTarget => caps.get(1).map_or("", |m| m.as_str()).to_string(),
        }
    }

    /// Capture group whose span the built fragment replaces.
    #[must_use]
    pub fn target_group(self) -> usize {
        match self {
            Self::LinkTarget => 1,
            _ => 0,
        }
    }

    /// Whether the built markup must be shielded from later phases.
    #[must_use]
    pub fn seals_output(self) -> bool {
        matches!(self, Self::FencedCode | Self::LinkTarget)
    }
}

/// What a rule does with its matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Global replace with a template that references captures as `${n}`.
    Substitute(&'static str),
    /// Per-match structural rebuild.
    Build(Builder),
}

/// A single recognizer and its action.
#[derive(Debug)]
pub struct Rule {
    tag: Classification,
    pattern: TextPattern,
    action: Action,
}

impl Rule {
    #[must_use]
    pub fn substitute(tag: Classification, pattern: TextPattern, template: &'static str) -> Self {
        Self {
            tag,
            pattern,
            action: Action::Substitute(template),
        }
    }

    #[must_use]
    pub fn build(tag: Classification, pattern: TextPattern, builder: Builder) -> Self {
        Self {
            tag,
            pattern,
            action: Action::Build(builder),
        }
    }

    #[must_use]
    pub fn tag(&self) -> Classification {
        self.tag
    }

    #[must_use]
    pub fn pattern(&self) -> &TextPattern {
        &self.pattern
    }

    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_pattern_takes_contiguous_lines() {
        let pattern = TextPattern::run(r"-[ \t]+.*", r"-[ \t]+.*");
        let text = "intro\n- a\n- b\n\n- c";
        let found: Vec<&str> = pattern
            .regex()
            .find_iter(text)
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["- a\n- b", "- c"]);
        assert_eq!(pattern.mode(), MatchMode::Run);
    }

    #[test]
    fn line_pattern_anchors_to_each_line() {
        let pattern = TextPattern::line(r"^---$");
        assert_eq!(pattern.regex().find_iter("a\n---\nb\n---").count(), 2);
    }

    #[test]
    fn checkbox_builder_reads_state_capture() {
        let pattern = TextPattern::line(r"\[([ x])\]");
        let caps = pattern.regex().captures("[x]").expect("checkbox should match");
        assert!(Builder::Checkbox.build(&caps).contains("checked"));
    }

    #[test]
    fn code_and_link_targets_are_sealed() {
        assert!(Builder::FencedCode.seals_output());
        assert!(Builder::LinkTarget.seals_output());
        assert!(!Builder::Blockquote.seals_output());
        assert!(!Builder::List(ListKind::Ordered).seals_output());
    }

    #[test]
    fn link_target_replaces_only_the_url() {
        let pattern = TextPattern::line(r"\]\(([^)\s]*)\)");
        let caps = pattern.regex().captures("[a](x_y_z)").expect("target should match");
        assert_eq!(Builder::LinkTarget.target_group(), 1);
        assert_eq!(Builder::LinkTarget.build(&caps), "x_y_z");
        assert_eq!(Builder::Blockquote.target_group(), 0);
    }
}
