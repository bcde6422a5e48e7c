//! Phase-by-phase rewriting of a whole document.
//!
//! The working text is threaded through every enabled phase of the
//! [`Registry`]. Substitution rules rewrite all of their matches in one
//! global pass. Structural rules record every match against a snapshot of
//! the current text first and then splice the built fragments in by byte
//! offset, so two identical spans are always rewritten independently.
//!
//! Output of sealing builders (fenced code, link targets) is swapped for a
//! placeholder until all phases have run, keeping later rules away from
//! code contents and URLs. Placeholder characters already present in the
//! source are sealed up front, so every placeholder in the working text
//! belongs to this call.

use std::{borrow::Cow, ops::Range, sync::LazyLock};

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::{
    registry::{PhaseKind, Registry},
    rule::{Action, Builder, Rule},
};

const SEAL_OPEN: char = '\u{E000}';
const SEAL_CLOSE: char = '\u{E001}';

static SEAL_RE: LazyLock<Regex> =
    lazy_regex!("\u{E000}([0-9]+)\u{E001}", "seal placeholder regex should compile");

/// Settings for a single transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Convert newlines into `<br>` as the final phase.
    pub line_breaks: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self { line_breaks: true }
    }
}

impl TransformOptions {
    fn runs(self, kind: PhaseKind) -> bool {
        kind != PhaseKind::Whitespace || self.line_breaks
    }
}

/// Fragments withheld from later phases.
#[derive(Default)]
struct Sealed {
    fragments: Vec<String>,
}

impl Sealed {
    /// Seal every placeholder delimiter that occurs in `source`.
    fn shield(&mut self, source: &str) -> String {
        if !source.contains([SEAL_OPEN, SEAL_CLOSE]) {
            return source.to_string();
        }
        let mut out = String::with_capacity(source.len());
        for ch in source.chars() {
            if ch == SEAL_OPEN || ch == SEAL_CLOSE {
                out.push_str(&self.stash(ch.to_string()));
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn stash(&mut self, fragment: String) -> String {
        let idx = self.fragments.len();
        self.fragments.push(fragment);
        format!("{SEAL_OPEN}{idx}{SEAL_CLOSE}")
    }

    fn restore(&self, text: String) -> String {
        if self.fragments.is_empty() {
            return text;
        }
        SEAL_RE
            .replace_all(&text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.fragments.get(idx))
                    .map_or_else(|| caps[0].to_string(), Clone::clone)
            })
            .into_owned()
    }
}

/// Convert `source` into an HTML fragment using default options.
///
/// # Examples
///
/// ```
/// use markrite::transform;
///
/// assert_eq!(transform("# Title"), "<h1>Title</h1>");
/// assert_eq!(transform("plain text"), "plain text");
/// ```
#[must_use]
pub fn transform(source: &str) -> String {
    transform_with(source, &TransformOptions::default())
}

/// Convert `source` into an HTML fragment.
///
/// Unrecognised or malformed constructs pass through unchanged.
///
/// # Examples
///
/// ```
/// use markrite::{TransformOptions, transform_with};
///
/// let opts = TransformOptions { line_breaks: false };
/// assert_eq!(transform_with("- a\n- b", &opts), "<ul><li>a</li><li>b</li></ul>");
/// ```
#[must_use]
pub fn transform_with(source: &str, options: &TransformOptions) -> String {
    if source.is_empty() {
        return String::new();
    }
    let mut sealed = Sealed::default();
    let mut text = sealed.shield(source);
    for phase in Registry::standard().phases() {
        if !options.runs(phase.kind()) {
            continue;
        }
        for rule in phase.rules() {
            let rewritten = match apply_rule(rule, &text, &mut sealed) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            if let Some(next) = rewritten {
                text = next;
            }
        }
    }
    sealed.restore(text)
}

fn apply_rule<'t>(rule: &Rule, text: &'t str, sealed: &mut Sealed) -> Cow<'t, str> {
    match rule.action() {
        Action::Substitute(template) => {
            let out = rule.pattern().regex().replace_all(text, template);
            if matches!(out, Cow::Owned(_)) {
                trace!(rule = ?rule.tag(), "substitution rewrote text");
            }
            out
        }
        Action::Build(builder) => {
            let edits = collect_edits(rule, builder, text);
            debug!(rule = ?rule.tag(), matches = edits.len(), "structural rule applied");
            if edits.is_empty() {
                return Cow::Borrowed(text);
            }
            Cow::Owned(splice(text, edits, builder.seals_output(), sealed))
        }
    }
}

/// Find every match of a structural rule and build its fragment without
/// touching the text. Each edit covers the builder's target group.
fn collect_edits(rule: &Rule, builder: Builder, text: &str) -> Vec<(Range<usize>, String)> {
    let group = builder.target_group();
    rule.pattern()
        .regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let target = caps.get(group)?;
            Some((target.range(), builder.build(&caps)))
        })
        .collect()
}

/// Copy unmatched text and insert fragments at their recorded ranges.
///
/// `edits` must be sorted by start offset and must not overlap.
fn splice(
    text: &str,
    edits: Vec<(Range<usize>, String)>,
    seal: bool,
    sealed: &mut Sealed,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, fragment) in edits {
        out.push_str(&text[last..range.start]);
        if seal {
            out.push_str(&sealed.stash(fragment));
        } else {
            out.push_str(&fragment);
        }
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}
