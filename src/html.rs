//! Normalisation of produced markup through an HTML5 parser.
//!
//! Rewrite rules emit markup textually, so unbalanced source (for example a
//! stray `<` or an image inside an unfinished emphasis span) can leave
//! malformed fragments behind. [`normalize_fragment`] parses the fragment
//! the way a browser does when it is assigned to an element's contents and
//! serialises the resulting tree back to text.

use html5ever::{
    QualName,
    driver::ParseOpts,
    local_name,
    namespace_url,
    ns,
    parse_fragment,
    serialize::{SerializeOpts, TraversalScope, serialize},
    tendril::TendrilSink,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use tracing::warn;

/// Returns the synthetic `<html>` root that fragment parsing creates.
fn fragment_root(dom: &RcDom) -> Option<Handle> {
    dom.document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
}

/// Parse `markup` in a `<body>` context and serialise it again.
///
/// Unclosed elements are closed, stray markup characters in text are
/// escaped, and attribute syntax is made uniform. Should serialisation fail
/// the input is returned unchanged.
///
/// # Examples
///
/// ```
/// use markrite::normalize_fragment;
///
/// assert_eq!(normalize_fragment("<strong>open"), "<strong>open</strong>");
/// assert_eq!(normalize_fragment("a < b"), "a &lt; b");
/// ```
#[must_use]
pub fn normalize_fragment(markup: &str) -> String {
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom: RcDom =
        parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(markup);

    let Some(root) = fragment_root(&dom) else {
        return markup.to_string();
    };

    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..SerializeOpts::default()
    };
    if let Err(err) = serialize(&mut bytes, &SerializableHandle::from(root), opts) {
        warn!(%err, "failed to serialise normalised fragment");
        return markup.to_string();
    }
    String::from_utf8(bytes).unwrap_or_else(|_| markup.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_markup_is_stable() {
        let html = "<h1>Title</h1><ul><li>a</li><li>b</li></ul>";
        assert_eq!(normalize_fragment(html), html);
    }

    #[test]
    fn closes_dangling_elements() {
        assert_eq!(normalize_fragment("<em>x"), "<em>x</em>");
    }

    #[test]
    fn void_elements_lose_self_closing_slash() {
        assert_eq!(
            normalize_fragment(r#"<img src="a.png" alt="a" />"#),
            r#"<img src="a.png" alt="a">"#
        );
    }

    #[test]
    fn boolean_attributes_gain_empty_values() {
        assert_eq!(
            normalize_fragment(r#"<input type="checkbox" disabled>"#),
            r#"<input type="checkbox" disabled="">"#
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_fragment(""), "");
    }
}
