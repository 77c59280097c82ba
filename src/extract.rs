//! Field-extraction primitives.
//!
//! Every function takes a scope node and returns an `Option` (or an empty
//! collection); absence is a normal outcome, never an error. Fields are
//! described by a fixed, ordered list of selector candidates and the first
//! selector yielding a non-empty match wins. Candidates are alternatives,
//! not merged.

use crate::dom::Node;

/// First non-empty trimmed text among the candidate selectors.
pub fn first_text(scope: &Node, candidates: &[&str]) -> Option<String> {
    for selector in candidates {
        for node in scope.select_all(selector) {
            let text = node.text();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty value of `attr` among the candidate selectors.
pub fn first_attr(scope: &Node, candidates: &[&str], attr: &str) -> Option<String> {
    for selector in candidates {
        for node in scope.select_all(selector) {
            if let Some(value) = node.attr(attr) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Trimmed text of the first match for a single designated selector.
/// An empty string is the same externally-observable state as absence.
pub fn text_of(scope: &Node, selector: &str) -> Option<String> {
    first_text(scope, &[selector])
}

/// Attribute of the first match for a single designated selector.
pub fn attr_of(scope: &Node, selector: &str, attr: &str) -> Option<String> {
    first_attr(scope, &[selector], attr)
}

/// Trimmed texts of a container's immediate span children, in encounter
/// order. Bare "," separator spans are dropped; duplicates are kept since
/// source order is authoritative.
pub fn span_texts(scope: &Node, container: &str) -> Vec<String> {
    let Some(container) = scope.select_first(container) else {
        return Vec::new();
    };
    container
        .child_elements()
        .into_iter()
        .filter(|child| child.tag() == "span")
        .map(|child| child.text())
        .filter(|text| !text.is_empty() && text.as_str() != ",")
        .collect()
}
