//! Permissive document parsing.
//!
//! Wraps the HTML parser behind the small query surface the extractors
//! need: select by CSS selector in document order, read attributes, read
//! trimmed text. Markup is parsed permissively; absent elements are never
//! an error. Each `Document` is built for one request and discarded with
//! it, so nothing here is shared or synchronized.

use crate::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// A parsed markup payload, queryable by CSS selector.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a raw markup payload.
    ///
    /// Parsing only fails when there is nothing to tokenize: an empty or
    /// whitespace-only body indicates a corrupt response upstream. Broken
    /// or partial markup still yields a usable document.
    pub fn parse(raw_body: &str) -> Result<Self, ScrapeError> {
        if raw_body.trim().is_empty() {
            return Err(ScrapeError::Parse("response body is empty".into()));
        }
        Ok(Self {
            html: Html::parse_document(raw_body),
        })
    }

    /// The root element, for extractors that scope their own queries.
    pub fn root(&self) -> Node<'_> {
        Node {
            el: self.html.root_element(),
        }
    }

    /// All elements matching `selector`, in document order. An invalid
    /// selector matches nothing.
    pub fn select_all(&self, selector: &str) -> Vec<Node<'_>> {
        match compile(selector) {
            Some(sel) => self.html.select(&sel).map(|el| Node { el }).collect(),
            None => Vec::new(),
        }
    }

    pub fn select_first(&self, selector: &str) -> Option<Node<'_>> {
        self.select_all(selector).into_iter().next()
    }
}

/// A single element within a parsed document.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    el: ElementRef<'a>,
}

impl<'a> Node<'a> {
    /// Descendant elements matching `selector`, in document order.
    pub fn select_all(&self, selector: &str) -> Vec<Node<'a>> {
        match compile(selector) {
            Some(sel) => self.el.select(&sel).map(|el| Node { el }).collect(),
            None => Vec::new(),
        }
    }

    pub fn select_first(&self, selector: &str) -> Option<Node<'a>> {
        self.select_all(selector).into_iter().next()
    }

    /// Attribute value, including non-standard data-carrying attributes.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.el.value().attr(name)
    }

    /// Concatenated text content with surrounding whitespace trimmed.
    pub fn text(&self) -> String {
        self.el.text().collect::<String>().trim().to_string()
    }

    /// Immediate child elements, skipping text and comment nodes.
    pub fn child_elements(&self) -> Vec<Node<'a>> {
        self.el
            .children()
            .filter_map(ElementRef::wrap)
            .map(|el| Node { el })
            .collect()
    }

    pub fn tag(&self) -> &'a str {
        self.el.value().name()
    }
}

fn compile(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}
