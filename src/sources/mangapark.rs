//! Mangapark extraction: listing and detail assembly.
//!
//! Selector lists are ordered by priority; the first candidate with a
//! non-empty match wins. The site ships timestamps in a `data-time`
//! attribute because visible time text is relative ("3 days ago") and
//! useless for comparison. Markup varies across pages, so every field is
//! optional at extraction time; validity predicates below decide which
//! records survive.

use crate::dom::{Document, Node};
use crate::extract;
use crate::http_client::FetchRequest;
use crate::models::{CatalogPage, Chapter, Genre, MangaDetail, MangaSummary, PaginationInfo};
use std::collections::BTreeMap;

/// Which listing markup to expect; search pages and latest/browse pages
/// use structurally different item containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    Search,
    Latest,
}

const SEARCH_ITEM: &str = "div.flex.border-b.border-b-base-200";
const LATEST_ITEM: &str = "div.pl-3.grow.flex.flex-col";

const TITLE_SELECTORS: &[&str] = &["h3.font-bold a", "div.font-bold a"];
const LINK_SELECTORS: &[&str] = &["h3.font-bold a", "a.link-hover"];
const IMAGE_SELECTORS: &[&str] = &["img.w-full", "img"];
const LABEL_SELECTOR: &str = "span.badge";
const GENRE_STRIP: &str = "div.flex.flex-wrap.text-xs.opacity-70";
const RATING_SELECTOR: &str = "span.font-black";
const LATEST_CHAPTER_SELECTORS: &[&str] = &["a.link-hover.link-primary", "a.link-hover.link-pri"];

const TIME_SELECTOR: &str = "time";
const TIME_ATTR: &str = "data-time";

const DETAIL_TITLE_SELECTORS: &[&str] = &["h3.text-lg.font-bold a", "h3.font-bold a"];
const DETAIL_AUTHOR_SELECTORS: &[&str] = &["div.attr-author a", "div.attr-author span"];
const DETAIL_IMAGE_SELECTORS: &[&str] = &["div.detail-cover img", "img.w-full"];
const DETAIL_DESCRIPTION_SELECTORS: &[&str] = &["div.limit-html", "div.summary"];
const DETAIL_LANGUAGE_SELECTORS: &[&str] = &["div.attr-lang span", "div.attr-lang"];
const DETAIL_GENRES: &str = "div.attr-genres";
const GENRE_KEY_ATTR: &str = "q:key";
const GENRE_KEY_MISSING: &str = "undefined";

const CHAPTER_PANEL: &str = "div.scrollable-panel";
const CHAPTER_ITEM: &str = "div.flex.justify-between";
const CHAPTER_TITLE_SELECTORS: &[&str] = &["a.link-hover span", "a.link-hover"];
const CHAPTER_LINK_SELECTORS: &[&str] = &["a.link-hover"];

/// Fetch request for a search results page.
pub fn search_request(word: &str, page: u32) -> FetchRequest {
    FetchRequest::new("/search")
        .query("word", word)
        .query("page", page.to_string())
}

/// Fetch request for the latest-updates feed.
pub fn latest_request(page: u32) -> FetchRequest {
    FetchRequest::new("/latest").query("page", page.to_string())
}

/// Fetch request for a catalog browse page.
pub fn catalog_request(page: u32) -> FetchRequest {
    FetchRequest::new("/browse")
        .query("sort", "update")
        .query("page", page.to_string())
}

/// Fetch request for a title's detail page.
pub fn detail_request(slug: &str) -> FetchRequest {
    FetchRequest::new(format!("/title/{}", slug))
}

/// Builds a catalog page from a parsed listing document.
///
/// Item nodes without a title are noise (ads, trailing layout rows) and
/// are skipped entirely rather than surfaced as partial records.
/// Pagination comes from the configured catalog total, never from page
/// content.
pub fn assemble_listing(
    doc: &Document,
    mode: ListingMode,
    page: u32,
    limit: u32,
    total: u32,
) -> CatalogPage {
    let item_selector = match mode {
        ListingMode::Search => SEARCH_ITEM,
        ListingMode::Latest => LATEST_ITEM,
    };

    let nodes = doc.select_all(item_selector);
    let items: Vec<MangaSummary> = nodes.iter().filter_map(summary_from_node).collect();
    if items.len() < nodes.len() {
        log::debug!(
            "listing: {} of {} item nodes had no title and were skipped",
            nodes.len() - items.len(),
            nodes.len()
        );
    }

    CatalogPage {
        items,
        pagination: PaginationInfo::new(page, limit, total),
    }
}

/// Builds one full record from a parsed detail page.
///
/// Singleton fields are best-effort; absent ones yield empty strings so a
/// partially populated page still produces a usable record.
pub fn assemble_detail(doc: &Document) -> MangaDetail {
    let root = doc.root();
    MangaDetail {
        title: extract::first_text(&root, DETAIL_TITLE_SELECTORS).unwrap_or_default(),
        author: extract::first_text(&root, DETAIL_AUTHOR_SELECTORS).unwrap_or_default(),
        image: extract::first_attr(&root, DETAIL_IMAGE_SELECTORS, "src"),
        description: extract::first_text(&root, DETAIL_DESCRIPTION_SELECTORS).unwrap_or_default(),
        language: extract::first_text(&root, DETAIL_LANGUAGE_SELECTORS).unwrap_or_default(),
        genres: detail_genres(&root),
        chapters: detail_chapters(&root),
    }
}

/// A summary is valid only with a non-empty title.
fn summary_from_node(item: &Node) -> Option<MangaSummary> {
    let title = extract::first_text(item, TITLE_SELECTORS)?;
    Some(MangaSummary {
        title,
        link: extract::first_attr(item, LINK_SELECTORS, "href"),
        image: extract::first_attr(item, IMAGE_SELECTORS, "src"),
        image_alt: extract::first_attr(item, IMAGE_SELECTORS, "alt"),
        label: extract::text_of(item, LABEL_SELECTOR),
        last_updated: extract::attr_of(item, TIME_SELECTOR, TIME_ATTR),
        genres: extract::span_texts(item, GENRE_STRIP),
        rating: extract::text_of(item, RATING_SELECTOR),
        latest_chapter: extract::first_text(item, LATEST_CHAPTER_SELECTORS),
    })
}

/// Genre entries keyed by the dense index at which each was accepted.
///
/// The slug lives in the container spans' `q:key` attribute; spans whose
/// key is missing render the literal "undefined" and are dropped along
/// with empty keys.
fn detail_genres(root: &Node) -> BTreeMap<u32, Genre> {
    let mut genres = BTreeMap::new();
    let Some(container) = root.select_first(DETAIL_GENRES) else {
        return genres;
    };

    let mut index = 0u32;
    for child in container.child_elements() {
        if child.tag() != "span" {
            continue;
        }
        let slug = child.attr(GENRE_KEY_ATTR).map(str::trim).unwrap_or("");
        if slug.is_empty() || slug == GENRE_KEY_MISSING {
            continue;
        }
        let name = match child.select_first("span") {
            Some(label) => label.text(),
            None => child.text(),
        };
        genres.insert(
            index,
            Genre {
                slug: slug.to_string(),
                name,
            },
        );
        index += 1;
    }
    genres
}

/// Chapter rows from the scrollable panel; rows missing a title or link
/// are silently skipped.
fn detail_chapters(root: &Node) -> Vec<Chapter> {
    let Some(panel) = root.select_first(CHAPTER_PANEL) else {
        return Vec::new();
    };

    let mut chapters = Vec::new();
    for item in panel.select_all(CHAPTER_ITEM) {
        let title = extract::first_text(&item, CHAPTER_TITLE_SELECTORS).unwrap_or_default();
        let link = extract::first_attr(&item, CHAPTER_LINK_SELECTORS, "href").unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            log::debug!("detail: dropping chapter row without title or link");
            continue;
        }
        chapters.push(Chapter {
            title,
            link,
            timestamp: extract::attr_of(&item, TIME_SELECTOR, TIME_ATTR),
        });
    }
    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_paths_carry_pagination() {
        let req = search_request("one piece", 2);
        assert_eq!(req.path, "/search");
        assert!(req.query.contains(&("word".into(), "one piece".into())));
        assert!(req.query.contains(&("page".into(), "2".into())));

        assert_eq!(latest_request(1).path, "/latest");
        assert_eq!(catalog_request(3).path, "/browse");
        assert_eq!(detail_request("12345-en-sample").path, "/title/12345-en-sample");
    }

    #[test]
    fn search_and_latest_use_distinct_containers() {
        assert_ne!(SEARCH_ITEM, LATEST_ITEM);
    }
}
