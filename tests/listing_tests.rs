use komik_crawler::dom::Document;
use komik_crawler::models::PaginationInfo;
use komik_crawler::sources::mangapark::{self, ListingMode};

/// Latest-updates page with three item nodes: one fully populated, one
/// title-less ad block, one carrying badge/genres/rating/chapter.
fn latest_page() -> &'static str {
    r#"<html><body>
    <div class="grid">
      <div class="pl-3 grow flex flex-col">
        <h3 class="font-bold"><a href="/title/10001-en-sample-title">Sample Title</a></h3>
        <img class="w-full" src="https://img.example/10001.webp" alt="Sample Title">
        <time data-time="2024-01-01"></time>
      </div>
      <div class="pl-3 grow flex flex-col">
        <img class="w-full" src="https://img.example/ad.webp" alt="sponsored">
      </div>
      <div class="pl-3 grow flex flex-col">
        <h3 class="font-bold"><a href="/title/10002-en-other-title">Other Title</a></h3>
        <span class="badge">HOT</span>
        <div class="flex flex-wrap text-xs opacity-70">
          <span>Action</span><span>,</span><span>Drama</span>
        </div>
        <span class="font-black">8.9</span>
        <a class="link-hover link-primary" href="/title/10002-en-other-title/ch-42">Chapter 42</a>
      </div>
    </div>
    </body></html>"#
}

fn search_page() -> &'static str {
    r#"<html><body>
    <div class="flex border-b border-b-base-200">
      <h3 class="font-bold"><a href="/title/20001-en-found-title">Found Title</a></h3>
      <img class="w-full" src="https://img.example/20001.webp" alt="Found Title">
    </div>
    <div class="flex border-b border-b-base-200">
      <h3 class="font-bold"><a href="/title/20002-en-second-hit">Second Hit</a></h3>
    </div>
    </body></html>"#
}

#[test]
fn fully_populated_item_extracts_every_field() {
    let doc = Document::parse(latest_page()).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100);

    let item = &page.items[0];
    assert_eq!(item.title, "Sample Title");
    assert_eq!(item.link.as_deref(), Some("/title/10001-en-sample-title"));
    assert_eq!(item.image.as_deref(), Some("https://img.example/10001.webp"));
    assert_eq!(item.image_alt.as_deref(), Some("Sample Title"));
    assert_eq!(item.label, None);
    assert_eq!(item.last_updated.as_deref(), Some("2024-01-01"));
    assert!(item.genres.is_empty());
    assert_eq!(item.rating, None);
    assert_eq!(item.latest_chapter, None);
}

#[test]
fn badge_rating_and_chapter_extract_when_present() {
    let doc = Document::parse(latest_page()).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100);

    let item = &page.items[1];
    assert_eq!(item.title, "Other Title");
    assert_eq!(item.label.as_deref(), Some("HOT"));
    assert_eq!(item.rating.as_deref(), Some("8.9"));
    assert_eq!(item.latest_chapter.as_deref(), Some("Chapter 42"));
}

#[test]
fn genre_separator_tokens_are_dropped() {
    let doc = Document::parse(latest_page()).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100);

    assert_eq!(page.items[1].genres, vec!["Action", "Drama"]);
}

#[test]
fn title_less_items_are_skipped_entirely() {
    let doc = Document::parse(latest_page()).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100);

    // Three item nodes, one without a title.
    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|item| !item.title.is_empty()));
}

#[test]
fn all_titled_items_survive() {
    let doc = Document::parse(search_page()).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Search, 1, 10, 100);

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Found Title");
    assert_eq!(page.items[1].title, "Second Hit");
}

#[test]
fn listing_modes_expect_different_containers() {
    // A search page assembled in latest mode finds nothing, and vice
    // versa; the two page kinds use structurally different markers.
    let search_doc = Document::parse(search_page()).unwrap();
    let page = mangapark::assemble_listing(&search_doc, ListingMode::Latest, 1, 10, 100);
    assert!(page.items.is_empty());

    let latest_doc = Document::parse(latest_page()).unwrap();
    let page = mangapark::assemble_listing(&latest_doc, ListingMode::Search, 1, 10, 100);
    assert!(page.items.is_empty());
}

#[test]
fn empty_badge_is_the_same_as_no_badge() {
    let html = r#"<html><body>
    <div class="pl-3 grow flex flex-col">
      <h3 class="font-bold"><a href="/title/1">Titled</a></h3>
      <span class="badge"></span>
    </div>
    </body></html>"#;
    let doc = Document::parse(html).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100);

    assert_eq!(page.items[0].label, None);
}

#[test]
fn pagination_uses_the_configured_total_not_page_content() {
    let doc = Document::parse(latest_page()).unwrap();
    let page = mangapark::assemble_listing(&doc, ListingMode::Latest, 2, 36, 3564);

    assert_eq!(
        page.pagination,
        PaginationInfo {
            page: 2,
            limit: 36,
            total: 3564,
            total_pages: 99,
        }
    );
}

#[test]
fn assembly_is_deterministic_for_identical_markup() {
    let first = {
        let doc = Document::parse(latest_page()).unwrap();
        mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100)
    };
    let second = {
        let doc = Document::parse(latest_page()).unwrap();
        mangapark::assemble_listing(&doc, ListingMode::Latest, 1, 10, 100)
    };

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
