//! Shared test utilities for the tabfolio test suite.
//!
//! Provides markup builders, lookup helpers that panic with a clear message
//! on a miss, and a fully wired in-memory [`Page`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = carousel_doc(3);
//! let carousels = init_carousels(&mut doc, None, CarouselSettings::default());
//! assert_eq!(active_dot_indices(&doc, &carousels[0]), vec![0]);
//!
//! let mut page = test_page("index.html#code", MemorySource::new());
//! page.boot();
//! let next = query_one(page.document(), "#code .next");
//! ```

use crate::carousel::Carousel;
use crate::config::SiteConfig;
use crate::context::{Environment, MemoryHistory, MemoryStorage};
use crate::dom::{Document, NodeId};
use crate::loader::MemorySource;
use crate::page::{Contexts, Page};
use crate::render::{Slide, render_carousel};

// =========================================================================
// Markup builders
// =========================================================================

/// Markup for one complete carousel with `entries` slides.
pub fn carousel_markup(entries: usize) -> String {
    let slides: Vec<Slide> = (1..=entries)
        .map(|n| Slide {
            title: format!("Entry {n}"),
            image: Some(format!("images/entry-{n}.png")),
            caption: None,
        })
        .collect();
    render_carousel(&slides).into_string()
}

/// A document whose body is a single carousel with `entries` slides.
pub fn carousel_doc(entries: usize) -> Document {
    Document::parse(&carousel_markup(entries))
}

/// An HTML fragment page the way the site's tab sources look: a heading
/// that gets stripped, then a container with the real content.
pub fn fragment_page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>x</title></head><body>\
         <div class=\"container\"><h1>Page title</h1>{body}</div></body></html>"
    )
}

// =========================================================================
// Document lookups: panic with a clear message on miss
// =========================================================================

/// First element matching `selector` anywhere in the document. Panics if none.
pub fn query_one(doc: &Document, selector: &str) -> NodeId {
    doc.query(doc.root(), selector).unwrap_or_else(|| {
        panic!(
            "no element matches '{selector}'. Body: {}",
            doc.inner_html(doc.body())
        )
    })
}

/// Element with the given id. Panics if not found.
pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap_or_else(|| {
        let ids: Vec<&str> = doc
            .descendants(doc.root())
            .into_iter()
            .filter_map(|n| doc.id(n))
            .collect();
        panic!("no element with id '{id}'. Available: {ids:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Entry indices of every dot currently carrying `active`.
pub fn active_dot_indices(doc: &Document, carousel: &Carousel) -> Vec<usize> {
    carousel
        .dots()
        .iter()
        .filter(|dot| doc.has_class(dot.node, "active"))
        .map(|dot| dot.index)
        .collect()
}

/// Ids of every `.tab-content` panel currently carrying `active`.
pub fn active_tabs(doc: &Document) -> Vec<String> {
    doc.query_all(doc.root(), ".tab-content")
        .into_iter()
        .filter(|&n| doc.has_class(n, "active"))
        .filter_map(|n| doc.id(n).map(str::to_string))
        .collect()
}

// =========================================================================
// Page construction
// =========================================================================

/// Fragments for the four stock tabs. `code` and `objects` carry carousels.
pub fn stock_fragments() -> MemorySource {
    MemorySource::new()
        .with(
            "home.html",
            &fragment_page(r#"<p class="intro">Welcome.</p>"#),
        )
        .with(
            "about.html",
            &fragment_page(r#"<p>About me.</p><img class="screenshot" src="me.png" alt="Me">"#),
        )
        .with("ideas.html", &fragment_page(&carousel_markup(3)))
        .with("objects.html", &fragment_page(&carousel_markup(4)))
}

/// A page over the stock config, started at `url`, with in-memory contexts.
pub fn test_page(url: &str, source: MemorySource) -> Page {
    test_page_with(SiteConfig::default(), url, source, MemoryStorage::new())
}

pub fn test_page_with(
    config: SiteConfig,
    url: &str,
    source: MemorySource,
    storage: MemoryStorage,
) -> Page {
    Page::new(
        config,
        Contexts {
            navigation: Box::new(MemoryHistory::new(url)),
            storage: Box::new(storage),
            source: Box::new(source),
            environment: Environment::default(),
        },
    )
}
