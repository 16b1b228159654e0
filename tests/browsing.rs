//! End-to-end browsing sessions against the public API.
//!
//! Each test boots a page over in-memory fragments and drives it the way a
//! visitor would, asserting on the document afterwards.

use tabfolio::config::SiteConfig;
use tabfolio::context::{Environment, MemoryHistory, MemoryStorage, Storage};
use tabfolio::dom::NodeId;
use tabfolio::events::{Event, Key, TouchPoint};
use tabfolio::loader::MemorySource;
use tabfolio::page::{Contexts, Page};
use tabfolio::render::{Slide, render_carousel};
use tabfolio::theme::Theme;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn fragment(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>x</title></head><body>\
         <div class=\"container\"><h1>Heading</h1>{body}</div></body></html>"
    )
}

fn slides(n: usize) -> String {
    let slides: Vec<Slide> = (1..=n)
        .map(|i| Slide {
            title: format!("Project {i}"),
            image: Some(format!("shots/project-{i}.png")),
            caption: Some(format!("Project {i} screenshot")),
        })
        .collect();
    render_carousel(&slides).into_string()
}

fn source() -> MemorySource {
    MemorySource::new()
        .with("home.html", &fragment("<p>Hello</p>"))
        .with("about.html", &fragment("<p>About me</p>"))
        .with("ideas.html", &fragment(&slides(3)))
        .with("objects.html", &fragment(&slides(5)))
}

fn open(url: &str, storage: Box<dyn Storage>, environment: Environment) -> Page {
    let mut page = Page::new(
        SiteConfig::default(),
        Contexts {
            navigation: Box::new(MemoryHistory::new(url)),
            storage,
            source: Box::new(source()),
            environment,
        },
    );
    page.boot();
    page
}

fn visit(url: &str) -> Page {
    open(url, Box::new(MemoryStorage::new()), Environment::default())
}

fn find(page: &Page, selector: &str) -> NodeId {
    let doc = page.document();
    doc.query(doc.root(), selector)
        .unwrap_or_else(|| panic!("nothing matches {selector}"))
}

fn click(page: &mut Page, selector: &str) {
    let target = find(page, selector);
    page.dispatch(&Event::Click { target });
}

fn wrapper_transform(page: &Page, tab: &str) -> String {
    let wrapper = find(page, &format!("#{tab} .timeline-wrapper"));
    page.document()
        .style(wrapper, "transform")
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn visitor_browses_a_carousel() {
    let mut page = visit("index.html#objects");
    assert_eq!(page.active_tab(), Some("objects"));

    click(&mut page, "#objects .next");
    click(&mut page, "#objects .next");
    assert_eq!(wrapper_transform(&page, "objects"), "translateX(-200%)");

    // Fourth dot.
    let dots = page.document().query_all(find(&page, "#objects"), ".carousel-dot");
    assert_eq!(dots.len(), 5);
    page.dispatch(&Event::Click { target: dots[3] });
    assert_eq!(wrapper_transform(&page, "objects"), "translateX(-300%)");

    let container = find(&page, "#objects .timeline");
    page.dispatch(&Event::KeyDown {
        target: Some(container),
        key: Key::ArrowRight,
    });
    page.dispatch(&Event::KeyDown {
        target: Some(container),
        key: Key::ArrowRight,
    });
    let objects = page.carousel_in("objects").unwrap();
    assert_eq!(objects.current_index(), 0);
    assert_eq!(objects.announcement(page.document()), "Slide 1 of 5");

    // The other carousel never moved.
    assert_eq!(page.carousel_in("code").unwrap().current_index(), 0);
}

#[test]
fn swipes_follow_the_threshold() {
    let mut page = visit("index.html#code");
    let container = find(&page, "#code .timeline");
    let swipe = |page: &mut Page, from: f64, to: f64| {
        page.dispatch(&Event::TouchStart {
            target: container,
            point: TouchPoint::new(from, 10.0),
        });
        page.dispatch(&Event::TouchEnd {
            target: container,
            point: TouchPoint::new(to, 10.0),
        })
    };

    assert!(!swipe(&mut page, 200.0, 160.0).handled);
    assert!(swipe(&mut page, 200.0, 100.0).handled);
    assert_eq!(page.carousel_in("code").unwrap().current_index(), 1);
    assert!(swipe(&mut page, 100.0, 300.0).handled);
    assert!(swipe(&mut page, 100.0, 300.0).handled);
    assert_eq!(page.carousel_in("code").unwrap().current_index(), 2);
}

#[test]
fn screenshot_opens_in_lightbox_and_escape_closes() {
    let mut page = visit("index.html#code");
    click(&mut page, "#code .screenshot");
    assert!(page.lightbox_open());

    let img = find(&page, "#lightboxImg");
    assert_eq!(page.document().attr(img, "src"), Some("shots/project-1.png"));
    let body = page.document().body();
    assert_eq!(page.document().style(body, "overflow"), Some("hidden"));

    page.dispatch(&Event::KeyDown {
        target: None,
        key: Key::Escape,
    });
    assert!(!page.lightbox_open());
    assert_eq!(page.document().style(body, "overflow"), None);
}

#[test]
fn tab_clicks_record_history() {
    let mut page = visit("index.html");
    click(&mut page, ".tab-button[data-tab=\"about\"]");
    click(&mut page, ".tab-button[data-tab=\"code\"]");
    assert_eq!(page.hash(), "#code");

    page.back();
    assert_eq!(page.active_tab(), Some("about"));
    page.back();
    assert_eq!(page.active_tab(), Some("home"));
    page.forward();
    assert_eq!(page.active_tab(), Some("about"));

    let about = find(&page, "#about");
    assert!(page.document().has_class(about, "active"));
    assert_eq!(
        page.document().query_all(page.document().root(), ".tab-content.active").len(),
        1
    );
}

#[test]
fn headings_are_stripped_from_fragments() {
    let page = visit("index.html");
    let about = find(&page, "#about");
    assert_eq!(page.document().query(about, "h1"), None);
    assert_eq!(page.document().text_content(about).trim(), "About me");
}

#[test]
fn theme_choice_survives_into_the_next_visit() {
    let prefers_dark = Environment { prefers_dark: true };
    let mut page = open("index.html", Box::new(MemoryStorage::new()), prefers_dark);
    assert_eq!(page.theme(), Theme::Dark);

    let toggle = find(&page, "#darkModeToggle");
    page.dispatch(&Event::Change {
        target: toggle,
        checked: false,
    });
    assert_eq!(page.theme(), Theme::Light);

    let saved = MemoryStorage::new().with_item("theme", "light");
    let page = open("index.html", Box::new(saved), prefers_dark);
    assert_eq!(page.theme(), Theme::Light);
}

#[test]
fn scrolling_reveals_back_to_top() {
    let mut page = visit("index.html");
    page.scroll_to(900.0);
    assert!(page.back_to_top_visible());

    click(&mut page, "#backToTop");
    assert_eq!(page.scroll_y(), 0.0);
    assert!(!page.back_to_top_visible());
}
