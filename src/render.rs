//! HTML rendering.
//!
//! Renders the single-page shell every other module operates on: header
//! with the theme switch and menu toggle, the tab navigation, one panel per
//! configured tab, the lightbox overlay and the back-to-top button. Also
//! renders the small fragments the loader injects (spinner, placeholder)
//! and carousel markup for content authors.
//!
//! ## Shell Structure
//!
//! ```text
//! header.site-header
//! ├── span.site-title
//! ├── label.theme-switch > input#darkModeToggle[type=checkbox]
//! ├── button#menuToggle[aria-controls=navMenu][aria-expanded=false]
//! └── nav#navMenu[role=tablist]
//!     └── button.tab-button[data-tab][aria-controls][aria-selected]  (one per tab)
//! main.tabs
//! └── section.tab-content#<tab id>[role=tabpanel]                    (one per tab)
//! div#lightbox.lightbox
//! ├── button#lightboxClose
//! ├── img#lightboxImg
//! └── p#lightboxCaption
//! button#backToTop.back-to-top
//! ```
//!
//! The default tab's button and panel are rendered `active`, so the page is
//! usable before any routing happens.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, SiteConfig, TabConfig};
use maud::{DOCTYPE, Markup, html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Full stylesheet: color variables from config, then the static rules.
pub fn site_css(config: &SiteConfig) -> String {
    let color_css = config::generate_color_css(&config.colors);
    format!("{}\n\n{}", color_css, CSS_STATIC)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header: title, theme switch, menu toggle and tab nav.
fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            span.site-title { (config.title) }
            label.theme-switch {
                input #darkModeToggle type="checkbox" aria-label="Dark mode";
                span.theme-slider {}
            }
            button #menuToggle .menu-toggle
                aria-controls="navMenu" aria-expanded="false" aria-label="Menu" {
                span.hamburger-line {}
                span.hamburger-line {}
                span.hamburger-line {}
            }
            (render_nav(&config.tabs, &config.default_tab))
        }
    }
}

/// Renders the tab navigation.
pub fn render_nav(tabs: &[TabConfig], current: &str) -> Markup {
    html! {
        nav #navMenu .nav-menu role="tablist" {
            @for tab in tabs {
                @let is_current = tab.id == current;
                button.tab-button.active[is_current]
                    type="button"
                    role="tab"
                    data-tab=(tab.id)
                    aria-controls=(tab.id)
                    aria-selected=(if is_current { "true" } else { "false" }) {
                    (tab.label)
                }
            }
        }
    }
}

fn render_panels(tabs: &[TabConfig], current: &str) -> Markup {
    html! {
        main.tabs {
            @for tab in tabs {
                section.tab-content.active[tab.id == current] id=(tab.id) role="tabpanel" {}
            }
        }
    }
}

fn render_lightbox() -> Markup {
    html! {
        div #lightbox .lightbox {
            button #lightboxClose .lightbox-close aria-label="Close" { "×" }
            img #lightboxImg src="" alt="";
            p #lightboxCaption .lightbox-caption {}
        }
    }
}

fn render_back_to_top() -> Markup {
    html! {
        button #backToTop .back-to-top aria-label="Back to top" { "↑" }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the complete single-page shell for a site.
pub fn render_shell(config: &SiteConfig) -> Markup {
    let css = site_css(config);
    let content = html! {
        (site_header(config))
        (render_panels(&config.tabs, &config.default_tab))
        (render_lightbox())
        (render_back_to_top())
    };
    base_document(&config.title, &css, content)
}

/// Spinner shown in a tab panel while its content loads.
pub fn render_spinner() -> Markup {
    html! {
        div.loading-spinner aria-label="Loading content" {
            div.spinner {}
        }
    }
}

/// Shown in place of content that failed to load.
pub fn render_placeholder() -> Markup {
    html! {
        p style="color: #6c757d;" { "Content not available." }
    }
}

/// One carousel slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub image: Option<String>,
    pub caption: Option<String>,
}

/// Renders carousel markup for `slides`: the wrapper of entries plus an
/// empty nav whose dot host is filled when the carousel is built.
pub fn render_carousel(slides: &[Slide]) -> Markup {
    html! {
        div.timeline {
            div.timeline-wrapper {
                @for slide in slides {
                    div.entry {
                        h3 { (slide.title) }
                        @if let Some(src) = &slide.image {
                            img.screenshot
                                src=(src)
                                alt=(slide.caption.as_deref().unwrap_or(&slide.title))
                                loading="lazy";
                        }
                        @if let Some(caption) = &slide.caption {
                            p.caption { (caption) }
                        }
                    }
                }
            }
            div.carousel-nav {
                button.prev type="button" aria-label="Previous slide" { "‹" }
                div.carousel-dots {}
                button.next type="button" aria-label="Next slide" { "›" }
            }
        }
    }
}
