//! The page: one document plus every component wired to it.
//!
//! [`Page::boot`] plays the part of the `DOMContentLoaded` bootstrap:
//!
//! 1. load each configured tab's fragment into its panel; tabs marked
//!    `enhance` then get carousels built and screenshots bound to the lightbox
//! 2. apply the saved or preferred theme
//! 3. attach the mobile menu and the back-to-top button
//! 4. show the tab named by the location hash, if any
//!
//! After that, [`Page::dispatch`] delivers one event at a time to every
//! component, the same way a browser runs each listener to completion.

use crate::back_to_top::{BackToTop, BackToTopAction};
use crate::carousel::{self, Carousel, CarouselSettings};
use crate::config::SiteConfig;
use crate::context::{Environment, Navigation, Storage};
use crate::dom::{Document, NodeId};
use crate::events::{Dispatch, Event};
use crate::lightbox::Lightbox;
use crate::loader::{self, FragmentSource};
use crate::menu::MobileMenu;
use crate::render;
use crate::router::TabRouter;
use crate::theme::{self, Theme, ThemeToggle};
use tracing::{debug, info};

/// The ambient browser state a page runs against.
pub struct Contexts {
    pub navigation: Box<dyn Navigation>,
    pub storage: Box<dyn Storage>,
    pub source: Box<dyn FragmentSource>,
    pub environment: Environment,
}

/// How loading one tab went.
#[derive(Debug, Clone, PartialEq)]
pub struct TabLoad {
    pub tab: String,
    pub source: String,
    pub outcome: LoadOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        nodes: usize,
        carousels: usize,
        images: usize,
    },
    Failed(String),
}

/// Observable state of one live carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState {
    /// Panel the carousel sits in, if any.
    pub tab: Option<String>,
    pub current: usize,
    pub entries: usize,
    pub announcement: String,
}

/// Everything a user could see change, in one value.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub active_tab: Option<String>,
    pub hash: String,
    pub theme: Theme,
    pub menu_open: bool,
    pub lightbox_open: bool,
    pub back_to_top_visible: bool,
    pub scroll_y: f64,
    pub carousels: Vec<CarouselState>,
}

pub struct Page {
    doc: Document,
    config: SiteConfig,
    nav: Box<dyn Navigation>,
    storage: Box<dyn Storage>,
    source: Box<dyn FragmentSource>,
    env: Environment,
    router: TabRouter,
    carousels: Vec<Carousel>,
    lightbox: Option<Lightbox>,
    theme: Option<ThemeToggle>,
    menu: Option<MobileMenu>,
    back_to_top: Option<BackToTop>,
    scroll_y: f64,
    loads: Vec<TabLoad>,
}

impl Page {
    /// A page over the shell rendered from `config`.
    pub fn new(config: SiteConfig, contexts: Contexts) -> Self {
        let doc = Document::parse(&render::render_shell(&config).into_string());
        Self::from_document(doc, config, contexts)
    }

    /// A page over existing markup.
    pub fn from_document(doc: Document, config: SiteConfig, contexts: Contexts) -> Self {
        let router = TabRouter::new(config.default_tab.clone());
        Self {
            doc,
            config,
            nav: contexts.navigation,
            storage: contexts.storage,
            source: contexts.source,
            env: contexts.environment,
            router,
            carousels: Vec::new(),
            lightbox: None,
            theme: None,
            menu: None,
            back_to_top: None,
            scroll_y: 0.0,
            loads: Vec::new(),
        }
    }

    /// Run the startup sequence. Call once.
    pub fn boot(&mut self) {
        let tabs: Vec<_> = self
            .config
            .tabs
            .iter()
            .filter_map(|t| t.source.clone().map(|s| (t.id.clone(), s, t.enhance)))
            .collect();
        for (tab, source, enhance) in tabs {
            let outcome = self.load_tab(&tab, &source, enhance);
            self.loads.push(TabLoad {
                tab,
                source,
                outcome,
            });
        }

        self.theme = ThemeToggle::init(
            &mut self.doc,
            self.storage.as_ref(),
            self.env,
            &self.config.theme.storage_key,
        );
        self.menu = MobileMenu::attach(&self.doc);
        self.back_to_top = BackToTop::attach(&self.doc, self.config.back_to_top.offset);

        let initial = self.router.show_initial(&mut self.doc, self.nav.as_mut());
        info!(
            tabs = self.loads.len(),
            carousels = self.carousels.len(),
            initial = initial.as_deref().unwrap_or(self.router.default_tab()),
            "page booted"
        );
    }

    fn load_tab(&mut self, tab: &str, source: &str, enhance: bool) -> LoadOutcome {
        match loader::load_tab(&mut self.doc, self.source.as_ref(), tab, source) {
            Ok(nodes) => {
                let (carousels, images) = if enhance {
                    (self.init_carousels(Some(tab)), self.init_lightbox(Some(tab)))
                } else {
                    (0, 0)
                };
                LoadOutcome::Loaded {
                    nodes,
                    carousels,
                    images,
                }
            }
            Err(err) => LoadOutcome::Failed(err.to_string()),
        }
    }

    /// Build carousels under `scope` (an element id) or the whole document.
    /// Returns how many were newly built.
    pub fn init_carousels(&mut self, scope: Option<&str>) -> usize {
        let settings = CarouselSettings::from(&self.config.carousel);
        let built = carousel::init_carousels(&mut self.doc, scope, settings);
        let count = built.len();
        self.carousels.extend(built);
        count
    }

    /// Bind `.screenshot` images under `scope` to the lightbox. Returns how
    /// many were newly bound; zero without lightbox markup.
    pub fn init_lightbox(&mut self, scope: Option<&str>) -> usize {
        if self.lightbox.is_none() {
            self.lightbox = Lightbox::attach(&self.doc);
        }
        match self.lightbox.as_mut() {
            Some(lightbox) => lightbox.bind(&mut self.doc, scope),
            None => 0,
        }
    }

    /// Deliver one event to every component.
    pub fn dispatch(&mut self, event: &Event) -> Dispatch {
        self.prune_carousels();
        let mut result = Dispatch::default();

        match event {
            Event::PopState { state } => {
                self.router
                    .pop_state(&mut self.doc, self.nav.as_mut(), state.as_ref());
                result.handled = true;
            }
            Event::Change { target, checked } => {
                if *checked {
                    self.doc.set_attr(*target, "checked", "");
                } else {
                    self.doc.remove_attr(*target, "checked");
                }
            }
            Event::Scroll { y } => self.scroll_y = *y,
            Event::Click { target } => {
                if self.router.click(&mut self.doc, self.nav.as_mut(), *target) {
                    result.handled = true;
                    result.default_prevented = true;
                }
            }
            _ => {}
        }

        if let Some(menu) = &self.menu {
            result.handled |= menu.handle(&mut self.doc, event);
        }
        if let Some(lightbox) = &self.lightbox {
            result.handled |= lightbox.handle(&mut self.doc, event);
        }
        for carousel in &mut self.carousels {
            result.handled |= carousel.handle(&mut self.doc, event);
        }
        if let Some(theme) = &self.theme {
            result.handled |= theme.handle(&mut self.doc, self.storage.as_mut(), event);
        }
        let action = self
            .back_to_top
            .as_ref()
            .and_then(|button| button.handle(&mut self.doc, event));
        match action {
            Some(BackToTopAction::ScrollToTop) => {
                self.scroll_to(0.0);
                result.handled = true;
            }
            Some(BackToTopAction::Updated) => result.handled = true,
            None => {}
        }

        result
    }

    /// Carousels live only as long as their container is in the document.
    fn prune_carousels(&mut self) {
        let before = self.carousels.len();
        let doc = &self.doc;
        self.carousels.retain(|c| doc.is_attached(c.container()));
        let dropped = before - self.carousels.len();
        if dropped > 0 {
            debug!(dropped, "dropped carousels with detached containers");
        }
    }

    /// `window.scrollTo`: moves the page and fires the resulting scroll event.
    pub fn scroll_to(&mut self, y: f64) -> Dispatch {
        self.dispatch(&Event::Scroll { y })
    }

    /// History back; `None` at the start of the session.
    pub fn back(&mut self) -> Option<Dispatch> {
        let event = self.nav.back()?;
        Some(self.dispatch(&event))
    }

    /// History forward; `None` at the end of the session.
    pub fn forward(&mut self) -> Option<Dispatch> {
        let event = self.nav.forward()?;
        Some(self.dispatch(&event))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn loads(&self) -> &[TabLoad] {
        &self.loads
    }

    pub fn carousels(&self) -> &[Carousel] {
        &self.carousels
    }

    /// The first live carousel inside the panel `tab`.
    pub fn carousel_in(&self, tab: &str) -> Option<&Carousel> {
        let panel = self.doc.get_element_by_id(tab)?;
        self.carousels
            .iter()
            .find(|c| {
                self.doc.is_attached(c.container()) && self.doc.contains(panel, c.container())
            })
    }

    /// Id of the `.tab-content` panel containing `node`.
    pub fn tab_of(&self, node: NodeId) -> Option<&str> {
        let panel = self.doc.closest(node, ".tab-content")?;
        self.doc.id(panel)
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn lightbox_open(&self) -> bool {
        self.lightbox.as_ref().is_some_and(|l| l.is_open(&self.doc))
    }

    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(|m| m.is_open(&self.doc))
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top
            .as_ref()
            .is_some_and(|b| b.is_visible(&self.doc))
    }

    pub fn theme(&self) -> Theme {
        theme::current_theme(&self.doc)
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Id of the visible tab panel.
    pub fn active_tab(&self) -> Option<&str> {
        self.doc
            .query_all(self.doc.root(), ".tab-content")
            .into_iter()
            .find(|&n| self.doc.has_class(n, "active"))
            .and_then(|n| self.doc.id(n))
    }

    /// `location.hash`.
    pub fn hash(&self) -> String {
        self.nav.hash()
    }

    pub fn state(&self) -> PageState {
        let carousels = self
            .carousels
            .iter()
            .filter(|c| self.doc.is_attached(c.container()))
            .map(|c| CarouselState {
                tab: self.tab_of(c.container()).map(str::to_string),
                current: c.current_index(),
                entries: c.entry_count(),
                announcement: c.announcement(&self.doc),
            })
            .collect();
        PageState {
            active_tab: self.active_tab().map(str::to_string),
            hash: self.hash(),
            theme: self.theme(),
            menu_open: self.menu_open(),
            lightbox_open: self.lightbox_open(),
            back_to_top_visible: self.back_to_top_visible(),
            scroll_y: self.scroll_y,
            carousels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabConfig;
    use crate::context::MemoryStorage;
    use crate::events::{Key, TouchPoint};
    use crate::loader::MemorySource;
    use crate::test_helpers::*;

    fn booted(url: &str) -> Page {
        let mut page = test_page(url, stock_fragments());
        page.boot();
        page
    }

    fn click(page: &mut Page, selector: &str) -> Dispatch {
        let target = query_one(page.document(), selector);
        page.dispatch(&Event::Click { target })
    }

    // =========================================================================
    // Boot
    // =========================================================================

    #[test]
    fn boot_loads_every_tab_and_enhances_configured_ones() {
        let page = booted("index.html");
        let outcomes: Vec<_> = page
            .loads()
            .iter()
            .map(|l| (l.tab.as_str(), l.outcome.clone()))
            .collect();
        let counts: Vec<_> = outcomes
            .iter()
            .map(|(tab, outcome)| match outcome {
                LoadOutcome::Loaded { carousels, images, .. } => (*tab, *carousels, *images),
                LoadOutcome::Failed(reason) => panic!("{tab} failed: {reason}"),
            })
            .collect();
        assert_eq!(
            counts,
            [("home", 0, 0), ("about", 0, 0), ("code", 1, 3), ("objects", 1, 4)]
        );
        assert_eq!(page.carousels().len(), 2);
    }

    #[test]
    fn carousels_come_up_on_slide_one() {
        let page = booted("index.html");
        let code = page.carousel_in("code").unwrap();
        assert_eq!(code.entry_count(), 3);
        assert_eq!(code.announcement(page.document()), "Slide 1 of 3");
        let objects = page.carousel_in("objects").unwrap();
        assert_eq!(objects.announcement(page.document()), "Slide 1 of 4");
    }

    #[test]
    fn failed_load_shows_placeholder_and_builds_nothing() {
        let source = MemorySource::new().with("home.html", &fragment_page("<p>hi</p>"));
        let mut page = test_page("index.html", source);
        page.boot();

        assert!(matches!(page.loads()[2].outcome, LoadOutcome::Failed(_)));
        let code = by_id(page.document(), "code");
        assert_eq!(page.document().text_content(code), "Content not available.");
        assert!(page.carousels().is_empty());
    }

    #[test]
    fn initial_hash_selects_tab() {
        let page = booted("index.html#objects");
        assert_eq!(page.active_tab(), Some("objects"));
        assert_eq!(page.hash(), "#objects");
    }

    #[test]
    fn without_hash_default_tab_stays_active() {
        let page = booted("index.html");
        assert_eq!(page.active_tab(), Some("home"));
    }

    #[test]
    fn unenhanced_tabs_keep_raw_carousel_markup() {
        let mut config = SiteConfig::default();
        config.tabs = vec![TabConfig::new("code", "Code", Some("ideas.html"), false)];
        config.default_tab = "code".into();
        let mut page =
            test_page_with(config, "index.html", stock_fragments(), MemoryStorage::new());
        page.boot();

        assert!(page.carousels().is_empty());
        assert!(page.document().query(page.document().root(), ".carousel-dot").is_none());
        assert_eq!(page.init_carousels(None), 1);
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[test]
    fn tab_click_is_routed_and_prevents_default() {
        let mut page = booted("index.html");
        let result = click(&mut page, ".tab-button[data-tab=\"code\"]");
        assert!(result.handled);
        assert!(result.default_prevented);
        assert_eq!(page.active_tab(), Some("code"));
        assert_eq!(page.hash(), "#code");
    }

    #[test]
    fn back_and_forward_restore_tabs() {
        let mut page = booted("index.html");
        click(&mut page, ".tab-button[data-tab=\"code\"]");
        click(&mut page, ".tab-button[data-tab=\"objects\"]");

        page.back().unwrap();
        assert_eq!(page.active_tab(), Some("code"));
        page.back().unwrap();
        assert_eq!(page.active_tab(), Some("home"));
        assert!(page.back().is_none());

        page.forward().unwrap();
        assert_eq!(page.active_tab(), Some("code"));
    }

    #[test]
    fn carousel_events_reach_only_their_carousel() {
        let mut page = booted("index.html");
        click(&mut page, "#objects .next");

        let doc = page.document();
        assert_eq!(page.carousel_in("objects").unwrap().current_index(), 1);
        assert_eq!(page.carousel_in("code").unwrap().current_index(), 0);
        assert_eq!(
            page.carousel_in("objects").unwrap().announcement(doc),
            "Slide 2 of 4"
        );
    }

    #[test]
    fn keyboard_and_swipe_through_dispatch() {
        let mut page = booted("index.html#code");
        let container = query_one(page.document(), "#code .timeline");

        page.dispatch(&Event::KeyDown {
            target: Some(container),
            key: Key::ArrowLeft,
        });
        assert_eq!(page.carousel_in("code").unwrap().current_index(), 2);

        page.dispatch(&Event::TouchStart {
            target: container,
            point: TouchPoint::new(300.0, 10.0),
        });
        page.dispatch(&Event::TouchEnd {
            target: container,
            point: TouchPoint::new(200.0, 12.0),
        });
        assert_eq!(page.carousel_in("code").unwrap().current_index(), 0);
    }

    #[test]
    fn screenshots_in_enhanced_tabs_open_the_lightbox() {
        let mut page = booted("index.html");
        click(&mut page, "#objects .screenshot");
        assert!(page.lightbox_open());
        assert_eq!(
            page.document().style(page.document().body(), "overflow"),
            Some("hidden")
        );

        page.dispatch(&Event::KeyDown {
            target: None,
            key: Key::Escape,
        });
        assert!(!page.lightbox_open());
    }

    #[test]
    fn about_screenshot_is_not_bound() {
        let mut page = booted("index.html");
        let result = click(&mut page, "#about .screenshot");
        assert!(!result.handled);
        assert!(!page.lightbox_open());
    }

    #[test]
    fn theme_toggle_switches_to_dark() {
        let mut page = booted("index.html");
        let toggle = by_id(page.document(), "darkModeToggle");
        page.dispatch(&Event::Change {
            target: toggle,
            checked: true,
        });
        assert_eq!(page.theme(), Theme::Dark);
        assert!(page.document().has_attr(toggle, "checked"));
    }

    #[test]
    fn saved_theme_applies_at_boot() {
        let storage = MemoryStorage::new().with_item("theme", "dark");
        let mut page =
            test_page_with(SiteConfig::default(), "index.html", stock_fragments(), storage);
        page.boot();
        assert_eq!(page.theme(), Theme::Dark);
    }

    #[test]
    fn menu_closes_when_a_tab_is_chosen() {
        let mut page = booted("index.html");
        click(&mut page, "#menuToggle");
        assert!(page.menu_open());

        click(&mut page, ".tab-button[data-tab=\"about\"]");
        assert!(!page.menu_open());
        assert_eq!(page.active_tab(), Some("about"));
    }

    #[test]
    fn back_to_top_follows_scroll_and_click_scrolls_up() {
        let mut page = booted("index.html");
        page.dispatch(&Event::Scroll { y: 800.0 });
        assert!(page.back_to_top_visible());

        click(&mut page, "#backToTop");
        assert_eq!(page.scroll_y(), 0.0);
        assert!(!page.back_to_top_visible());
    }

    #[test]
    fn replaced_content_drops_its_carousel() {
        let mut page = booted("index.html");
        assert_eq!(page.carousels().len(), 2);

        let code = by_id(page.document(), "code");
        page.document_mut().set_inner_html(code, "<p>gone</p>");
        page.dispatch(&Event::Scroll { y: 0.0 });

        assert_eq!(page.carousels().len(), 1);
        assert!(page.carousel_in("code").is_none());
    }

    #[test]
    fn reloaded_tab_gets_a_fresh_carousel() {
        let mut page = booted("index.html");
        let code = by_id(page.document(), "code");
        page.document_mut().clear_children(code);
        page.dispatch(&Event::Scroll { y: 0.0 });

        let html = carousel_markup(5);
        page.document_mut().set_inner_html(code, &html);
        assert_eq!(page.init_carousels(Some("code")), 1);
        assert_eq!(page.carousel_in("code").unwrap().entry_count(), 5);
        assert_eq!(page.init_carousels(None), 0);
    }

    #[test]
    fn state_snapshot_reflects_interaction() {
        let mut page = booted("index.html");
        click(&mut page, ".tab-button[data-tab=\"code\"]");
        click(&mut page, "#code .prev");

        let state = page.state();
        assert_eq!(state.active_tab.as_deref(), Some("code"));
        assert_eq!(state.hash, "#code");
        assert_eq!(state.theme, Theme::Light);
        assert!(!state.menu_open);
        assert_eq!(state.carousels.len(), 2);
        assert_eq!(
            state.carousels[0],
            CarouselState {
                tab: Some("code".into()),
                current: 2,
                entries: 3,
                announcement: "Slide 3 of 3".into(),
            }
        );
    }

    #[test]
    fn tab_of_finds_enclosing_panel() {
        let page = booted("index.html");
        let next = query_one(page.document(), "#objects .next");
        assert_eq!(page.tab_of(next), Some("objects"));
        assert_eq!(page.tab_of(page.document().body()), None);
    }
}
