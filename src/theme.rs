//! Dark mode toggle.
//!
//! The `#darkModeToggle` checkbox drives a `data-theme="dark"` attribute on
//! the document element; the stylesheet keys its dark palette on that
//! attribute. The choice is saved as `dark` or `light` under a storage key so
//! it survives reloads. With nothing saved, the user agent's color-scheme
//! preference decides the initial state.

use crate::context::{Environment, Storage};
use crate::dom::{Document, NodeId};
use crate::events::Event;
use tracing::{debug, warn};

const TOGGLE_ID: &str = "darkModeToggle";
const THEME_ATTR: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Theme applied at startup: a saved `dark` wins, any other saved value is
/// light, and a missing or empty value defers to the environment.
pub fn initial_theme(saved: Option<&str>, env: Environment) -> Theme {
    match saved.filter(|s| !s.is_empty()) {
        Some("dark") => Theme::Dark,
        Some(_) => Theme::Light,
        None if env.prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

/// Current theme as the document shows it.
pub fn current_theme(doc: &Document) -> Theme {
    match doc.attr(doc.root(), THEME_ATTR) {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    }
}

#[derive(Debug, Clone)]
pub struct ThemeToggle {
    toggle: NodeId,
    storage_key: String,
}

impl ThemeToggle {
    /// Bind to `#darkModeToggle` and apply the initial theme.
    ///
    /// A store that cannot be read counts as empty.
    pub fn init(
        doc: &mut Document,
        storage: &dyn Storage,
        env: Environment,
        storage_key: &str,
    ) -> Option<ThemeToggle> {
        let toggle = doc.get_element_by_id(TOGGLE_ID)?;
        let saved = storage.get_item(storage_key).unwrap_or_else(|err| {
            warn!(key = storage_key, %err, "could not read saved theme");
            None
        });
        let theme = initial_theme(saved.as_deref(), env);
        if theme == Theme::Dark {
            let root = doc.root();
            doc.set_attr(root, THEME_ATTR, "dark");
            doc.set_attr(toggle, "checked", "");
        }
        debug!(theme = theme.as_str(), saved = saved.is_some(), "theme initialized");
        Some(ThemeToggle {
            toggle,
            storage_key: storage_key.to_string(),
        })
    }

    pub fn toggle(&self) -> NodeId {
        self.toggle
    }

    /// Apply and persist a change of the checkbox. Save failures are logged;
    /// the theme still changes.
    pub fn set_checked(
        &self,
        doc: &mut Document,
        storage: &mut dyn Storage,
        checked: bool,
    ) -> Theme {
        let root = doc.root();
        let theme = if checked {
            doc.set_attr(root, THEME_ATTR, "dark");
            Theme::Dark
        } else {
            doc.remove_attr(root, THEME_ATTR);
            Theme::Light
        };
        if let Err(err) = storage.set_item(&self.storage_key, theme.as_str()) {
            warn!(key = %self.storage_key, %err, "could not save theme");
        }
        theme
    }

    /// React to a `change` event on the toggle.
    pub fn handle(&self, doc: &mut Document, storage: &mut dyn Storage, event: &Event) -> bool {
        match event {
            Event::Change { target, checked } if *target == self.toggle => {
                self.set_checked(doc, storage, *checked);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MemoryStorage, StoreError};

    const MARKUP: &str = r#"<input id="darkModeToggle" type="checkbox">"#;

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    fn dark() -> Environment {
        Environment { prefers_dark: true }
    }

    #[test]
    fn initial_theme_resolution() {
        let light = Environment::default();
        assert_eq!(initial_theme(Some("dark"), light), Theme::Dark);
        assert_eq!(initial_theme(Some("light"), dark()), Theme::Light);
        assert_eq!(initial_theme(Some("sepia"), dark()), Theme::Light);
        assert_eq!(initial_theme(None, dark()), Theme::Dark);
        assert_eq!(initial_theme(None, light), Theme::Light);
    }

    #[test]
    fn empty_saved_value_defers_to_environment() {
        assert_eq!(initial_theme(Some(""), dark()), Theme::Dark);
        assert_eq!(initial_theme(Some(""), Environment::default()), Theme::Light);
    }

    #[test]
    fn saved_dark_checks_toggle_and_marks_root() {
        let mut doc = Document::parse(MARKUP);
        let storage = MemoryStorage::new().with_item("theme", "dark");
        let toggle =
            ThemeToggle::init(&mut doc, &storage, Environment::default(), "theme").unwrap();

        assert_eq!(current_theme(&doc), Theme::Dark);
        assert!(doc.has_attr(toggle.toggle(), "checked"));
    }

    #[test]
    fn saved_light_overrides_dark_preference() {
        let mut doc = Document::parse(MARKUP);
        let storage = MemoryStorage::new().with_item("theme", "light");
        let toggle = ThemeToggle::init(&mut doc, &storage, dark(), "theme").unwrap();

        assert_eq!(current_theme(&doc), Theme::Light);
        assert!(!doc.has_attr(toggle.toggle(), "checked"));
    }

    #[test]
    fn change_events_apply_and_persist() {
        let mut doc = Document::parse(MARKUP);
        let mut storage = MemoryStorage::new();
        let toggle =
            ThemeToggle::init(&mut doc, &storage, Environment::default(), "theme").unwrap();
        let target = toggle.toggle();

        assert!(toggle.handle(&mut doc, &mut storage, &Event::Change { target, checked: true }));
        assert_eq!(doc.attr(doc.root(), "data-theme"), Some("dark"));
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));

        toggle.handle(&mut doc, &mut storage, &Event::Change { target, checked: false });
        assert_eq!(doc.attr(doc.root(), "data-theme"), None);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn changes_on_other_controls_are_ignored() {
        let mut doc = Document::parse(
            r#"<input id="darkModeToggle" type="checkbox"><input id="other" type="checkbox">"#,
        );
        let mut storage = MemoryStorage::new();
        let toggle =
            ThemeToggle::init(&mut doc, &storage, Environment::default(), "theme").unwrap();
        let other = doc.get_element_by_id("other").unwrap();

        let change = Event::Change {
            target: other,
            checked: true,
        };
        assert!(!toggle.handle(&mut doc, &mut storage, &change));
        assert_eq!(current_theme(&doc), Theme::Light);
    }

    #[test]
    fn save_failure_still_changes_theme() {
        let mut doc = Document::parse(MARKUP);
        let mut storage = ReadOnlyStorage;
        let toggle =
            ThemeToggle::init(&mut doc, &storage, Environment::default(), "theme").unwrap();

        assert_eq!(toggle.set_checked(&mut doc, &mut storage, true), Theme::Dark);
        assert_eq!(current_theme(&doc), Theme::Dark);
    }

    #[test]
    fn missing_toggle_is_a_no_op() {
        let mut doc = Document::parse("<p>no toggle</p>");
        let storage = MemoryStorage::new().with_item("theme", "dark");
        assert!(ThemeToggle::init(&mut doc, &storage, dark(), "theme").is_none());
        assert_eq!(current_theme(&doc), Theme::Light);
    }

    #[test]
    fn custom_storage_key() {
        let mut doc = Document::parse(MARKUP);
        let storage = MemoryStorage::new().with_item("folio-theme", "dark");
        ThemeToggle::init(&mut doc, &storage, Environment::default(), "folio-theme").unwrap();
        assert_eq!(current_theme(&doc), Theme::Dark);
    }
}
