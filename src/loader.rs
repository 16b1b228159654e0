//! Tab content loader.
//!
//! Each configured tab names a fragment file. Loading one puts a spinner in
//! the tab's panel, fetches the fragment from a [`FragmentSource`], and
//! replaces the spinner with the fragment's content root:
//!
//! 1. `.container` if the fragment has one, else `main`
//! 2. minus the first `h1` inside it (the panel's tab button is the title)
//!
//! Fragments are whole pages that also work standalone, so everything outside
//! the content root (head, site chrome) is dropped.
//!
//! Any failure is logged and leaves the panel showing
//! `Content not available.` in place of the spinner.

use crate::dom::{Document, NodeId};
use crate::render;
use pulldown_cmark::{Parser, html as md_html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error("fragment path escapes the site directory: {0}")]
    InvalidPath(String),
    #[error("no element with id '{0}' to load into")]
    MissingContainer(String),
    #[error("{0} has no .container or <main>")]
    NoContent(String),
}

/// Where fragment files come from (`fetch`).
pub trait FragmentSource {
    /// Return the HTML for `path`.
    fn fetch(&self, path: &str) -> Result<String, LoadError>;
}

/// Fragments read from a site directory.
///
/// `.md` files are rendered to HTML and wrapped in `<main>`, so Markdown
/// sources load the same way as HTML pages.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(LoadError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl FragmentSource for DirSource {
    fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let file = self.resolve(path)?;
        if !file.is_file() {
            return Err(LoadError::NotFound(path.to_string()));
        }
        let content = fs::read_to_string(&file)?;
        if file.extension().is_some_and(|e| e == "md") {
            Ok(format!("<main>{}</main>", markdown_to_html(&content)))
        } else {
            Ok(content)
        }
    }
}

/// Fragments held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, html: &str) -> Self {
        self.insert(path, html);
        self
    }

    pub fn insert(&mut self, path: &str, html: &str) {
        self.files.insert(path.to_string(), html.to_string());
    }
}

impl FragmentSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<String, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// Parse a fetched page and return it with its content root, first `h1`
/// already removed.
pub fn extract_content(path: &str, html: &str) -> Result<(Document, NodeId), LoadError> {
    let mut page = Document::parse(html);
    let root = page
        .query(page.root(), ".container")
        .or_else(|| page.query(page.root(), "main"))
        .ok_or_else(|| LoadError::NoContent(path.to_string()))?;
    if let Some(heading) = page.query(root, "h1") {
        page.detach(heading);
    }
    Ok((page, root))
}

/// Load `path` into the element with id `tab`.
///
/// Returns the number of top-level nodes injected. On failure the panel shows
/// the placeholder instead, except when the panel itself is missing.
pub fn load_tab(
    doc: &mut Document,
    source: &dyn FragmentSource,
    tab: &str,
    path: &str,
) -> Result<usize, LoadError> {
    let Some(container) = doc.get_element_by_id(tab) else {
        let err = LoadError::MissingContainer(tab.to_string());
        warn!(tab, path, %err, "tab load failed");
        return Err(err);
    };

    doc.set_inner_html(container, &render::render_spinner().into_string());

    let fetched = source
        .fetch(path)
        .and_then(|html| extract_content(path, &html));
    match fetched {
        Ok((page, root)) => {
            doc.clear_children(container);
            let children = page.children(root).to_vec();
            for child in &children {
                let copy = doc.import(&page, *child);
                doc.append_child(container, copy);
            }
            debug!(tab, path, nodes = children.len(), "tab loaded");
            Ok(children.len())
        }
        Err(err) => {
            warn!(tab, path, %err, "tab load failed");
            doc.set_inner_html(container, &render::render_placeholder().into_string());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    const SHELL: &str = r#"<section id="code" class="tab-content"><p>old</p></section>"#;

    fn load(source: &MemorySource, path: &str) -> (Document, Result<usize, LoadError>) {
        let mut doc = Document::parse(SHELL);
        let result = load_tab(&mut doc, source, "code", path);
        (doc, result)
    }

    #[test]
    fn container_content_is_injected_without_first_heading() {
        let source = MemorySource::new().with(
            "ideas.html",
            &fragment_page(r#"<p class="lead">Ideas</p><h1>Second</h1>"#),
        );
        let (doc, result) = load(&source, "ideas.html");

        assert_eq!(result.unwrap(), 2);
        let panel = by_id(&doc, "code");
        assert_eq!(
            doc.inner_html(panel),
            r#"<p class="lead">Ideas</p><h1>Second</h1>"#
        );
    }

    #[test]
    fn main_is_used_when_there_is_no_container() {
        let source = MemorySource::new().with(
            "about.html",
            "<header>chrome</header><main><h1 class=\"t\">About</h1><p>Me</p></main>",
        );
        let (doc, result) = load(&source, "about.html");
        assert!(result.is_ok());
        assert_eq!(doc.inner_html(by_id(&doc, "code")), "<p>Me</p>");
    }

    #[test]
    fn container_wins_over_main() {
        let source = MemorySource::new().with(
            "p.html",
            r#"<main><div class="container"><p>inner</p></div><p>outer</p></main>"#,
        );
        let (doc, _) = load(&source, "p.html");
        assert_eq!(doc.inner_html(by_id(&doc, "code")), "<p>inner</p>");
    }

    #[test]
    fn missing_fragment_renders_placeholder() {
        let (doc, result) = load(&MemorySource::new(), "ideas.html");
        assert!(matches!(result, Err(LoadError::NotFound(_))));

        let panel = by_id(&doc, "code");
        assert_eq!(doc.text_content(panel), "Content not available.");
        assert!(doc.query(panel, ".loading-spinner").is_none());
    }

    #[test]
    fn page_without_content_root_renders_placeholder() {
        let source = MemorySource::new().with("bare.html", "<div><p>no root</p></div>");
        let (doc, result) = load(&source, "bare.html");
        assert!(matches!(result, Err(LoadError::NoContent(_))));
        assert_eq!(doc.text_content(by_id(&doc, "code")), "Content not available.");
    }

    #[test]
    fn missing_panel_is_an_error_and_touches_nothing() {
        let mut doc = Document::parse(SHELL);
        let before = doc.inner_html(doc.body());
        let result = load_tab(&mut doc, &stock_fragments(), "objects", "objects.html");
        assert!(matches!(result, Err(LoadError::MissingContainer(_))));
        assert_eq!(doc.inner_html(doc.body()), before);
    }

    #[test]
    fn loaded_carousel_markup_is_not_built_yet() {
        let mut doc = Document::parse(SHELL);
        load_tab(&mut doc, &stock_fragments(), "code", "ideas.html").unwrap();
        assert_eq!(doc.query_all(doc.root(), "#code .entry").len(), 3);
        assert!(doc.query_all(doc.root(), ".carousel-dot").is_empty());
    }

    // =========================================================================
    // DirSource
    // =========================================================================

    #[test]
    fn dir_source_reads_html_and_renders_markdown() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("about.html"), "<main><p>hi</p></main>").unwrap();
        fs::write(tmp.path().join("notes.md"), "# Notes\n\nSome *text*.\n").unwrap();
        let source = DirSource::new(tmp.path());

        assert_eq!(source.fetch("about.html").unwrap(), "<main><p>hi</p></main>");

        let md = source.fetch("notes.md").unwrap();
        assert!(md.starts_with("<main><h1>Notes</h1>"));
        assert!(md.contains("<em>text</em>"));
    }

    #[test]
    fn markdown_tab_loses_its_title() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.md"), "# Notes\n\nBody.\n").unwrap();
        let source = DirSource::new(tmp.path());

        let mut doc = Document::parse(SHELL);
        load_tab(&mut doc, &source, "code", "notes.md").unwrap();
        assert_eq!(doc.text_content(by_id(&doc, "code")).trim(), "Body.");
    }

    #[test]
    fn dir_source_rejects_escaping_paths() {
        let tmp = TempDir::new().unwrap();
        let source = DirSource::new(tmp.path());
        assert!(matches!(source.fetch("../secret.html"), Err(LoadError::InvalidPath(_))));
        assert!(matches!(source.fetch("/etc/passwd"), Err(LoadError::InvalidPath(_))));
        assert!(matches!(source.fetch("missing.html"), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn nested_paths_are_allowed() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("pages/a.html"), "<main>a</main>").unwrap();
        let source = DirSource::new(tmp.path());
        assert!(source.fetch("pages/a.html").is_ok());
        assert!(source.fetch("./pages/a.html").is_ok());
    }
}
