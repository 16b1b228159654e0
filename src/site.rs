//! Site directory operations behind the CLI.
//!
//! A site directory holds an optional `config.toml` and the fragment files
//! the tabs load:
//!
//! ```text
//! site/
//! ├── config.toml        # optional, see `tabfolio gen-config`
//! ├── home.html
//! ├── about.html
//! ├── ideas.html         # carousel markup, enhanced
//! ├── objects.md         # Markdown works too
//! └── index.html         # written by `tabfolio render`
//! ```
//!
//! `check` boots the page headlessly against the directory, the same way a
//! browser would after `DOMContentLoaded`, and reports what happened.

use crate::config::{self, ConfigError, SiteConfig};
use crate::context::{Environment, FileStorage, MemoryHistory, MemoryStorage, Storage};
use crate::loader::DirSource;
use crate::page::{CarouselState, Contexts, LoadOutcome, Page, TabLoad};
use crate::render;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File the `render` command writes; never counted as a fragment.
pub const SHELL_FILE: &str = "index.html";

const FRAGMENT_EXTENSIONS: &[&str] = &["html", "md"];

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Render the page shell for `site_dir` and write it to `output`.
pub fn render_site(site_dir: &Path, output: &Path) -> Result<SiteConfig, SiteError> {
    let config = config::load_config(site_dir)?;
    let html = render::render_shell(&config).into_string();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, html)?;
    Ok(config)
}

/// How a page should be opened.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Starting location, e.g. `index.html#code`. Defaults to the shell file.
    pub url: Option<String>,
    /// JSON file backing storage; in-memory when `None`.
    pub storage: Option<PathBuf>,
    pub environment: Environment,
}

/// Build and boot a page over the fragments in `site_dir`.
pub fn open_page(site_dir: &Path, options: OpenOptions) -> Result<Page, SiteError> {
    let config = config::load_config(site_dir)?;
    let url = options.url.unwrap_or_else(|| SHELL_FILE.to_string());
    let storage: Box<dyn Storage> = match options.storage {
        Some(path) => Box::new(FileStorage::new(path)),
        None => Box::new(MemoryStorage::new()),
    };
    let mut page = Page::new(
        config,
        Contexts {
            navigation: Box::new(MemoryHistory::new(&url)),
            storage,
            source: Box::new(DirSource::new(site_dir)),
            environment: options.environment,
        },
    );
    page.boot();
    Ok(page)
}

/// Outcome of `check`.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub config_file: bool,
    pub loads: Vec<TabLoad>,
    pub carousels: Vec<CarouselState>,
    /// Fragment files no tab loads, relative to the site directory.
    pub unreferenced: Vec<String>,
}

impl CheckReport {
    pub fn failed_loads(&self) -> usize {
        self.loads
            .iter()
            .filter(|l| matches!(l.outcome, LoadOutcome::Failed(_)))
            .count()
    }

    pub fn is_ok(&self) -> bool {
        self.failed_loads() == 0
    }
}

pub fn check_site(site_dir: &Path) -> Result<CheckReport, SiteError> {
    let page = open_page(site_dir, OpenOptions::default())?;
    let unreferenced = unreferenced_fragments(site_dir, page.config())?;
    Ok(CheckReport {
        config_file: site_dir.join("config.toml").exists(),
        loads: page.loads().to_vec(),
        carousels: page.state().carousels,
        unreferenced,
    })
}

/// `.html` and `.md` files under `site_dir` that no tab names as its source.
///
/// Hidden directories are skipped, as is the rendered shell at the root.
pub fn unreferenced_fragments(
    site_dir: &Path,
    config: &SiteConfig,
) -> Result<Vec<String>, SiteError> {
    let referenced: BTreeSet<PathBuf> = config
        .tabs
        .iter()
        .filter_map(|t| t.source.as_deref())
        .map(normalize)
        .collect();

    let mut found = Vec::new();
    let walker = WalkDir::new(site_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_fragment = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FRAGMENT_EXTENSIONS.contains(&e));
        if !is_fragment {
            continue;
        }
        let Ok(relative) = path.strip_prefix(site_dir) else {
            continue;
        };
        if relative == Path::new(SHELL_FILE) || referenced.contains(relative) {
            continue;
        }
        found.push(relative.to_string_lossy().replace('\\', "/"));
    }
    Ok(found)
}

/// Drop `./` segments so `./a.html` and `a.html` compare equal.
fn normalize(source: &str) -> PathBuf {
    Path::new(source)
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
