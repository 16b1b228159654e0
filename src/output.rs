//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what the user sees in the page (tabs, carousels, the
//! visible state) and shows files as secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! 001 Home → #home
//!     Source: home.html
//! 002 Code → #code (enhanced)
//!     Source: ideas.html
//! Rendered 2 tabs → dist/index.html
//! ```
//!
//! ## Check
//!
//! ```text
//! Tabs
//! 001 home
//!     Source: home.html
//!     Loaded: 3 nodes
//! 002 code
//!     Source: ideas.html
//!     Loaded: 3 nodes, 1 carousel, 3 images
//! 003 about
//!     Source: about.html
//!     Failed: fragment not found: about.html
//!
//! Carousels
//! 001 code (3 slides)
//!
//! Unreferenced
//!     drafts.md
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Replay
//!
//! ```text
//! Steps
//! 001 click #code .next
//! 002 key Escape (ignored)
//! 003 back (no history)
//!
//! State
//!     Tab: code (#code)
//!     Theme: dark
//!     Menu: closed
//!     Lightbox: closed
//!     Back to top: hidden at 0px
//!
//! Carousels
//! 001 code: Slide 2 of 3
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::page::{CarouselState, LoadOutcome, PageState, TabLoad};
use crate::script::StepReport;
use crate::site::CheckReport;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 carousel`, `3 images`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn carousel_line(index: usize, carousel: &CarouselState, detail: &str) -> String {
    let tab = carousel.tab.as_deref().unwrap_or("(outside tabs)");
    format!("{} {}{}", format_index(index), tab, detail)
}

fn load_lines(load: &TabLoad) -> Vec<String> {
    let status = match &load.outcome {
        LoadOutcome::Loaded {
            nodes,
            carousels,
            images,
        } => {
            let mut parts = vec![plural(*nodes, "node")];
            if *carousels > 0 {
                parts.push(plural(*carousels, "carousel"));
            }
            if *images > 0 {
                parts.push(plural(*images, "image"));
            }
            format!("Loaded: {}", parts.join(", "))
        }
        LoadOutcome::Failed(reason) => format!("Failed: {}", reason),
    };
    vec![
        format!("{}Source: {}", indent(1), load.source),
        format!("{}{}", indent(1), status),
    ]
}

// ============================================================================
// render
// ============================================================================

/// Format the tabs written into the shell.
pub fn format_render_output(config: &SiteConfig, output: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, tab) in config.tabs.iter().enumerate() {
        let marker = if tab.enhance { " (enhanced)" } else { "" };
        lines.push(format!(
            "{} {} \u{2192} #{}{}",
            format_index(i + 1),
            tab.label,
            tab.id,
            marker
        ));
        match &tab.source {
            Some(source) => lines.push(format!("{}Source: {}", indent(1), source)),
            None => lines.push(format!("{}(static)", indent(1))),
        }
    }
    lines.push(format!(
        "Rendered {} \u{2192} {}",
        plural(config.tabs.len(), "tab"),
        output.display()
    ));
    lines
}

pub fn print_render_output(config: &SiteConfig, output: &Path) {
    for line in format_render_output(config, output) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format a headless boot of the site.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec!["Tabs".to_string()];
    for (i, load) in report.loads.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), load.tab));
        lines.extend(load_lines(load));
    }

    if !report.carousels.is_empty() {
        lines.push(String::new());
        lines.push("Carousels".to_string());
        for (i, carousel) in report.carousels.iter().enumerate() {
            let detail = format!(" ({})", plural(carousel.entries, "slide"));
            lines.push(carousel_line(i + 1, carousel, &detail));
        }
    }

    if !report.unreferenced.is_empty() {
        lines.push(String::new());
        lines.push("Unreferenced".to_string());
        for file in &report.unreferenced {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    if report.config_file {
        lines.push(String::new());
        lines.push("Config".to_string());
        lines.push(format!("{}config.toml", indent(1)));
    }

    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// replay
// ============================================================================

fn open_closed(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}

/// Format the steps of a replay and the page state it ended in.
pub fn format_replay_output(reports: &[StepReport], state: &PageState) -> Vec<String> {
    let mut lines = vec!["Steps".to_string()];
    for report in reports {
        let note = match report.dispatch {
            None => " (no history)",
            Some(d) if !d.handled => " (ignored)",
            Some(_) => "",
        };
        lines.push(format!(
            "{} {}{}",
            format_index(report.index),
            report.description,
            note
        ));
    }

    lines.push(String::new());
    lines.push("State".to_string());
    let tab = state.active_tab.as_deref().unwrap_or("(none)");
    if state.hash.is_empty() {
        lines.push(format!("{}Tab: {}", indent(1), tab));
    } else {
        lines.push(format!("{}Tab: {} ({})", indent(1), tab, state.hash));
    }
    lines.push(format!("{}Theme: {}", indent(1), state.theme.as_str()));
    lines.push(format!("{}Menu: {}", indent(1), open_closed(state.menu_open)));
    lines.push(format!(
        "{}Lightbox: {}",
        indent(1),
        open_closed(state.lightbox_open)
    ));
    lines.push(format!(
        "{}Back to top: {} at {}px",
        indent(1),
        if state.back_to_top_visible { "visible" } else { "hidden" },
        state.scroll_y
    ));

    if !state.carousels.is_empty() {
        lines.push(String::new());
        lines.push("Carousels".to_string());
        for (i, carousel) in state.carousels.iter().enumerate() {
            let detail = format!(": {}", carousel.announcement);
            lines.push(carousel_line(i + 1, carousel, &detail));
        }
    }

    lines
}

pub fn print_replay_output(reports: &[StepReport], state: &PageState) {
    for line in format_replay_output(reports, state) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
