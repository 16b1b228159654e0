//! Replay scripts.
//!
//! A script is a TOML file describing a browsing session: where it starts,
//! what the user agent prefers, and a list of interactions. Targets are
//! selectors resolved against the live document when the step runs, so a
//! step can address markup that only exists after an earlier step.
//!
//! ```toml
//! url = "index.html#code"   # starting location (default "index.html")
//! prefers_dark = false      # user agent color-scheme preference
//! storage = "prefs.json"    # persist theme choice here (default: in memory)
//!
//! [[step]]
//! action = "click"
//! target = "#code .next"
//!
//! [[step]]
//! action = "key"
//! key = "ArrowLeft"
//! target = "#code .timeline"  # focused element; omit for the document
//!
//! [[step]]
//! action = "swipe"
//! target = "#code .timeline"
//! from = 300.0
//! to = 180.0
//!
//! [[step]]
//! action = "toggle"
//! target = "#darkModeToggle"
//! checked = true
//!
//! [[step]]
//! action = "scroll"
//! y = 800.0
//!
//! [[step]]
//! action = "back"           # or "forward"
//! ```

use crate::dom::{NodeId, Selector, SelectorError};
use crate::events::{Dispatch, Event, Key, TouchPoint};
use crate::page::Page;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("step {step}: invalid selector '{selector}': {source}")]
    Selector {
        step: usize,
        selector: String,
        source: SelectorError,
    },
    #[error("step {step}: nothing matches '{selector}'")]
    NoMatch { step: usize, selector: String },
}

fn default_url() -> String {
    "index.html".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub prefers_dark: bool,
    /// JSON file backing storage, relative to the script's directory.
    #[serde(default)]
    pub storage: Option<PathBuf>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase", deny_unknown_fields)]
pub enum Step {
    Click {
        target: String,
    },
    Key {
        key: String,
        #[serde(default)]
        target: Option<String>,
    },
    Swipe {
        target: String,
        from: f64,
        to: f64,
    },
    Toggle {
        target: String,
        checked: bool,
    },
    Scroll {
        y: f64,
    },
    Back,
    Forward,
}

impl Step {
    /// One-line description for reports.
    pub fn describe(&self) -> String {
        match self {
            Step::Click { target } => format!("click {target}"),
            Step::Key {
                key,
                target: Some(target),
            } => format!("key {key} on {target}"),
            Step::Key { key, target: None } => format!("key {key}"),
            Step::Swipe { target, from, to } => format!("swipe {target} {from} -> {to}"),
            Step::Toggle { target, checked } => {
                format!("toggle {target} {}", if *checked { "on" } else { "off" })
            }
            Step::Scroll { y } => format!("scroll to {y}"),
            Step::Back => "back".to_string(),
            Step::Forward => "forward".to_string(),
        }
    }
}

impl Script {
    pub fn parse(content: &str) -> Result<Script, ScriptError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Script, ScriptError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// Result of running one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub description: String,
    /// `None` when the step had nothing to dispatch (history exhausted).
    pub dispatch: Option<Dispatch>,
}

/// Run `steps` against `page` in order. Stops at the first step whose target
/// cannot be resolved.
pub fn run(page: &mut Page, steps: &[Step]) -> Result<Vec<StepReport>, ScriptError> {
    let mut reports = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let index = i + 1;
        let dispatch = run_step(page, index, step)?;
        debug!(step = index, action = %step.describe(), ?dispatch, "step ran");
        reports.push(StepReport {
            index,
            description: step.describe(),
            dispatch,
        });
    }
    Ok(reports)
}

fn run_step(page: &mut Page, index: usize, step: &Step) -> Result<Option<Dispatch>, ScriptError> {
    let dispatch = match step {
        Step::Click { target } => {
            let target = resolve(page, index, target)?;
            page.dispatch(&Event::Click { target })
        }
        Step::Key { key, target } => {
            let target = target
                .as_deref()
                .map(|selector| resolve(page, index, selector))
                .transpose()?;
            page.dispatch(&Event::KeyDown {
                target,
                key: Key::from(key.as_str()),
            })
        }
        Step::Swipe { target, from, to } => {
            let target = resolve(page, index, target)?;
            let start = page.dispatch(&Event::TouchStart {
                target,
                point: TouchPoint::new(*from, 0.0),
            });
            let end = page.dispatch(&Event::TouchEnd {
                target,
                point: TouchPoint::new(*to, 0.0),
            });
            Dispatch {
                handled: start.handled || end.handled,
                default_prevented: start.default_prevented || end.default_prevented,
            }
        }
        Step::Toggle { target, checked } => {
            let target = resolve(page, index, target)?;
            page.dispatch(&Event::Change {
                target,
                checked: *checked,
            })
        }
        Step::Scroll { y } => page.scroll_to(*y),
        Step::Back => return Ok(page.back()),
        Step::Forward => return Ok(page.forward()),
    };
    Ok(Some(dispatch))
}

fn resolve(page: &Page, step: usize, selector: &str) -> Result<NodeId, ScriptError> {
    let compiled = Selector::parse(selector).map_err(|source| ScriptError::Selector {
        step,
        selector: selector.to_string(),
        source,
    })?;
    let doc = page.document();
    doc.query_selector(doc.root(), &compiled)
        .ok_or_else(|| ScriptError::NoMatch {
            step,
            selector: selector.to_string(),
        })
}
