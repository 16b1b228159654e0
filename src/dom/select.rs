//! The CSS selector subset used by components and replay scripts.
//!
//! Supported forms:
//!
//! ```text
//! div  #lightbox  .carousel-dot  [data-tab]  [aria-controls="code"]  *
//! button.tab-button[aria-selected="true"]      compound
//! #objects .carousel-nav .next                  descendant combinator
//! ```
//!
//! Child (`>`), sibling and pseudo-class selectors are not supported.

use super::{Document, NodeId};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("expected a name after '{0}'")]
    ExpectedName(char),
    #[error("unexpected character '{0}'")]
    Unexpected(char),
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

/// One compound selector such as `button.tab-button[data-tab]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|tag| tag != el.tag()) {
            return false;
        }
        if self.id.as_deref().is_some_and(|id| el.attr("id") != Some(id)) {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|m| match (&m.value, el.attr(&m.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(want), Some(have)) => want == have,
        })
    }
}

/// A parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parts = Vec::new();
        let mut current = Compound::default();
        let mut started = false;
        let mut chars = input.trim().chars().peekable();

        while let Some(&c) = chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    chars.next();
                    if started {
                        parts.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                '#' => {
                    chars.next();
                    current.id = Some(read_name(&mut chars, '#')?);
                    started = true;
                }
                '.' => {
                    chars.next();
                    current.classes.push(read_name(&mut chars, '.')?);
                    started = true;
                }
                '[' => {
                    chars.next();
                    current.attrs.push(read_attr(&mut chars)?);
                    started = true;
                }
                '*' => {
                    chars.next();
                    started = true;
                }
                c if is_name_char(c) && !started => {
                    current.tag = Some(read_name(&mut chars, c)?.to_ascii_lowercase());
                    started = true;
                }
                other => return Err(SelectorError::Unexpected(other)),
            }
        }
        if started {
            parts.push(current);
        }
        if parts.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { parts })
    }

    /// Does `node` match? The rightmost compound must match the node itself;
    /// the rest must match ancestors in order.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some((last, rest)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, node) {
            return false;
        }
        let mut remaining = rest.iter().rev().peekable();
        for ancestor in doc.ancestors_inclusive(node).skip(1) {
            match remaining.peek() {
                Some(compound) if compound.matches(doc, ancestor) => {
                    remaining.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        remaining.peek().is_none()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_name(chars: &mut Peekable<Chars<'_>>, after: char) -> Result<String, SelectorError> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    if name.is_empty() {
        return Err(SelectorError::ExpectedName(after));
    }
    Ok(name)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_attr(chars: &mut Peekable<Chars<'_>>) -> Result<AttrMatch, SelectorError> {
    skip_whitespace(chars);
    let name = read_name(chars, '[')?.to_ascii_lowercase();
    skip_whitespace(chars);
    let value = match chars.next() {
        Some(']') => return Ok(AttrMatch { name, value: None }),
        Some('=') => {
            skip_whitespace(chars);
            let value = match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some(c) if c == quote => break,
                            Some(c) => value.push(c),
                            None => return Err(SelectorError::UnterminatedAttribute),
                        }
                    }
                    value
                }
                _ => read_name(chars, '=')?,
            };
            skip_whitespace(chars);
            value
        }
        Some(other) => return Err(SelectorError::Unexpected(other)),
        None => return Err(SelectorError::UnterminatedAttribute),
    };
    match chars.next() {
        Some(']') => Ok(AttrMatch {
            name,
            value: Some(value),
        }),
        Some(other) => Err(SelectorError::Unexpected(other)),
        None => Err(SelectorError::UnterminatedAttribute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::parse(
            r#"
            <nav id="navMenu">
              <button class="tab-button active" data-tab="home" aria-controls="home">Home</button>
              <button class="tab-button" data-tab="code" aria-controls="code">Code</button>
            </nav>
            <section id="objects" class="tab-content">
              <div class="timeline"><div class="carousel-nav"><button class="next">›</button></div></div>
            </section>
            "#,
        )
    }

    #[test]
    fn parses_compound_and_descendant_forms() {
        assert!(Selector::parse("button.tab-button[data-tab]").is_ok());
        assert!(Selector::parse("#objects .carousel-nav .next").is_ok());
        assert!(Selector::parse(r#"[aria-label="Go to slide 1"]"#).is_ok());
        assert!(Selector::parse("*").is_ok());
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("."), Err(SelectorError::ExpectedName('.')));
        assert_eq!(
            Selector::parse(r#"[data-tab="x"#),
            Err(SelectorError::UnterminatedAttribute)
        );
        assert_eq!(Selector::parse("nav > a"), Err(SelectorError::Unexpected('>')));
    }

    #[test]
    fn attribute_value_match() {
        let doc = doc();
        let code = doc
            .query(doc.root(), r#".tab-button[aria-controls="code"]"#)
            .unwrap();
        assert_eq!(doc.text_content(code), "Code");
        assert!(doc.query(doc.root(), "[aria-controls=missing]").is_none());
    }

    #[test]
    fn multiple_classes_must_all_match() {
        let doc = doc();
        let active = doc.query_all(doc.root(), ".tab-button.active");
        assert_eq!(active.len(), 1);
        assert_eq!(doc.attr(active[0], "data-tab"), Some("home"));
    }

    #[test]
    fn descendant_chain_matches_through_ancestors() {
        let doc = doc();
        assert!(doc.query(doc.root(), "#objects .next").is_some());
        assert!(doc.query(doc.root(), "section .timeline .carousel-nav button").is_some());
        assert!(doc.query(doc.root(), "#navMenu .next").is_none());
    }

    #[test]
    fn tag_names_are_case_insensitive() {
        let doc = doc();
        assert_eq!(doc.query_all(doc.root(), "BUTTON").len(), 3);
    }
}
