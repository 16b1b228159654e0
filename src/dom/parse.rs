//! Tolerant HTML fragment parser.
//!
//! Handles the markup the site actually serves: elements with quoted or bare
//! attributes, text, void elements, self-closing syntax, comments, doctypes,
//! raw-text `<script>`/`<style>` bodies and the common character references.
//! Mismatched end tags close up to the nearest open element of that name and
//! are otherwise ignored; nothing here ever fails.

use super::{Document, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    len: usize,
}

/// Parse `html` and append the resulting nodes to `parent`.
pub fn parse_into(doc: &mut Document, parent: NodeId, html: &str) {
    // stack[0] is the insertion parent and is never popped
    let mut stack = vec![parent];
    let mut rest = html;

    while !rest.is_empty() {
        let top = *stack.last().unwrap_or(&parent);

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            rest = after.get(end + 1..).unwrap_or("");
            close_element(doc, &mut stack, &name);
        } else if let Some(tag) = rest
            .strip_prefix('<')
            .filter(|after| after.starts_with(|c: char| c.is_ascii_alphabetic()))
            .and_then(|_| parse_start_tag(rest))
        {
            rest = &rest[tag.len..];
            match tag.name.as_str() {
                // Fold page wrappers into the document's own structure.
                "html" | "body" => {}
                "head" => {
                    let head = doc.head();
                    stack.push(head);
                }
                name => {
                    let el = doc.create_element(name);
                    for (key, value) in &tag.attrs {
                        doc.set_attr(el, key, value.as_str());
                    }
                    doc.append_child(top, el);

                    if is_raw_text(name) {
                        let (body, remaining) = split_raw_text(rest, name);
                        if !body.is_empty() {
                            let text = doc.create_text(body);
                            doc.append_child(el, text);
                        }
                        rest = remaining;
                    } else if !tag.self_closing && !is_void(name) {
                        stack.push(el);
                    }
                }
            }
        } else {
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
            let text = decode_entities(&rest[..end]);
            let node = doc.create_text(&text);
            doc.append_child(top, node);
            rest = &rest[end..];
        }
    }
}

fn close_element(doc: &Document, stack: &mut Vec<NodeId>, name: &str) {
    if let Some(pos) = stack
        .iter()
        .rposition(|n| doc.tag(*n) == Some(name))
        .filter(|pos| *pos > 0)
    {
        stack.truncate(pos);
    }
}

/// Split a raw-text body at its closing tag; returns (body, input after the end tag).
fn split_raw_text<'a>(input: &'a str, name: &str) -> (&'a str, &'a str) {
    let needle = format!("</{name}");
    let lower = input.to_ascii_lowercase();
    match lower.find(&needle) {
        Some(start) => {
            let after = &input[start..];
            let rest = after.find('>').map_or("", |end| &after[end + 1..]);
            (&input[..start], rest)
        }
        None => (input, ""),
    }
}

fn parse_start_tag(input: &str) -> Option<StartTag> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 1;
    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let name = input[1..i].to_ascii_lowercase();
    let mut attrs = Vec::new();

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            return None;
        }
        match bytes[i] {
            b'>' => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: false,
                    len: i + 1,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: true,
                    len: i + 2,
                });
            }
            b'/' => i += 1,
            _ => {
                let start = i;
                while i < len
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'=' | b'>' | b'/')
                {
                    i += 1;
                }
                let attr_name = input[start..i].to_ascii_lowercase();
                while i < len && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                let mut value = String::new();
                if i < len && bytes[i] == b'=' {
                    i += 1;
                    while i < len && bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                        let quote = bytes[i];
                        i += 1;
                        let value_start = i;
                        while i < len && bytes[i] != quote {
                            i += 1;
                        }
                        if i >= len {
                            return None;
                        }
                        value = decode_entities(&input[value_start..i]);
                        i += 1;
                    } else {
                        let value_start = i;
                        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                            i += 1;
                        }
                        value = decode_entities(&input[value_start..i]);
                    }
                }
                // A stray `=` has already been consumed along with its value.
                if !attr_name.is_empty() {
                    attrs.push((attr_name, value));
                }
            }
        }
    }
}

/// Decode named and numeric character references.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|end| *end <= 10) {
            Some(end) => match decode_reference(&tail[1..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "times" => Some('\u{d7}'),
        "rsaquo" => Some('\u{203a}'),
        "lsaquo" => Some('\u{2039}'),
        _ => {
            let hex = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"));
            let code = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
