use super::parse::{is_raw_text, is_void};
use super::{Document, NodeId, NodeKind};

pub(super) fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.kind(node) {
        NodeKind::Text(text) => {
            let raw = doc
                .parent(node)
                .and_then(|p| doc.tag(p))
                .is_some_and(is_raw_text);
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(el.tag());
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            if let Some(style) = el.style_text() {
                out.push_str(" style=\"");
                escape_into(&style, true, out);
                out.push('"');
            }
            out.push('>');
            if is_void(el.tag()) {
                return;
            }
            for &child in doc.children(node) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(el.tag());
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
