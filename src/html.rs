//! HTML fragment parsing using html5ever.
//!
//! Only `p`, `b`/`strong`, `i`/`em`, `ul`/`ol`/`li` and `br` carry meaning.
//! Any other element is transparent: its children are kept, its own markup is
//! dropped. html5ever recovers from any input, so parsing cannot fail.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink as _;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::fragment::{Fragment, List, ListItem, Node};

/// Elements that flow inside a paragraph rather than starting a new one.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "br", "cite", "code", "em", "font", "i", "kbd", "mark", "q", "s", "small",
    "span", "strike", "strong", "sub", "sup", "u",
];

/// Parse an HTML fragment into a fragment tree.
pub fn parse(source: &str) -> Fragment {
    let dom = parse_document(RcDom::default(), Default::default()).one(source);

    let mut top = TopLevel::default();
    if let Some(body) = find_element(&dom.document, "body") {
        top.push_children(&body);
    }
    top.finish()
}

fn tag(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn find_element(root: &Handle, name: &str) -> Option<Handle> {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if tag(&node) == Some(name) {
            return Some(node);
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    None
}

/// Builds the top-level node list, grouping stray inline content into
/// paragraphs.
#[derive(Default)]
struct TopLevel {
    nodes: Vec<Node>,
    // Inline content not yet wrapped in a paragraph
    pending: Vec<Node>,
}

impl TopLevel {
    fn push_children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.push(child);
        }
    }

    fn push(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() && self.pending.is_empty() {
                    self.nodes.push(Node::Text(text));
                } else {
                    self.pending.push(Node::Text(text));
                }
            }
            NodeData::Element { name, .. } => match &*name.local {
                "p" => {
                    self.flush();
                    self.nodes.push(Node::Paragraph(inline_children(handle)));
                }
                "ul" => {
                    self.flush();
                    self.nodes.push(Node::List(list(handle, false)));
                }
                "ol" => {
                    self.flush();
                    self.nodes.push(Node::List(list(handle, true)));
                }
                name if INLINE_ELEMENTS.contains(&name) => self.pending.extend(inline(handle)),
                // Unknown block element: its content stands at the top level
                _ => {
                    self.flush();
                    self.push_children(handle);
                    self.flush();
                }
            },
            _ => {}
        }
    }

    fn flush(&mut self) {
        let mut pending = std::mem::take(&mut self.pending);
        trim_edges(&mut pending);
        if !pending.is_empty() {
            self.nodes.push(Node::Paragraph(pending));
        }
    }

    fn finish(mut self) -> Fragment {
        self.flush();
        Fragment::new(self.nodes)
    }
}

/// Trim surrounding whitespace off a run of stray top-level inline nodes.
fn trim_edges(nodes: &mut Vec<Node>) {
    if let Some(Node::Text(text)) = nodes.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Node::Text(text)) = nodes.last_mut() {
        *text = text.trim_end().to_string();
    }
    nodes.retain(|node| !matches!(node, Node::Text(text) if text.is_empty()));
}

fn inline_children(handle: &Handle) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in handle.children.borrow().iter() {
        nodes.extend(inline(child));
    }
    nodes
}

fn inline(handle: &Handle) -> Vec<Node> {
    match &handle.data {
        NodeData::Text { contents } => vec![Node::Text(contents.borrow().to_string())],
        NodeData::Element { name, .. } => match &*name.local {
            "b" | "strong" => vec![Node::Bold(inline_children(handle))],
            "i" | "em" => vec![Node::Italic(inline_children(handle))],
            "p" => vec![Node::Paragraph(inline_children(handle))],
            "ul" => vec![Node::List(list(handle, false))],
            "ol" => vec![Node::List(list(handle, true))],
            "br" => vec![Node::text("\n")],
            _ => inline_children(handle),
        },
        _ => Vec::new(),
    }
}

/// Direct `li` children become items; anything else between them is dropped.
fn list(handle: &Handle, ordered: bool) -> List {
    let items = handle
        .children
        .borrow()
        .iter()
        .filter(|child| tag(child) == Some("li"))
        .map(|li| ListItem {
            children: inline_children(li),
        })
        .collect();
    List { ordered, items }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn p(children: Vec<Node>) -> Node {
        Node::Paragraph(children)
    }

    fn t(text: &str) -> Node {
        Node::text(text)
    }

    fn item(children: Vec<Node>) -> ListItem {
        ListItem { children }
    }

    #[rstest]
    #[case("<p>Hello <b>world</b></p>", vec![p(vec![t("Hello "), Node::Bold(vec![t("world")])])])]
    #[case("<p><strong><em>x</em></strong></p>", vec![p(vec![Node::Bold(vec![Node::Italic(vec![t("x")])])])])]
    #[case("<p>x <u>y</u></p>", vec![p(vec![t("x "), t("y")])])]
    #[case("<p></p>", vec![p(vec![])])]
    #[case("<p>a</p>\n<p>b</p>", vec![p(vec![t("a")]), t("\n"), p(vec![t("b")])])]
    #[case("  plain text  ", vec![p(vec![t("plain text")])])]
    #[case("<b>bold</b> tail", vec![p(vec![Node::Bold(vec![t("bold")]), t(" tail")])])]
    #[case("<div><p>a</p><span>b</span></div>", vec![p(vec![t("a")]), p(vec![t("b")])])]
    #[case("line<br>break", vec![p(vec![t("line"), t("\n"), t("break")])])]
    #[case("", vec![])]
    fn parses_inline_and_paragraphs(#[case] source: &str, #[case] expected: Vec<Node>) {
        assert_eq!(parse(source).nodes, expected);
    }

    #[test]
    fn parses_lists() {
        let fragment = parse("<ul><li>Item A</li>\n<li>Item <i>B</i></li></ul><ol><li>One</li></ol>");
        assert_eq!(
            fragment.nodes,
            vec![
                Node::List(List {
                    ordered: false,
                    items: vec![
                        item(vec![t("Item A")]),
                        item(vec![t("Item "), Node::Italic(vec![t("B")])]),
                    ],
                }),
                Node::List(List {
                    ordered: true,
                    items: vec![item(vec![t("One")])],
                }),
            ]
        );
    }

    #[test]
    fn keeps_nested_lists_inside_items() {
        let fragment = parse("<ul><li>A<ul><li>B</li></ul></li></ul>");
        assert_eq!(
            fragment.nodes,
            vec![Node::List(List {
                ordered: false,
                items: vec![item(vec![
                    t("A"),
                    Node::List(List {
                        ordered: false,
                        items: vec![item(vec![t("B")])],
                    }),
                ])],
            })]
        );
    }

    #[test]
    fn malformed_markup_degrades_to_text() {
        assert_eq!(
            parse("<b>unclosed").nodes,
            vec![p(vec![Node::Bold(vec![t("unclosed")])])]
        );
        assert_eq!(parse("a < b").nodes, vec![p(vec![t("a < b")])]);
    }

    #[test]
    fn whitespace_only_has_no_blocks() {
        let fragment = parse("<span> </span>");
        assert!(!fragment.has_blocks());
        assert!(parse("").plain_text().is_empty());
    }
}
