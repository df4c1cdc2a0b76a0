/// A node of a parsed markup fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Paragraph(Vec<Node>),
    Bold(Vec<Node>),
    Italic(Vec<Node>),
    List(List),
}

/// A list item; may hold a nested list after its inline content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub children: Vec<Node>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Whether this node occupies its own paragraph(s) at the top level.
    pub fn is_block(&self) -> bool {
        matches!(self, Node::Paragraph(_) | Node::List(_))
    }

    /// Text of the subtree with all markup dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Paragraph(children) | Node::Bold(children) | Node::Italic(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Node::List(list) => {
                for item in &list.items {
                    for child in &item.children {
                        child.collect_text(out);
                    }
                }
            }
        }
    }
}

/// Top-level content of a parsed fragment.
///
/// Top-level `Text` nodes are whitespace between blocks, or the whole content
/// when the fragment has no block structure at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn has_blocks(&self) -> bool {
        self.nodes.iter().any(Node::is_block)
    }

    pub fn plain_text(&self) -> String {
        self.nodes.iter().map(Node::plain_text).collect()
    }
}
