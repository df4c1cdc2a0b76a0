//! Placeholder expansion.
//!
//! A placeholder paragraph is replaced in place by the content of a fragment:
//! the first fragment paragraph reuses the placeholder's own paragraph, and
//! everything after it is inserted behind the previously emitted paragraph.
//! Content that followed the placeholder stays after the expansion.

use crate::document::{Document, ListStyle, Paragraph, ParagraphPath, StructureError};
use crate::error::{Error, Result};
use crate::fragment::{Fragment, List, Node};
use crate::locate;
use crate::style::{HouseStyle, InlineStyle};

/// Expand `node` into runs appended to `paragraph`.
///
/// Bold and italic are pushed down into the subtree, so every run below a
/// `Bold` is created bold. Returns the index of the last run produced.
pub fn expand_node(
    paragraph: &mut Paragraph,
    node: &Node,
    inherited: InlineStyle,
    style: &HouseStyle,
) -> Option<usize> {
    match node {
        Node::Text(text) => Some(paragraph.push_run(style.body(text, inherited))),
        Node::Bold(children) => expand_inline(paragraph, children, inherited.with_bold(), style),
        Node::Italic(children) => {
            expand_inline(paragraph, children, inherited.with_italic(), style)
        }
        // Block nodes met in inline position only contribute their content
        Node::Paragraph(children) => expand_inline(paragraph, children, inherited, style),
        Node::List(list) if list.items.is_empty() => {
            Some(paragraph.push_run(style.body("", inherited)))
        }
        Node::List(list) => {
            let mut last = None;
            for item in &list.items {
                last = expand_inline(paragraph, &item.children, inherited, style).or(last);
            }
            last
        }
    }
}

/// Expand a sequence of siblings. An empty sequence still yields one (empty)
/// run so the enclosing attributes are not lost.
fn expand_inline(
    paragraph: &mut Paragraph,
    children: &[Node],
    inherited: InlineStyle,
    style: &HouseStyle,
) -> Option<usize> {
    if children.is_empty() {
        return Some(paragraph.push_run(style.body("", inherited)));
    }
    let mut last = None;
    for child in children {
        last = expand_node(paragraph, child, inherited, style).or(last);
    }
    last
}

/// Replace the first paragraph containing `token` with `fragment`.
///
/// Returns `Ok(false)` and leaves the document untouched when the token is
/// not found. Later occurrences are left for later calls.
pub fn expand_placeholder(
    document: &mut Document,
    token: &str,
    fragment: &Fragment,
    style: &HouseStyle,
) -> Result<bool> {
    let Some(anchor) = locate::find_paragraph(document, token) else {
        return Ok(false);
    };

    let mut expansion = Expansion {
        document,
        token,
        style,
        last: anchor.clone(),
        anchor_free: true,
    };
    let placeholder = expansion.target(&anchor)?;
    placeholder.clear();

    // Inline-only content stays in the placeholder paragraph
    if !fragment.has_blocks() {
        if !fragment.plain_text().trim().is_empty() {
            for node in &fragment.nodes {
                expand_node(placeholder, node, InlineStyle::default(), style);
            }
        }
        return Ok(true);
    }

    for node in &fragment.nodes {
        match node {
            Node::Paragraph(children) => expansion.paragraph(children)?,
            Node::List(list) => expansion.list(list, 0)?,
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Text(text) => expansion.paragraph(&[Node::text(text.trim())])?,
            inline => expansion.paragraph(std::slice::from_ref(inline))?,
        }
    }
    Ok(true)
}

/// Parse `html` and expand it at the first paragraph containing `token`.
pub fn expand_placeholder_html(
    document: &mut Document,
    token: &str,
    html: &str,
    style: &HouseStyle,
) -> Result<bool> {
    expand_placeholder(document, token, &crate::html::parse(html), style)
}

/// Insertion cursor for one expansion.
struct Expansion<'a> {
    document: &'a mut Document,
    token: &'a str,
    style: &'a HouseStyle,
    // Last paragraph emitted so far; starts at the placeholder paragraph
    last: ParagraphPath,
    // The cleared placeholder paragraph has not received a fragment paragraph yet
    anchor_free: bool,
}

impl Expansion<'_> {
    fn target(&mut self, path: &ParagraphPath) -> Result<&mut Paragraph> {
        let token = self.token;
        self.document
            .paragraph_mut(path)
            .ok_or_else(|| Error::Expansion {
                token: token.to_string(),
                source: StructureError::NotAParagraph(path.clone()),
            })
    }

    /// Insert a paragraph after the last emitted one and advance the cursor.
    fn insert_next(&mut self, list: Option<ListStyle>) -> Result<ParagraphPath> {
        let path = self
            .document
            .insert_paragraph_after(&self.last, "", list)
            .map_err(|source| Error::Expansion {
                token: self.token.to_string(),
                source,
            })?;
        self.last = path.clone();
        Ok(path)
    }

    fn paragraph(&mut self, children: &[Node]) -> Result<()> {
        let path = if self.anchor_free {
            self.anchor_free = false;
            self.last.clone()
        } else {
            self.insert_next(None)?
        };
        let style = self.style;
        let paragraph = self.target(&path)?;
        for child in children {
            expand_node(paragraph, child, InlineStyle::default(), style);
        }
        Ok(())
    }

    /// Each item gets its own list paragraph; nested lists follow their item
    /// one level deeper.
    fn list(&mut self, list: &List, level: u8) -> Result<()> {
        let list_style = if list.ordered {
            ListStyle::numbered(level)
        } else {
            ListStyle::bullet(level)
        };
        for item in &list.items {
            let path = self.insert_next(Some(list_style))?;
            let style = self.style;
            let paragraph = self.target(&path)?;
            for child in item.children.iter().filter(|child| !matches!(child, Node::List(_))) {
                expand_node(paragraph, child, InlineStyle::default(), style);
            }
            for child in &item.children {
                if let Node::List(nested) = child {
                    self.list(nested, level.saturating_add(1))?;
                }
            }
        }
        Ok(())
    }
}
