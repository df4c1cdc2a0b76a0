//! Plain value substitution.

use crate::document::{Block, Document};
use crate::locate;
use crate::style::{HouseStyle, InlineStyle};

/// Replace `token` with `value` in every paragraph that contains it.
///
/// Each affected paragraph collapses into a single body run of its new text,
/// then the accent rule is evaluated against that text. Returns the number of
/// paragraphs changed.
pub fn substitute_all(document: &mut Document, token: &str, value: &str, style: &HouseStyle) -> usize {
    let paths = locate::find_all_paragraphs(document, token);
    for path in &paths {
        let Some(paragraph) = document.paragraph_mut(path) else {
            continue;
        };
        let text = paragraph.text().replace(token, value);
        paragraph.clear();
        paragraph.push_run(style.body(&text, InlineStyle::default()));
        style.apply_accent_rule(paragraph);
    }
    paths.len()
}

/// Replace `token` in the first body paragraph containing it and set the
/// result in the title style.
pub fn apply_title(document: &mut Document, token: &str, value: &str, style: &HouseStyle) -> bool {
    let title = document.blocks.iter_mut().find_map(|block| match block {
        Block::Paragraph(paragraph) if paragraph.text().contains(token) => Some(paragraph),
        _ => None,
    });
    let Some(paragraph) = title else {
        return false;
    };
    let text = paragraph.text().replace(token, value);
    paragraph.clear();
    paragraph.push_run(style.title(&text));
    true
}
