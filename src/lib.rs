//! Fill document templates with plain values and rich-text fragments.
//!
//! The core is [`expand_placeholder`]: it finds the first paragraph holding a
//! placeholder token, in the body or inside (possibly nested) tables, and replaces
//! it with styled paragraphs and list items generated from a small markup
//! fragment, keeping everything that followed the placeholder after the new
//! content. [`substitute_all`] covers plain values. The [`report`] and
//! [`template`] modules put these to work for event reports, and
//! [`document_to_pdf`] renders the result.

mod config;
mod document;
mod error;
mod expand;
mod fragment;
mod html;
mod locate;
mod parser;
pub mod report;
mod style;
mod substitute;
pub mod template;
mod typst;

pub use config::{Config, ListsConfig, PageConfig};
pub use document::{
    Block, Cell, CellStep, Document, Image, ListStyle, Paragraph, ParagraphPath, Row, Run,
    StructureError, Table,
};
pub use error::{Error, Result};
pub use expand::{expand_node, expand_placeholder, expand_placeholder_html};
pub use fragment::{Fragment, List, ListItem, Node};
pub use locate::{find_all_paragraphs, find_paragraph, paragraphs};
pub use style::{HouseStyle, InlineStyle, ParseColorError, Rgb};
pub use substitute::{apply_title, substitute_all};

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse an HTML fragment.
pub fn parse_html(source: &str) -> Fragment {
    html::parse(source)
}

/// Parse a Markdown fragment.
pub fn parse_markdown(source: &str) -> Fragment {
    parser::parse(source)
}

/// Convert a document to Typst markup.
pub fn document_to_typst(document: &Document, config: &Config) -> String {
    typst::document_to_typst(&document.blocks, config)
}

/// Convert a document to PDF bytes.
pub fn document_to_pdf(document: &Document, config: &Config) -> Result<Vec<u8>> {
    use typst_library::layout::PagedDocument;

    let typst_content = document_to_typst(document, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    // Image paths are absolute, so files resolve from the filesystem root
    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .with_file_system_resolver("/")
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Render(format!("Typst compilation failed: {:?}", e)))?;

    typst_pdf::pdf(&doc, &PdfOptions::default())
        .map_err(|e| Error::Render(format!("PDF generation failed: {:?}", e)))
}
