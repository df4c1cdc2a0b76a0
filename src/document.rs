use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::Rgb;

/// A span of uniformly formatted text.
///
/// Unset font, size and color inherit from the document defaults when the
/// document is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Run {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl Run {
    /// A run with no formatting of its own.
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// Named list style of a paragraph ("List Bullet", "List Number 2", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStyle {
    pub ordered: bool,
    /// Nesting depth, 0 for a top-level list.
    #[serde(default)]
    pub level: u8,
}

impl ListStyle {
    pub fn bullet(level: u8) -> Self {
        Self {
            ordered: false,
            level,
        }
    }

    pub fn numbered(level: u8) -> Self {
        Self {
            ordered: true,
            level,
        }
    }

    pub fn name(&self) -> String {
        let base = if self.ordered {
            "List Number"
        } else {
            "List Bullet"
        };
        match self.level {
            0 => base.to_string(),
            level => format!("{} {}", base, level + 1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ListStyle>,
}

impl Paragraph {
    pub fn with_runs(runs: Vec<Run>) -> Self {
        Self { runs, style: None }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Append a run, returning its index.
    pub fn push_run(&mut self, run: Run) -> usize {
        self.runs.push(run);
        self.runs.len() - 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cell {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }
}

/// A picture centered on its own line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub path: PathBuf,
    /// Width in inches.
    #[serde(default = "Image::default_width")]
    pub width: f32,
}

impl Image {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: Self::default_width(),
        }
    }

    fn default_width() -> f32 {
        6.0
    }
}

/// Block-level element of a document body or table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Image(Image),
    PageBreak,
}

/// A document: blocks in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// One step from a block container into a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStep {
    /// Index of the table within its container.
    pub block: usize,
    pub row: usize,
    pub column: usize,
}

/// Address of a paragraph: the table cells leading to its container, then its
/// index among the container's blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParagraphPath {
    pub cells: Vec<CellStep>,
    pub index: usize,
}

impl ParagraphPath {
    pub fn new(cells: Vec<CellStep>, index: usize) -> Self {
        Self { cells, index }
    }

    /// A paragraph directly in the document body.
    pub fn body(index: usize) -> Self {
        Self::new(Vec::new(), index)
    }

    /// The sibling slot right after this one.
    pub fn next_sibling(&self) -> Self {
        Self::new(self.cells.clone(), self.index + 1)
    }
}

impl fmt::Display for ParagraphPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.cells {
            write!(
                f,
                "blocks[{}].rows[{}].cells[{}].",
                step.block, step.row, step.column
            )?;
        }
        write!(f, "blocks[{}]", self.index)
    }
}

/// A paragraph path that does not resolve against the document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("no block container at {0}")]
    MissingContainer(ParagraphPath),
    #[error("no paragraph at {0}")]
    NotAParagraph(ParagraphPath),
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn push_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    pub fn push_image(&mut self, image: Image) {
        self.blocks.push(Block::Image(image));
    }

    pub fn push_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    /// Join every relative image path, inside tables too, onto `base`.
    pub fn resolve_images(&mut self, base: &Path) {
        let mut pending = vec![&mut self.blocks];
        while let Some(blocks) = pending.pop() {
            for block in blocks {
                match block {
                    Block::Image(image) if image.path.is_relative() => {
                        image.path = base.join(&image.path);
                    }
                    Block::Table(table) => {
                        for row in &mut table.rows {
                            pending.extend(row.cells.iter_mut().map(|cell| &mut cell.blocks));
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Paragraphs directly in the body, skipping tables.
    pub fn body_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        })
    }

    fn container(&self, cells: &[CellStep]) -> Option<&Vec<Block>> {
        let mut blocks = &self.blocks;
        for step in cells {
            blocks = match blocks.get(step.block)? {
                Block::Table(table) => &table.rows.get(step.row)?.cells.get(step.column)?.blocks,
                _ => return None,
            };
        }
        Some(blocks)
    }

    fn container_mut(&mut self, cells: &[CellStep]) -> Option<&mut Vec<Block>> {
        let mut blocks = &mut self.blocks;
        for step in cells {
            blocks = match blocks.get_mut(step.block)? {
                Block::Table(table) => {
                    &mut table
                        .rows
                        .get_mut(step.row)?
                        .cells
                        .get_mut(step.column)?
                        .blocks
                }
                _ => return None,
            };
        }
        Some(blocks)
    }

    pub fn paragraph(&self, path: &ParagraphPath) -> Option<&Paragraph> {
        match self.container(&path.cells)?.get(path.index)? {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    pub fn paragraph_mut(&mut self, path: &ParagraphPath) -> Option<&mut Paragraph> {
        match self.container_mut(&path.cells)?.get_mut(path.index)? {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    /// Insert an empty paragraph right after `anchor`, in the anchor's own
    /// container, and return its path.
    ///
    /// Non-empty `text` becomes a single plain run. Every other sibling keeps
    /// its relative order.
    pub fn insert_paragraph_after(
        &mut self,
        anchor: &ParagraphPath,
        text: &str,
        style: Option<ListStyle>,
    ) -> Result<ParagraphPath, StructureError> {
        let blocks = self
            .container_mut(&anchor.cells)
            .ok_or_else(|| StructureError::MissingContainer(anchor.clone()))?;
        if !matches!(blocks.get(anchor.index), Some(Block::Paragraph(_))) {
            return Err(StructureError::NotAParagraph(anchor.clone()));
        }

        let mut paragraph = Paragraph {
            runs: Vec::new(),
            style,
        };
        if !text.is_empty() {
            paragraph.push_run(Run::plain(text));
        }
        blocks.insert(anchor.index + 1, Block::Paragraph(paragraph));
        Ok(anchor.next_sibling())
    }
}
