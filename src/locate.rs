use crate::document::{Block, CellStep, Document, Paragraph, ParagraphPath};

/// Walk every paragraph of `document` in placeholder lookup order.
///
/// Body paragraphs come first, then the body's tables. Within a table, cells
/// are visited row by row; each cell yields its own paragraphs and then its
/// nested tables, completely, before the next cell is entered. The walk keeps
/// its own stack, so deeply nested tables cannot exhaust the call stack.
pub fn paragraphs(document: &Document) -> Paragraphs<'_> {
    Paragraphs {
        current: Some(Frame {
            cells: Vec::new(),
            blocks: &document.blocks,
            next: 0,
        }),
        pending: Vec::new(),
    }
}

/// First paragraph whose text contains `token`.
pub fn find_paragraph(document: &Document, token: &str) -> Option<ParagraphPath> {
    paragraphs(document)
        .find(|(_, paragraph)| paragraph.text().contains(token))
        .map(|(path, _)| path)
}

/// Every paragraph whose text contains `token`, in lookup order.
pub fn find_all_paragraphs(document: &Document, token: &str) -> Vec<ParagraphPath> {
    paragraphs(document)
        .filter(|(_, paragraph)| paragraph.text().contains(token))
        .map(|(path, _)| path)
        .collect()
}

pub struct Paragraphs<'a> {
    current: Option<Frame<'a>>,
    // Cells still to visit, next one on top
    pending: Vec<Frame<'a>>,
}

/// A block container being scanned.
struct Frame<'a> {
    cells: Vec<CellStep>,
    blocks: &'a [Block],
    next: usize,
}

impl<'a> Paragraphs<'a> {
    fn queue_cells(&mut self, frame: Frame<'a>) {
        let mut cells = Vec::new();
        for (block, item) in frame.blocks.iter().enumerate() {
            let Block::Table(table) = item else {
                continue;
            };
            for (row, cells_in_row) in table.rows.iter().enumerate() {
                for (column, cell) in cells_in_row.cells.iter().enumerate() {
                    let mut path = frame.cells.clone();
                    path.push(CellStep { block, row, column });
                    cells.push(Frame {
                        cells: path,
                        blocks: &cell.blocks,
                        next: 0,
                    });
                }
            }
        }
        self.pending.extend(cells.into_iter().rev());
    }
}

impl<'a> Iterator for Paragraphs<'a> {
    type Item = (ParagraphPath, &'a Paragraph);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                self.current = Some(self.pending.pop()?);
            }
            let frame = self.current.as_mut()?;

            let blocks = frame.blocks;
            while frame.next < blocks.len() {
                let index = frame.next;
                frame.next += 1;
                if let Block::Paragraph(paragraph) = &blocks[index] {
                    return Some((ParagraphPath::new(frame.cells.clone(), index), paragraph));
                }
            }

            // Paragraphs done; the container's tables come next
            if let Some(done) = self.current.take() {
                self.queue_cells(done);
            }
        }
    }
}
