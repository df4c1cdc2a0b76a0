use crate::config::Config;
use crate::document::{Block, Paragraph, Run, Table};

/// Convert a document to Typst markup
pub fn document_to_typst(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    out.push_str(&format!(
        "#set page(paper: \"{}\"{})\n",
        config.page.paper,
        if config.page.numbers {
            ", numbering: \"1\""
        } else {
            ""
        }
    ));
    out.push_str(&format!(
        "#set text(font: \"{}\", size: {}pt)\n",
        escape_string(&config.style.font),
        config.style.body_size
    ));
    out.push_str(&format!(
        "#set list(marker: [{}])\n",
        escape_markup(&config.lists.bullet_marker)
    ));
    out.push_str(&format!(
        "#set enum(numbering: \"{}\")\n\n",
        escape_string(&config.lists.numbering)
    ));

    emit_blocks(blocks, &mut out);
    out
}

fn emit_blocks(blocks: &[Block], out: &mut String) {
    let mut in_list = false;

    for block in blocks {
        let is_list_item = matches!(block, Block::Paragraph(p) if p.style.is_some());
        if in_list && !is_list_item {
            // Close the list before regular content
            out.push('\n');
        }
        in_list = is_list_item;

        match block {
            Block::Paragraph(paragraph) => emit_paragraph(paragraph, out),
            Block::Table(table) => {
                // Keep tables together when possible
                out.push_str("#block(breakable: false)[\n");
                table_to_typst(table, out);
                out.push_str("]\n\n");
            }
            Block::Image(image) => {
                out.push_str(&format!(
                    "#align(center)[#image(\"{}\", width: {}in)]\n\n",
                    escape_string(&image.path.to_string_lossy()),
                    image.width
                ));
            }
            Block::PageBreak => out.push_str("#pagebreak()\n\n"),
        }
    }
}

fn emit_paragraph(paragraph: &Paragraph, out: &mut String) {
    match paragraph.style {
        Some(list) => {
            out.push_str(&"  ".repeat(list.level as usize));
            out.push_str(if list.ordered { "+ " } else { "- " });
            runs_to_typst(&paragraph.runs, out);
            out.push('\n');
        }
        None if paragraph.runs.iter().all(|run| run.text.is_empty()) => {
            // Empty paragraphs still take up a line
            out.push_str("#v(1em)\n\n");
        }
        None => {
            runs_to_typst(&paragraph.runs, out);
            out.push_str("\n\n");
        }
    }
}

fn runs_to_typst(runs: &[Run], out: &mut String) {
    for run in runs {
        run_to_typst(run, out);
    }
}

fn run_to_typst(run: &Run, out: &mut String) {
    let mut args = Vec::new();
    if let Some(font) = &run.font {
        args.push(format!("font: \"{}\"", escape_string(font)));
    }
    if let Some(size) = run.size {
        args.push(format!("size: {}pt", size));
    }
    if run.bold {
        args.push("weight: \"bold\"".to_string());
    }
    if run.italic {
        args.push("style: \"italic\"".to_string());
    }
    if let Some(color) = run.color {
        args.push(format!("fill: rgb(\"{}\")", color));
    }

    if args.is_empty() {
        out.push_str(&escape_markup(&run.text));
    } else {
        out.push_str("#text(");
        out.push_str(&args.join(", "));
        out.push_str(")[");
        out.push_str(&escape_markup(&run.text));
        out.push(']');
    }
}

/// Escape special Typst characters in markup
fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Digits seen since the start of the current line
    let mut line_digits = Some(0);
    for ch in text.chars() {
        // "1." at the start of a line would open an enum item
        let enum_marker = matches!((line_digits, ch), (Some(n), '.') if n > 0);
        line_digits = match (line_digits, ch) {
            (_, '\n') => Some(0),
            (Some(n), '0'..='9') => Some(n + 1),
            (Some(0), ' ' | '\t') => Some(0),
            _ => None,
        };
        if enum_marker {
            out.push_str("\\.");
            continue;
        }
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str(" \\\n"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn table_to_typst(table: &Table, out: &mut String) {
    let col_count = table.column_count();
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    for row in &table.rows {
        for cell in &row.cells {
            let mut content = String::new();
            emit_blocks(&cell.blocks, &mut content);
            out.push_str("  [");
            out.push_str(content.trim_end());
            out.push_str("],\n");
        }
        // Pad ragged rows so later rows stay aligned
        for _ in row.cells.len()..col_count {
            out.push_str("  [],\n");
        }
    }

    out.push_str(")\n");
}
