//! Report templates.
//!
//! A template is a document tree stored as TOML:
//!
//! ```toml
//! [[blocks]]
//! type = "paragraph"
//! runs = [{ text = "{{eventType}} Report", size = 24.0, bold = true }]
//!
//! [[blocks]]
//! type = "table"
//! rows = [
//!   { cells = [
//!     { blocks = [{ type = "paragraph", runs = [{ text = "Venue" }] }] },
//!     { blocks = [{ type = "paragraph", runs = [{ text = "{{venue}}" }] }] },
//!   ] },
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{Block, Cell, Document, Paragraph, Row, Run, Table};
use crate::error::{Error, Result};
use crate::style::{HouseStyle, InlineStyle};

/// Parse a template from TOML source.
pub fn from_toml(source: &str) -> Result<Document> {
    Ok(toml::from_str(source)?)
}

/// Load a template file. Relative image paths are taken from the file's
/// directory.
pub fn load(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document = from_toml(&source)?;
    document.resolve_images(&base_dir(path));
    Ok(document)
}

/// Absolute directory of `path`, for resolving the relative paths it holds.
pub(crate) fn base_dir(path: &Path) -> PathBuf {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// Load `path` when it exists, otherwise fall back to [`default_template`].
pub fn load_or_default(path: Option<&Path>, style: &HouseStyle) -> Result<Document> {
    match path {
        Some(path) if path.exists() => load(path),
        Some(path) => {
            log::warn!(
                "template {} not found, using the built-in template",
                path.display()
            );
            Ok(default_template(style))
        }
        None => {
            log::info!("no template given, using the built-in template");
            Ok(default_template(style))
        }
    }
}

/// Template used for event types without a template of their own.
const FALLBACK_EVENT: &str = "workshop";

/// Resolve the template for `event_type` in `dir`.
///
/// Looks for `<event type>_template.toml`, then the workshop template, and
/// finally settles for [`bare_template`].
pub fn for_event(dir: &Path, event_type: &str) -> Result<Document> {
    let file_name = |event: &str| format!("{}_template.toml", event.trim().to_lowercase());

    let own = dir.join(file_name(event_type));
    if own.exists() {
        return load(&own);
    }
    let fallback = dir.join(file_name(FALLBACK_EVENT));
    if fallback.exists() {
        log::info!(
            "no template for {:?}, using {}",
            event_type,
            fallback.display()
        );
        return load(&fallback);
    }
    log::warn!("no template in {}, using a bare title", dir.display());
    Ok(bare_template())
}

/// A document holding nothing but the title placeholder.
pub fn bare_template() -> Document {
    Document::new(vec![Block::Paragraph(Paragraph::with_runs(vec![
        Run::plain("{{eventType}} Report"),
    ]))])
}

/// Detail rows of the built-in template: label, placeholder.
const DETAILS: &[(&str, &str)] = &[
    ("Department", "{{department}}"),
    ("Topic", "{{topic}}"),
    ("Expert Name", "{{expertName}}"),
    ("Venue", "{{venue}}"),
    ("Event Date/Time", "{{dateTime}}"),
    ("Faculty Coordinator", "{{coordinator}}"),
    ("HOD Name", "{{hodName}}"),
    ("Participants", "{{participants}}"),
];

/// The template used when none is supplied.
pub fn default_template(style: &HouseStyle) -> Document {
    let body = |text: &str| {
        Block::Paragraph(Paragraph::with_runs(vec![
            style.body(text, InlineStyle::default()),
        ]))
    };
    let heading = |text: &str| Block::Paragraph(Paragraph::with_runs(vec![style.heading(text)]));

    // Title keeps no color of its own; the accent rule colors it once filled
    let title = Run {
        color: None,
        ..style.title("{{eventType}} Report")
    };

    let details = Table {
        rows: DETAILS
            .iter()
            .map(|&(label, placeholder)| Row {
                cells: vec![
                    Cell {
                        blocks: vec![body(label)],
                    },
                    Cell {
                        blocks: vec![body(placeholder)],
                    },
                ],
            })
            .collect(),
    };

    Document::new(vec![
        Block::Paragraph(Paragraph::with_runs(vec![title])),
        heading("Event Details"),
        Block::Table(details),
        heading("Summary"),
        body("{{summary}}"),
        heading("Outcome"),
        body("{{outcome}}"),
    ])
}
