//! Event report assembly: form fields poured into a template.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::document::{Block, Cell, Document, Image, Paragraph, Row, Table};
use crate::error::{Error, Result};
use crate::expand::expand_placeholder_html;
use crate::style::{HouseStyle, InlineStyle};
use crate::substitute::{apply_title, substitute_all};
use crate::template::base_dir;

/// Values submitted for one report.
///
/// `summary` and `outcome` are HTML fragments; `dateTime` arrives already
/// formatted. Image lists may be left out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFields {
    pub event_type: String,
    pub department: String,
    pub topic: String,
    #[serde(default)]
    pub expert_name: Option<String>,
    pub venue: String,
    pub date_time: String,
    pub coordinator: String,
    pub participants: u32,
    pub summary: String,
    pub outcome: String,
    pub hod_name: String,
    #[serde(default)]
    pub invite_poster: Vec<PathBuf>,
    #[serde(default)]
    pub action_photos: Vec<PathBuf>,
    #[serde(default)]
    pub attendance_sheet: Vec<PathBuf>,
    #[serde(default)]
    pub analysis_report: Vec<PathBuf>,
}

impl ReportFields {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load fields from a TOML file. Relative image paths are taken from the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut fields = Self::from_toml(&source)?;
        fields.resolve_images(&base_dir(path));
        Ok(fields)
    }

    /// Join relative image paths onto `base`.
    pub fn resolve_images(&mut self, base: &Path) {
        for images in [
            &mut self.invite_poster,
            &mut self.action_photos,
            &mut self.attendance_sheet,
            &mut self.analysis_report,
        ] {
            for image in images.iter_mut() {
                if image.is_relative() && !image.as_os_str().is_empty() {
                    *image = base.join(&*image);
                }
            }
        }
    }

    /// Image sections in report order, by heading.
    pub fn image_sections(&self) -> [(&'static str, &[PathBuf]); 4] {
        [
            ("Invite Poster", self.invite_poster.as_slice()),
            ("Action Photos", self.action_photos.as_slice()),
            ("Attendance Sheet", self.attendance_sheet.as_slice()),
            ("Analysis Report", self.analysis_report.as_slice()),
        ]
    }

    /// Event type as shown in the report ("guest lecture" -> "Guest Lecture").
    pub fn event_title(&self) -> String {
        title_case(&self.event_type)
    }

    /// Plain placeholders and their values.
    pub fn replacements(&self) -> Vec<(&'static str, String)> {
        vec![
            ("{{eventType}}", self.event_title()),
            ("{{department}}", self.department.clone()),
            ("{{topic}}", self.topic.clone()),
            (
                "{{expertName}}",
                self.expert_name
                    .clone()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("{{venue}}", self.venue.clone()),
            ("{{dateTime}}", self.date_time.clone()),
            ("{{coordinator}}", self.coordinator.clone()),
            ("{{participants}}", self.participants.to_string()),
            ("{{hodName}}", self.hod_name.clone()),
        ]
    }
}

/// Fill `document` with `fields`, then append the image sections and the
/// signature block.
pub fn fill_report(document: &mut Document, fields: &ReportFields, style: &HouseStyle) -> Result<()> {
    if !apply_title(document, "{{eventType}}", &fields.event_title(), style) {
        log::debug!("template has no title placeholder");
    }

    for (token, value) in fields.replacements() {
        let changed = substitute_all(document, token, &value, style);
        log::debug!("{} replaced in {} paragraph(s)", token, changed);
    }

    for (token, html) in [("{{summary}}", &fields.summary), ("{{outcome}}", &fields.outcome)] {
        if !expand_placeholder_html(document, token, html, style)? {
            log::debug!("{} not found in template", token);
        }
    }

    append_images(document, fields, style);
    append_signatures(document, &fields.coordinator, &fields.hod_name, style);
    Ok(())
}

/// One page per non-empty image section: a heading, then the pictures.
pub fn append_images(document: &mut Document, fields: &ReportFields, style: &HouseStyle) {
    for (heading, images) in fields.image_sections() {
        let images: Vec<&PathBuf> = images
            .iter()
            .filter(|image| !image.as_os_str().is_empty())
            .collect();
        if images.is_empty() {
            continue;
        }
        log::debug!("{} image(s) under {}", images.len(), heading);

        document.push_page_break();
        document.push_paragraph(Paragraph::with_runs(vec![style.heading(heading)]));
        for image in images {
            document.push_image(Image::new(image.clone()));
        }
    }
}

/// Two-column signature table at the end of the body.
pub fn append_signatures(document: &mut Document, coordinator: &str, hod_name: &str, style: &HouseStyle) {
    let cell = |label: &str, name: &str| Cell {
        blocks: [label, name]
            .into_iter()
            .map(|text| {
                Block::Paragraph(Paragraph::with_runs(vec![
                    style.body(text, InlineStyle::default()),
                ]))
            })
            .collect(),
    };
    document.push_table(Table {
        rows: vec![Row {
            cells: vec![
                cell("Name & Signature of Faculty-in-charge", coordinator),
                cell("Name & Signature of HoD", hod_name),
            ],
        }],
    });
}

/// Capitalize the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if in_word {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        in_word = ch.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &str = r#"
eventType = "guest lecture"
department = "Physics"
topic = "AI Ethics"
venue = "Hall A"
dateTime = "March 03, 2025, 10:00 AM - 12:00 PM"
coordinator = "Dr. Rao"
participants = 42
summary = "<p>Great turnout.</p>"
outcome = "Better awareness."
hodName = "Dr. Iyer"
"#;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("guest lecture"), "Guest Lecture");
        assert_eq!(title_case("WORKSHOP"), "Workshop");
        assert_eq!(title_case("hands-on lab"), "Hands-On Lab");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn expert_name_defaults_to_na() {
        let fields = ReportFields::from_toml(FIELDS).unwrap();
        assert_eq!(fields.expert_name, None);
        let replacements = fields.replacements();
        let expert = replacements
            .iter()
            .find(|(token, _)| *token == "{{expertName}}")
            .unwrap();
        assert_eq!(expert.1, "N/A");
        assert!(replacements.contains(&("{{participants}}", "42".to_string())));
        assert!(replacements.contains(&("{{eventType}}", "Guest Lecture".to_string())));
    }

    #[test]
    fn missing_field_is_an_error() {
        assert!(matches!(
            ReportFields::from_toml("eventType = \"workshop\"\n"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn image_sections_get_their_own_pages() {
        let mut fields = ReportFields::from_toml(FIELDS).unwrap();
        fields.invite_poster = vec!["poster.png".into()];
        fields.attendance_sheet = vec!["sheet-1.png".into(), PathBuf::new(), "sheet-2.png".into()];

        let style = HouseStyle::default();
        let mut doc = Document::default();
        append_images(&mut doc, &fields, &style);

        let heading = |text: &str| Block::Paragraph(Paragraph::with_runs(vec![style.heading(text)]));
        assert_eq!(
            doc.blocks,
            [
                Block::PageBreak,
                heading("Invite Poster"),
                Block::Image(Image::new("poster.png")),
                Block::PageBreak,
                heading("Attendance Sheet"),
                Block::Image(Image::new("sheet-1.png")),
                Block::Image(Image::new("sheet-2.png")),
            ]
        );
        let Block::Paragraph(title) = &doc.blocks[1] else {
            panic!("expected heading");
        };
        assert_eq!(title.runs[0].size, Some(16.0));
        assert!(title.runs[0].bold);
    }

    #[test]
    fn no_images_no_sections() {
        let fields = ReportFields::from_toml(FIELDS).unwrap();
        let mut doc = Document::default();
        append_images(&mut doc, &fields, &HouseStyle::default());
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn image_paths_resolve_against_fields_file() {
        let mut fields = ReportFields::from_toml(&format!(
            "{FIELDS}actionPhotos = [\"photos/a.jpg\", \"/srv/b.jpg\"]\n"
        ))
        .unwrap();
        fields.resolve_images(Path::new("/data/reports"));
        assert_eq!(
            fields.action_photos,
            [
                PathBuf::from("/data/reports/photos/a.jpg"),
                PathBuf::from("/srv/b.jpg"),
            ]
        );
    }

    #[test]
    fn signatures_go_last() {
        let mut doc = Document::default();
        doc.push_paragraph(Paragraph::default());
        append_signatures(&mut doc, "Dr. Rao", "Dr. Iyer", &HouseStyle::default());

        let Some(Block::Table(table)) = doc.blocks.last() else {
            panic!("expected signature table");
        };
        let cells: Vec<Vec<String>> = table.rows[0]
            .cells
            .iter()
            .map(|cell| {
                cell.blocks
                    .iter()
                    .map(|block| match block {
                        Block::Paragraph(p) => p.text(),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();
        assert_eq!(
            cells,
            [
                vec!["Name & Signature of Faculty-in-charge", "Dr. Rao"],
                vec!["Name & Signature of HoD", "Dr. Iyer"],
            ]
        );
    }
}
