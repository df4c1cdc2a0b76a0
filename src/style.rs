use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Paragraph, Run};

/// An sRGB color, written as `#rrggbb` in templates and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const DARK_BLUE: Rgb = Rgb(0, 0, 139);
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color `{0}`, expected #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Bold/italic state inherited from enclosing markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
}

impl InlineStyle {
    pub fn with_bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub fn with_italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }
}

/// The house style every generated run is formatted with.
///
/// This is the `[style]` section of the config. Runs are produced here and
/// handed back to the caller; nothing in this type touches a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HouseStyle {
    pub font: String,
    pub body_size: f32,
    pub heading_size: f32,
    pub title_size: f32,
    pub accent: Rgb,
    /// Paragraphs whose final text starts with this are drawn in the accent color.
    pub accent_prefix: String,
    /// Paragraphs whose final text ends with this are drawn in the accent color.
    pub accent_suffix: String,
}

impl Default for HouseStyle {
    fn default() -> Self {
        Self {
            font: "DIN Pro Regular".to_string(),
            body_size: 11.0,
            heading_size: 16.0,
            title_size: 24.0,
            accent: Rgb::DARK_BLUE,
            accent_prefix: "Department of ".to_string(),
            accent_suffix: " Report".to_string(),
        }
    }
}

impl HouseStyle {
    /// Body text run carrying the inherited inline attributes.
    pub fn body(&self, text: &str, inline: InlineStyle) -> Run {
        Run {
            text: text.to_string(),
            font: Some(self.font.clone()),
            size: Some(self.body_size),
            bold: inline.bold,
            italic: inline.italic,
            color: None,
        }
    }

    pub fn heading(&self, text: &str) -> Run {
        Run {
            size: Some(self.heading_size),
            bold: true,
            ..self.body(text, InlineStyle::default())
        }
    }

    pub fn title(&self, text: &str) -> Run {
        Run {
            size: Some(self.title_size),
            bold: true,
            color: Some(self.accent),
            ..self.body(text, InlineStyle::default())
        }
    }

    /// Recolor every run of `paragraph` when its text matches the accent rule.
    ///
    /// Must run after substitution: the rule looks at the paragraph's resulting
    /// text, not at the inserted value.
    pub fn apply_accent_rule(&self, paragraph: &mut Paragraph) -> bool {
        let text = paragraph.text();
        let text = text.trim();
        let matches = (!self.accent_prefix.is_empty() && text.starts_with(&self.accent_prefix))
            || (!self.accent_suffix.is_empty() && text.ends_with(&self.accent_suffix));
        if matches {
            for run in &mut paragraph.runs {
                run.color = Some(self.accent);
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#00008b".parse(), Ok(Rgb::DARK_BLUE));
        assert_eq!("1A4F8B".parse(), Ok(Rgb(0x1a, 0x4f, 0x8b)));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert_eq!(Rgb::DARK_BLUE.to_string(), "#00008b");
    }

    #[test]
    fn body_run_uses_house_font() {
        let style = HouseStyle::default();
        let run = style.body("hi", InlineStyle::default().with_italic());
        assert_eq!(run.font.as_deref(), Some("DIN Pro Regular"));
        assert_eq!(run.size, Some(11.0));
        assert!(run.italic);
        assert!(!run.bold);
        assert_eq!(run.color, None);
    }

    #[test]
    fn title_and_heading_sizes() {
        let style = HouseStyle::default();
        let title = style.title("Workshop Report");
        assert_eq!(title.size, Some(24.0));
        assert!(title.bold);
        assert_eq!(title.color, Some(Rgb::DARK_BLUE));

        let heading = style.heading("Summary");
        assert_eq!(heading.size, Some(16.0));
        assert!(heading.bold);
        assert_eq!(heading.color, None);
    }

    #[test]
    fn accent_rule_checks_final_paragraph_text() {
        let style = HouseStyle::default();

        let mut department = Paragraph::default();
        department.push_run(style.body("  Department of Physics ", InlineStyle::default()));
        assert!(style.apply_accent_rule(&mut department));
        assert_eq!(department.runs[0].color, Some(Rgb::DARK_BLUE));

        let mut title = Paragraph::default();
        title.push_run(style.body("Seminar", InlineStyle::default()));
        title.push_run(style.body(" Report", InlineStyle::default()));
        assert!(style.apply_accent_rule(&mut title));
        assert!(title.runs.iter().all(|run| run.color == Some(Rgb::DARK_BLUE)));

        let mut topic = Paragraph::default();
        topic.push_run(style.body("Topic: Report writing", InlineStyle::default()));
        assert!(!style.apply_accent_rule(&mut topic));
        assert_eq!(topic.runs[0].color, None);
    }
}
