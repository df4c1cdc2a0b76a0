use std::path::Path;

use docfill::report::{ReportFields, fill_report};
use docfill::{Block, Config, Document, ListStyle, Rgb, paragraphs, template};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn filled() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = Config::compiled_default();
    let fields = ReportFields::load(&fixture("seminar_fields.toml")).unwrap();
    let mut document = template::load(&fixture("seminar_template.toml")).unwrap();
    fill_report(&mut document, &fields, &config.style).unwrap();
    document
}

fn body(document: &Document) -> Vec<(String, Option<ListStyle>)> {
    document
        .blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(p) => (p.text(), p.style),
            Block::Table(_) => ("<table>".to_string(), None),
            Block::Image(image) => (format!("<image {}>", image.path.display()), None),
            Block::PageBreak => ("<page break>".to_string(), None),
        })
        .collect()
}

#[test]
fn fills_body_in_reading_order() {
    let document = filled();
    let bullet = Some(ListStyle::bullet(0));
    let numbered = Some(ListStyle::numbered(0));
    let expected: Vec<(String, Option<ListStyle>)> = [
        ("Seminar Report", None),
        ("Department of Computer Science", None),
        ("<table>", None),
        ("Summary", None),
        ("Great turnout.", None),
        ("Item A", bullet),
        ("Item B", bullet),
        ("Outcome", None),
        ("Students drafted a code of conduct.", None),
        ("Bias", numbered),
        ("Privacy", numbered),
        ("Participants: 120", None),
        ("<table>", None),
    ]
    .into_iter()
    .map(|(text, style)| (text.to_string(), style))
    .collect();
    assert_eq!(body(&document), expected);
}

#[test]
fn fills_nested_tables() {
    let document = filled();
    let texts: Vec<String> = paragraphs(&document).map(|(_, p)| p.text()).collect();
    for value in [
        "AI Ethics",
        "March 03, 2025, 10:00 AM - 12:00 PM",
        "Seminar Hall 2",
        "N/A",
        "Dr. Rao",
        "Dr. Iyer",
    ] {
        assert!(texts.iter().any(|text| text == value), "missing {value}");
    }
    assert!(!texts.iter().any(|text| text.contains("{{")));
}

#[test]
fn applies_house_style() {
    let document = filled();
    let mut body = document.body_paragraphs();

    let title = body.next().unwrap();
    assert_eq!(title.runs.len(), 1);
    assert_eq!(title.runs[0].size, Some(24.0));
    assert!(title.runs[0].bold);
    assert_eq!(title.runs[0].color, Some(Rgb::DARK_BLUE));

    let department = body.next().unwrap();
    assert_eq!(department.runs.len(), 1);
    assert_eq!(department.runs[0].color, Some(Rgb::DARK_BLUE));
    assert_eq!(department.runs[0].size, Some(11.0));

    let item_b = document
        .body_paragraphs()
        .find(|p| p.text() == "Item B")
        .unwrap();
    let runs: Vec<(&str, bool)> = item_b
        .runs
        .iter()
        .map(|run| (run.text.as_str(), run.bold))
        .collect();
    assert_eq!(runs, [("Item ", false), ("B", true)]);

    let outcome = document
        .body_paragraphs()
        .find(|p| p.text().starts_with("Students"))
        .unwrap();
    assert!(outcome.runs.iter().any(|run| run.italic && run.text == "code of conduct"));
    assert!(outcome.runs.iter().all(|run| run.color.is_none()));
}

#[test]
fn default_template_round_trip() {
    let config = Config::compiled_default();
    let fields = ReportFields::load(&fixture("seminar_fields.toml")).unwrap();
    let mut document = template::default_template(&config.style);
    fill_report(&mut document, &fields, &config.style).unwrap();

    let typst = docfill::document_to_typst(&document, &config);
    assert!(typst.contains("Seminar Report"));
    assert!(typst.contains("- #text(font: \"DIN Pro Regular\", size: 11pt)[Item A]\n"));
    assert!(typst.contains("+ #text(font: \"DIN Pro Regular\", size: 11pt)[Bias]\n"));
    assert!(!typst.contains("{{"));
}

#[test]
fn unrelated_document_is_untouched_by_missing_tokens() {
    let config = Config::compiled_default();
    let mut document = template::from_toml(
        "[[blocks]]\ntype = \"paragraph\"\nruns = [{ text = \"No placeholders\" }]\n",
    )
    .unwrap();
    let before = document.clone();
    assert!(
        !docfill::expand_placeholder_html(&mut document, "{{summary}}", "<p>x</p>", &config.style)
            .unwrap()
    );
    assert_eq!(docfill::substitute_all(&mut document, "{{topic}}", "x", &config.style), 0);
    assert_eq!(document, before);
}

#[test]
fn documents_can_move_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Document>();
    assert_send_sync::<docfill::Fragment>();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let config = Config::compiled_default();
                let mut document = template::default_template(&config.style);
                let token = "{{summary}}";
                let html = format!("<p>run {i}</p>");
                docfill::expand_placeholder_html(&mut document, token, &html, &config.style)
                    .unwrap();
                document
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let document = handle.join().unwrap();
        let expected = format!("run {i}");
        assert!(document.body_paragraphs().any(|p| p.text() == expected));
    }
}

#[test]
fn resolves_template_from_directory_by_event_type() {
    let config = Config::compiled_default();
    let fields = ReportFields::load(&fixture("seminar_fields.toml")).unwrap();
    let dir = fixture("");

    let mut document = template::for_event(&dir, &fields.event_type).unwrap();
    assert_eq!(
        document,
        template::load(&fixture("seminar_template.toml")).unwrap()
    );

    fill_report(&mut document, &fields, &config.style).unwrap();
    assert_eq!(document.body_paragraphs().next().unwrap().text(), "Seminar Report");

    // Neither a hackathon nor a workshop template exists there
    let bare = template::for_event(&dir, "hackathon").unwrap();
    assert_eq!(bare, template::bare_template());
}

#[test]
fn image_sections_come_before_signatures() {
    let config = Config::compiled_default();
    let mut fields = ReportFields::load(&fixture("seminar_fields.toml")).unwrap();
    fields.action_photos = vec!["/srv/event/stage.jpg".into(), "/srv/event/crowd.jpg".into()];
    let mut document = template::default_template(&config.style);
    fill_report(&mut document, &fields, &config.style).unwrap();

    let tail: Vec<String> = body(&document)
        .into_iter()
        .rev()
        .take(6)
        .rev()
        .map(|(text, _)| text)
        .collect();
    assert_eq!(
        tail,
        [
            "Privacy",
            "<page break>",
            "Action Photos",
            "<image /srv/event/stage.jpg>",
            "<image /srv/event/crowd.jpg>",
            "<table>",
        ]
    );

    let typst = docfill::document_to_typst(&document, &config);
    assert!(typst.contains("#pagebreak()\n"));
    assert!(typst.contains("#align(center)[#image(\"/srv/event/stage.jpg\", width: 6in)]"));
}
