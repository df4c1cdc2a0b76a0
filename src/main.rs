use std::fs;
use std::path::PathBuf;

use clap::Parser;
use docfill::report::{self, ReportFields};
use docfill::{Config, template};

#[derive(Parser)]
#[command(name = "docfill")]
#[command(about = "Fill an event report template and export it as PDF")]
struct Cli {
    /// Report fields (TOML)
    fields: PathBuf,

    /// Template file (TOML); the built-in template is used when missing
    #[arg(short, long, conflicts_with = "templates")]
    template: Option<PathBuf>,

    /// Directory of `<event type>_template.toml` files
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Invite poster image (repeatable)
    #[arg(long)]
    invite_poster: Vec<PathBuf>,

    /// Action photo (repeatable)
    #[arg(long)]
    action_photo: Vec<PathBuf>,

    /// Attendance sheet image (repeatable)
    #[arg(long)]
    attendance_sheet: Vec<PathBuf>,

    /// Analysis report image (repeatable)
    #[arg(long)]
    analysis_report: Vec<PathBuf>,

    /// Style config (TOML)
    #[arg(short, long, default_value = "docfill.toml")]
    config: PathBuf,

    /// Output file (defaults to the fields file name with .pdf or .typ)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write Typst source instead of PDF
    #[arg(long)]
    typst: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    let mut fields = match ReportFields::load(&cli.fields) {
        Ok(fields) => fields,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Images given on the command line are relative to the working directory
    for (section, extra) in [
        (&mut fields.invite_poster, cli.invite_poster),
        (&mut fields.action_photos, cli.action_photo),
        (&mut fields.attendance_sheet, cli.attendance_sheet),
        (&mut fields.analysis_report, cli.analysis_report),
    ] {
        section.extend(
            extra
                .into_iter()
                .map(|path| std::path::absolute(&path).unwrap_or(path)),
        );
    }

    let loaded = match &cli.templates {
        Some(dir) => template::for_event(dir, &fields.event_type),
        None => template::load_or_default(cli.template.as_deref(), &config.style),
    };
    let mut document = match loaded {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = report::fill_report(&mut document, &fields, &config.style) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let (bytes, extension) = if cli.typst {
        (docfill::document_to_typst(&document, &config).into_bytes(), "typ")
    } else {
        match docfill::document_to_pdf(&document, &config) {
            Ok(bytes) => (bytes, "pdf"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Determine output path
    let output = cli
        .output
        .unwrap_or_else(|| cli.fields.with_extension(extension));

    if let Err(e) = fs::write(&output, bytes) {
        eprintln!("Error writing {}: {}", output.display(), e);
        std::process::exit(1);
    }

    log::info!("wrote {}", output.display());
    println!("Created {}", output.display());
}
