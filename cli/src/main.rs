//! certgen CLI - batch certificate generator

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use certgen::{
    personalize_all, AttendeeKind, BatchOptions, DocumentRenderer, Error, ExportMode,
    ExportOptions, Exporter, LoadOptions, SofficeRenderer, Template,
};

#[derive(Parser)]
#[command(name = "certgen")]
#[command(version)]
#[command(about = "Generate personalized certificates from a slide template", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one certificate per attendee
    #[command(alias = "gen")]
    Generate {
        /// Attendee list (.xlsx, .csv, .tsv, .txt)
        #[arg(value_name = "ATTENDEES")]
        attendees: PathBuf,

        /// Template with [NAME] and [DATE] placeholders (.pptx)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Event date substituted for [DATE]
        #[arg(short, long)]
        date: String,

        /// Output file (defaults to the deliverable name in the current directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Deliverable shape
        #[arg(long, value_enum, default_value = "merged")]
        mode: Mode,

        /// Path to the LibreOffice executable
        #[arg(long, env = "CERTGEN_SOFFICE", value_name = "PATH")]
        soffice: Option<PathBuf>,

        /// Per-document render timeout in seconds
        #[arg(long, env = "CERTGEN_TIMEOUT", default_value = "60")]
        timeout: u64,

        /// Extra attempts after a failed render
        #[arg(long, default_value = "1")]
        retries: u32,

        /// Personalize in parallel
        #[arg(long)]
        parallel: bool,

        /// Treat the first row as a header
        #[arg(long, overrides_with = "no_header")]
        header: bool,

        /// Treat the first row as a name
        #[arg(long)]
        no_header: bool,
    },

    /// List the names read from an attendee file
    Names {
        /// Attendee list (.xlsx, .csv, .tsv, .txt)
        #[arg(value_name = "ATTENDEES")]
        attendees: PathBuf,

        /// Treat the first row as a header
        #[arg(long, overrides_with = "no_header")]
        header: bool,

        /// Treat the first row as a name
        #[arg(long)]
        no_header: bool,
    },

    /// Show template information
    Inspect {
        /// Template file (.pptx)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One PDF with a page per attendee
    Merged,
    /// ZIP of editable .pptx files
    Archive,
    /// ZIP of per-attendee PDFs
    PdfArchive,
}

impl From<Mode> for ExportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Merged => ExportMode::Merged,
            Mode::Archive => ExportMode::Archive,
            Mode::PdfArchive => ExportMode::RenderedArchive,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            attendees,
            template,
            date,
            output,
            mode,
            soffice,
            timeout,
            retries,
            parallel,
            header,
            no_header,
        } => cmd_generate(GenerateArgs {
            attendees: &attendees,
            template: &template,
            date: &date,
            output: output.as_deref(),
            mode: mode.into(),
            soffice: soffice.as_deref(),
            timeout: Duration::from_secs(timeout),
            retries,
            parallel,
            header: header_flag(header, no_header),
        }),
        Commands::Names {
            attendees,
            header,
            no_header,
        } => cmd_names(&attendees, header_flag(header, no_header)),
        Commands::Inspect { template, json } => cmd_inspect(&template, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(e.stage().exit_code());
    }
}

fn header_flag(header: bool, no_header: bool) -> Option<bool> {
    match (header, no_header) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

struct GenerateArgs<'a> {
    attendees: &'a Path,
    template: &'a Path,
    date: &'a str,
    output: Option<&'a Path>,
    mode: ExportMode,
    soffice: Option<&'a Path>,
    timeout: Duration,
    retries: u32,
    parallel: bool,
    header: Option<bool>,
}

fn cmd_generate(args: GenerateArgs<'_>) -> certgen::Result<()> {
    if args.date.trim().is_empty() {
        return Err(Error::InvalidInput("--date must not be empty".into()));
    }

    let renderer: Option<Arc<dyn DocumentRenderer>> = if args.mode.needs_renderer() {
        let renderer = match args.soffice {
            Some(path) => SofficeRenderer::new(path),
            None => SofficeRenderer::locate()?,
        };
        log::debug!(
            "Using {} with a {}s timeout",
            renderer.executable().display(),
            args.timeout.as_secs()
        );
        Some(Arc::new(renderer.with_timeout(args.timeout)))
    } else {
        None
    };

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    pb.set_message("Loading attendees...");
    let load_options = LoadOptions::new().with_header(args.header);
    let recipients = certgen::load_file(args.attendees, &load_options)?;
    pb.inc(1);

    pb.set_message("Reading template...");
    let template = Template::open(args.template)?;
    pb.inc(1);

    pb.set_message(format!("Personalizing {} certificates...", recipients.len()));
    let batch_options = BatchOptions::new().with_parallel(args.parallel);
    let docs = personalize_all(&template, &recipients, args.date, &batch_options)?;
    pb.inc(1);

    pb.set_message("Packaging...");
    let export_options = ExportOptions::new()
        .with_mode(args.mode)
        .with_retries(args.retries);
    let mut exporter = Exporter::new(export_options);
    if let Some(renderer) = renderer {
        exporter = exporter.with_renderer(renderer);
    }
    let deliverable = exporter.export(&docs)?;

    let output = args
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&deliverable.file_name));
    deliverable.persist(&output)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} ({} certificates, {} bytes)",
        "Saved to".green(),
        output.display(),
        deliverable.units,
        deliverable.len()
    );

    let split = template.split_placeholders();
    if !split.is_empty() {
        println!(
            "{} {} placeholder(s) split across formatting runs were left unchanged",
            "Warning:".yellow().bold(),
            split.len()
        );
    }

    Ok(())
}

fn cmd_names(attendees: &Path, header: Option<bool>) -> certgen::Result<()> {
    let kind = AttendeeKind::from_path(attendees)?;
    let recipients = certgen::load_file(attendees, &LoadOptions::new().with_header(header))?;

    println!(
        "{} ({:?}, {} names)",
        attendees.display().to_string().cyan().bold(),
        kind,
        recipients.len()
    );
    println!("{}", "─".repeat(40).dimmed());

    let width = certgen::model::index_width(recipients.len());
    for recipient in &recipients {
        println!(
            "{}  {}",
            format!("{:0width$}", recipient.index, width = width).dimmed(),
            recipient.name
        );
    }

    Ok(())
}

fn cmd_inspect(path: &Path, json: bool) -> certgen::Result<()> {
    let info = Template::open(path)?.info();

    if json {
        println!("{}", info.to_json(true)?);
        return Ok(());
    }

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), path.display());
    println!(
        "{}: {:.0} x {:.0} pt",
        "Page size".bold(),
        info.width_pt,
        info.height_pt
    );
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!("{}: {}", "Placeholder runs".bold(), info.placeholder_runs);

    if !info.split_placeholders.is_empty() {
        println!();
        println!("{}", "Split placeholders (not substituted)".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for split in &info.split_placeholders {
            println!("  {} {}: {}", "page".dimmed(), split.page, split.text);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "certgen".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Personalized certificate generator");
    println!();
    println!("Renderer: LibreOffice (soffice), set CERTGEN_SOFFICE to override");
    println!("License: MIT");
}
