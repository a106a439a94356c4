//! PDF sample toolkit
//!
//! `analyze` prints a JSON structure report (or an original/translated
//! comparison), `fetch` downloads manifest samples, `placeholder` writes a
//! stand-in PDF.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdf-samples")]
#[command(version, about = "Sample PDF tooling for translation testing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the internal structure of a PDF, or compare it with a translation
    Analyze(AnalyzeArgs),
    /// Download redistributable samples listed in the manifest
    Fetch(FetchArgs),
    /// Write a single-page placeholder PDF
    Placeholder(PlaceholderArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// PDF to analyze (the original when comparing)
    pdf: Option<PathBuf>,

    /// Translated PDF to compare against
    translated: Option<PathBuf>,

    /// Share of pages with images above which a document counts as rasterized
    #[arg(long)]
    image_page_ratio: Option<f64>,

    /// Share of the page an image must cover for the page to look scanned
    #[arg(long)]
    scan_area_ratio: Option<f64>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    /// Sample ids to fetch (default: all)
    samples: Vec<String>,

    /// Fetch every sample in the manifest
    #[arg(long)]
    all: bool,

    /// Generate a placeholder for this sample instead of downloading
    #[arg(long, value_name = "ID")]
    placeholder: Option<String>,

    /// Root of the samples tree (manifest.yaml, originals/)
    #[arg(long)]
    samples_dir: Option<PathBuf>,

    /// TOML file overriding fetcher settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct PlaceholderArgs {
    /// Output path
    #[arg(default_value = pdf_placeholder::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Message shown in the middle of the page
    #[arg(default_value = pdf_placeholder::DEFAULT_MESSAGE)]
    message: String,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // stdout carries the report and progress lines; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let status = match cli.command {
        Command::Analyze(args) => commands::analyze(args)?,
        Command::Fetch(args) => commands::fetch(args)?,
        Command::Placeholder(args) => commands::placeholder(args)?,
    };
    Ok(status.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_compare_args() {
        let cli = Cli::try_parse_from([
            "pdf-samples",
            "analyze",
            "orig.pdf",
            "translated.pdf",
            "--image-page-ratio",
            "0.5",
            "--compact",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.pdf, Some(PathBuf::from("orig.pdf")));
        assert_eq!(args.translated, Some(PathBuf::from("translated.pdf")));
        assert_eq!(args.image_page_ratio, Some(0.5));
        assert_eq!(args.scan_area_ratio, None);
        assert!(args.compact);
    }

    #[test]
    fn test_analyze_without_file_parses() {
        let cli = Cli::try_parse_from(["pdf-samples", "analyze"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.pdf, None);
    }

    #[test]
    fn test_fetch_args() {
        let cli = Cli::try_parse_from([
            "pdf-samples",
            "fetch",
            "irs-w9",
            "bitcoin-whitepaper",
            "--samples-dir",
            "corpus",
        ])
        .unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.samples, vec!["irs-w9", "bitcoin-whitepaper"]);
        assert_eq!(args.samples_dir, Some(PathBuf::from("corpus")));
        assert!(!args.all);
        assert_eq!(args.placeholder, None);
    }

    #[test]
    fn test_placeholder_defaults() {
        let cli = Cli::try_parse_from(["pdf-samples", "placeholder"]).unwrap();
        let Command::Placeholder(args) = cli.command else {
            panic!("expected placeholder");
        };
        assert_eq!(args.output, PathBuf::from("placeholder.pdf"));
        assert_eq!(args.message, "Google cannot translate scanned PDFs");
    }
}
