use crate::{AnalyzeArgs, FetchArgs, PlaceholderArgs};
use anyhow::Context;
use pdf_structure::{analyze_file, compare_files, Thresholds};
use sample_fetcher::{write_manual_acquisition_note, FetchConfig, SampleFetcher};
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

const ANALYZE_USAGE: &str = "Usage: pdf-samples analyze <pdf_file> [translated_file]";

/// How a command finished when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    /// Required arguments were missing; usage was printed
    Usage,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Done => ExitCode::SUCCESS,
            Status::Usage => ExitCode::from(1),
        }
    }
}

pub fn analyze(args: AnalyzeArgs) -> anyhow::Result<Status> {
    let Some(pdf) = args.pdf else {
        println!("{}", ANALYZE_USAGE);
        return Ok(Status::Usage);
    };

    let mut thresholds = Thresholds::default();
    if let Some(ratio) = args.image_page_ratio {
        thresholds.image_page_ratio = ratio;
    }
    if let Some(ratio) = args.scan_area_ratio {
        thresholds.scan_image_area_ratio = ratio;
    }
    tracing::debug!(?thresholds, "Analyzing {}", pdf.display());

    match args.translated {
        Some(translated) => {
            let comparison = compare_files(&pdf, &translated, thresholds).with_context(|| {
                format!(
                    "Failed to compare {} with {}",
                    pdf.display(),
                    translated.display()
                )
            })?;
            print_json(&comparison, args.compact)?;
        }
        None => {
            let report = analyze_file(&pdf, thresholds)
                .with_context(|| format!("Failed to analyze {}", pdf.display()))?;
            print_json(&report, args.compact)?;
        }
    }
    Ok(Status::Done)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

pub fn fetch(args: FetchArgs) -> anyhow::Result<Status> {
    let mut config = match &args.config {
        Some(path) => FetchConfig::from_file(path)?,
        None => FetchConfig::default(),
    };
    if let Some(dir) = args.samples_dir {
        config = config.with_samples_dir(dir);
    }

    let fetcher = SampleFetcher::from_config(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(id) = &args.placeholder {
        fetcher.generate_placeholder(id, &mut out)?;
    } else if args.all || args.samples.is_empty() {
        writeln!(out, "Fetching all available samples...")?;
        fetcher.fetch_all(&[], &mut out)?;
    } else {
        writeln!(out, "Fetching specified samples: {:?}", args.samples)?;
        fetcher.fetch_all(&args.samples, &mut out)?;
    }

    writeln!(out, "\nDone!")?;
    write_manual_acquisition_note(&mut out)?;
    Ok(Status::Done)
}

pub fn placeholder(args: PlaceholderArgs) -> anyhow::Result<Status> {
    pdf_placeholder::create_placeholder_pdf(&args.output, &args.message)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    println!("Created placeholder PDF: {}", args.output.display());
    Ok(Status::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn analyze_args(pdf: Option<PathBuf>) -> AnalyzeArgs {
        AnalyzeArgs {
            pdf,
            translated: None,
            image_page_ratio: None,
            scan_area_ratio: None,
            compact: true,
        }
    }

    #[test]
    fn test_analyze_without_pdf_is_usage() {
        let status = analyze(analyze_args(None)).unwrap();
        assert_eq!(status, Status::Usage);
    }

    #[test]
    fn test_analyze_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = analyze(analyze_args(Some(dir.path().join("missing.pdf"))));
        assert!(result.is_err());
    }

    #[test]
    fn test_placeholder_then_analyze() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("placeholder.pdf");

        let status = placeholder(PlaceholderArgs {
            output: output.clone(),
            message: "Generated for testing".to_string(),
        })
        .unwrap();
        assert_eq!(status, Status::Done);
        assert!(output.exists());

        assert_eq!(analyze(analyze_args(Some(output))).unwrap(), Status::Done);
    }
}
