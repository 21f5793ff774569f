//! Batch command - parse many invoices from one supplier.
//!
//! Parsing is best-effort: a document that fails is reported as unparsed and
//! the rest of the batch carries on.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use invoicer_core::{registry, InvoicerConfig, ParsedInvoice, SummaryField};

use super::parse::{format_invoice, OutputFormat};
use super::{is_plain_text, load_config, open_parser};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Supplier every document comes from
    #[arg(short, long)]
    supplier: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Read every input as plain text
    #[arg(long)]
    plain_text: bool,
}

/// Outcome for a single document.
struct ProcessResult {
    path: PathBuf,
    invoice: Option<ParsedInvoice>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    // An unknown supplier fails every document; reject it before reading any
    let supplier = registry().resolve(&args.supplier)?.supplier;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_plain_text(p, args.plain_text) || has_extension(p, "pdf"))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} {} documents to parse",
        style("ℹ").blue(),
        files.len(),
        supplier
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let config = Arc::clone(&config);
        let supplier = args.supplier.clone();
        let plain_text = args.plain_text;
        let pb = pb.clone();

        tasks.spawn_blocking(move || {
            let result = process_single_file(path, &supplier, &config, plain_text);
            pb.inc(1);
            drop(permit);
            result
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by(|a, b| a.path.cmp(&b.path));

    pb.finish_and_clear();

    if let Some(ref output_dir) = args.output_dir {
        let parsed: Vec<_> = results.iter().filter(|r| r.invoice.is_some()).collect();
        let names = output_names(parsed.iter().map(|r| r.path.as_path()));
        for (result, name) in parsed.iter().zip(names) {
            if let Some(invoice) = &result.invoice {
                write_output(output_dir, &name, invoice, args.format)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let (parsed, unparsed): (Vec<_>, Vec<_>) =
        results.iter().partition(|r| r.invoice.is_some());

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} parsed, {} unparsed",
        style(parsed.len()).green(),
        style(unparsed.len()).red()
    );

    if !unparsed.is_empty() {
        println!();
        println!("{}", style("Unparsed files:").yellow());
        for result in &unparsed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn process_single_file(
    path: PathBuf,
    supplier: &str,
    config: &InvoicerConfig,
    plain_text: bool,
) -> ProcessResult {
    let start = Instant::now();

    let outcome = open_parser(&path, supplier, config, plain_text)
        .map_err(anyhow::Error::from)
        .and_then(|mut parser| {
            parser.process_invoice()?;
            Ok(parser.into_invoice())
        });

    let processing_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(invoice) => {
            debug!("Parsed {} in {}ms", path.display(), processing_time_ms);
            ProcessResult {
                path,
                invoice: Some(invoice),
                error: None,
                processing_time_ms,
            }
        }
        Err(e) => {
            warn!("Leaving {} unparsed: {}", path.display(), e);
            ProcessResult {
                path,
                invoice: None,
                error: Some(e.to_string()),
                processing_time_ms,
            }
        }
    }
}

/// Output file stems, one per source, suffixed `-2`, `-3`, ... when stems repeat.
fn output_names<'a>(sources: impl IntoIterator<Item = &'a Path>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut names = Vec::new();

    for source in sources {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");

        let mut name = stem.to_string();
        let mut n = 1;
        while !taken.insert(name.clone()) {
            n += 1;
            name = format!("{}-{}", stem, n);
        }
        if n > 1 {
            warn!("{} shares its name with another input, writing it as {}", source.display(), name);
        }
        names.push(name);
    }

    names
}

fn write_output(
    output_dir: &Path,
    output_name: &str,
    invoice: &ParsedInvoice,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

    fs::write(&output_path, format_invoice(invoice, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status", "order_number", "order_date", "items"];
    header.extend(SummaryField::ALL.iter().map(|field| field.key()));
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        match &result.invoice {
            Some(invoice) => {
                record.push("parsed".to_string());
                record.push(invoice.order_number().unwrap_or_default().to_string());
                record.push(
                    invoice
                        .order_date()
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                );
                record.push(invoice.items().map_or(0, |items| items.len()).to_string());
                for field in SummaryField::ALL {
                    let value = invoice.invoice_summary().get(field);
                    record.push(value.map(|v| v.to_string()).unwrap_or_default());
                }
            }
            None => {
                record.push("unparsed".to_string());
                record.extend(std::iter::repeat_n(String::new(), 3 + SummaryField::ALL.len()));
            }
        }
        record.push(result.processing_time_ms.to_string());
        record.push(result.error.clone().unwrap_or_default());

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_disambiguate_repeated_stems() {
        let sources = [
            Path::new("in/a.pdf"),
            Path::new("in/a.txt"),
            Path::new("in/b.pdf"),
            Path::new("in/nested/a.pdf"),
        ];
        assert_eq!(output_names(sources), vec!["a", "a-2", "b", "a-3"]);
    }

    #[test]
    fn test_output_names_skip_taken_suffix() {
        let sources = [Path::new("a-2.pdf"), Path::new("a.pdf"), Path::new("x/a.pdf")];
        assert_eq!(output_names(sources), vec!["a-2", "a", "a-3"]);
    }
}
