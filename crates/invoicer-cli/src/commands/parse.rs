//! Parse command - extract order data from a single invoice.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invoicer_core::invoice::rules::format_amount;
use invoicer_core::{ParsedInvoice, SummaryField};

use super::{load_config, open_parser};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF, or pre-extracted .txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Supplier the invoice comes from (see `invoicer suppliers`)
    #[arg(short, long)]
    supplier: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Read the input as plain text regardless of extension
    #[arg(long)]
    plain_text: bool,

    /// Override the scan iteration ceiling
    #[arg(long)]
    scan_limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON order record
    Json,
    /// One CSV row per item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(limit) = args.scan_limit {
        config.extraction.scan_limit = limit;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing {} as {}", args.input.display(), args.supplier);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading document...");

    let mut parser = open_parser(&args.input, &args.supplier, &config, args.plain_text)?;

    pb.set_message("Extracting order data...");
    let invoice = parser.process_invoice()?;
    pb.finish_and_clear();

    let output = format_invoice(invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a parsed invoice in the requested format.
pub fn format_invoice(invoice: &ParsedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&invoice.record())?),
        OutputFormat::Csv => format_invoice_csv(invoice),
        OutputFormat::Text => Ok(format_invoice_text(invoice)),
    }
}

fn format_invoice_csv(invoice: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "supplier",
        "order_number",
        "order_date",
        "item",
        "quantity",
        "price",
        "unit_price",
        "basis",
    ])?;

    let supplier = invoice.supplier().to_string();
    let order_number = invoice.order_number().unwrap_or_default();
    let order_date = invoice
        .order_date()
        .map(|d| d.to_string())
        .unwrap_or_default();

    for (name, item) in invoice.items().into_iter().flatten() {
        let unit_price = item.unit_price.map(|p| p.to_string()).unwrap_or_default();
        wtr.write_record([
            supplier.as_str(),
            order_number,
            order_date.as_str(),
            name.as_str(),
            item.quantity.to_string().as_str(),
            item.price.to_string().as_str(),
            unit_price.as_str(),
            item.basis.as_str(),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_invoice_text(invoice: &ParsedInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice));
    output.push_str(&format!("Supplier: {}\n", invoice.supplier()));
    output.push_str(&format!(
        "Order number: {}\n",
        invoice.order_number().unwrap_or("unknown")
    ));
    output.push('\n');

    output.push_str("Items:\n");
    match invoice.items() {
        Some(items) if !items.is_empty() => {
            for (name, item) in items {
                output.push_str(&format!(
                    "  {} x {}  £{}\n",
                    item.quantity,
                    name,
                    format_amount(item.price)
                ));
            }
        }
        _ => output.push_str("  (none found)\n"),
    }
    output.push('\n');

    output.push_str("Summary:\n");
    let summary = invoice.invoice_summary();
    for field in SummaryField::ALL {
        let value = summary
            .get(field)
            .map(|v| format!("£{}", format_amount(v)))
            .unwrap_or_else(|| "unknown".to_string());
        output.push_str(&format!("  {:<10} {}\n", field.key(), value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_core::{parse_with_source, ExtractionConfig, StaticTextSource};

    fn parsed() -> ParsedInvoice {
        let source = StaticTextSource::new([
            "Order No: SR-1",
            "SKU Product Quantity Price Total Price",
            "W1 Soy Wax, 1kg 2 £1,250.00 £2,500.00",
            "Subtotal £2,500.00",
        ]);
        let mut parser =
            parse_with_source("a.pdf", "Soak Rochford", &source, &ExtractionConfig::default())
                .unwrap();
        parser.process_invoice().unwrap();
        parser.into_invoice()
    }

    #[test]
    fn test_csv_quotes_names() {
        let csv = format_invoice(&parsed(), OutputFormat::Csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            "Soak Rochford,SR-1,,\"Soy Wax, 1kg\",2,2500.00,1250.00,ex_vat"
        );
    }

    #[test]
    fn test_text_marks_unknown_fields() {
        let text = format_invoice(&parsed(), OutputFormat::Text).unwrap();
        assert!(text.contains("2 x Soy Wax, 1kg  £2,500.00"));
        assert!(text.contains("subtotal   £2,500.00"));
        assert!(text.contains("total      unknown"));
    }
}
