//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod parse;
pub mod suppliers;

use std::path::{Path, PathBuf};

use tracing::debug;

use invoicer_core::{
    parse_with, parse_with_source, InvoicerConfig, PlainTextSource, SupplierParser,
};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invoicer")
        .join("config.json")
}

/// Load the config named on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvoicerConfig> {
    if let Some(path) = config_path {
        return Ok(InvoicerConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        return Ok(InvoicerConfig::from_file(&default_path)?);
    }

    Ok(InvoicerConfig::default())
}

/// Whether a document should be read as pre-extracted text.
pub fn is_plain_text(path: &Path, force: bool) -> bool {
    force
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Construct a parser, reading `.txt` documents as plain text and everything
/// else through the supplier's registered source.
pub fn open_parser(
    path: &Path,
    supplier: &str,
    config: &InvoicerConfig,
    plain_text: bool,
) -> invoicer_core::Result<SupplierParser> {
    if is_plain_text(path, plain_text) {
        parse_with_source(path, supplier, &PlainTextSource, &config.extraction)
    } else {
        parse_with(path, supplier, config)
    }
}
