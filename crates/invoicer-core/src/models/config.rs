//! Configuration structures for the parsing pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Default iteration ceiling for every bounded scan.
pub const DEFAULT_SCAN_LIMIT: usize = 100;

/// Main configuration for the invoicer pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicerConfig {
    /// Text source configuration.
    pub pdf: PdfConfig,

    /// Supplier strategy configuration.
    pub extraction: ExtractionConfig,
}

/// PDF text source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Retry encrypted documents with the empty user password.
    pub try_empty_password: bool,

    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            try_empty_password: true,
            max_pages: 0,
        }
    }
}

/// Supplier strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum lines a single consume loop may read before giving up.
    pub scan_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

impl ExtractionConfig {
    /// Config with a custom iteration ceiling.
    pub fn with_scan_limit(scan_limit: usize) -> Self {
        Self { scan_limit }
    }

    /// Reject settings no scan could run under.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.scan_limit == 0 {
            return Err(ExtractionError::InvalidConfig(
                "scan_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl InvoicerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InvoicerConfig::default();
        assert_eq!(config.extraction.scan_limit, 100);
        assert!(config.pdf.try_empty_password);
        assert_eq!(config.pdf.max_pages, 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InvoicerConfig =
            serde_json::from_str(r#"{"extraction": {"scan_limit": 7}}"#).unwrap();
        assert_eq!(config.extraction.scan_limit, 7);
        assert!(config.pdf.try_empty_password);
    }

    #[test]
    fn test_zero_scan_limit_rejected() {
        assert!(ExtractionConfig::with_scan_limit(0).validate().is_err());
        assert!(ExtractionConfig::with_scan_limit(1).validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvoicerConfig::default();
        config.extraction.scan_limit = 42;
        config.save(&path).unwrap();

        let loaded = InvoicerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.scan_limit, 42);
    }
}
