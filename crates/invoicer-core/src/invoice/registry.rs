//! Static supplier registry.
//!
//! Adding a supplier means adding a `Supplier` variant, a strategy, and one
//! row to `ENTRIES`.

use std::collections::HashSet;

use lazy_static::lazy_static;
use tracing::debug;

use super::strategies::{AmazonInvoice, AmazonOrderSummary, SoakRochford};
use super::SupplierStrategy;
use crate::error::{ExtractionError, InvoicerError};
use crate::models::invoice::Supplier;
use crate::pdf::TextSourceKind;

/// What the registry knows about one supplier.
#[derive(Debug, Clone, Copy)]
pub struct StrategyDescriptor {
    pub supplier: Supplier,
    /// Text source documents of this supplier are read through.
    pub text_source: TextSourceKind,
    pub strategy: &'static dyn SupplierStrategy,
}

static ENTRIES: [StrategyDescriptor; 3] = [
    StrategyDescriptor {
        supplier: Supplier::Amazon,
        text_source: TextSourceKind::Pdf,
        strategy: &AmazonInvoice,
    },
    StrategyDescriptor {
        supplier: Supplier::AmazonOrderSummary,
        text_source: TextSourceKind::Pdf,
        strategy: &AmazonOrderSummary,
    },
    StrategyDescriptor {
        supplier: Supplier::SoakRochford,
        text_source: TextSourceKind::Pdf,
        strategy: &SoakRochford,
    },
];

lazy_static! {
    static ref REGISTRY: Registry =
        Registry::from_entries(&ENTRIES).expect("supplier registry table is malformed");
}

/// The process-wide registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Display names of every registered supplier.
pub fn supported_suppliers() -> Vec<&'static str> {
    registry().suppliers().map(|supplier| supplier.name()).collect()
}

/// Read-only mapping from supplier to strategy descriptor.
#[derive(Debug)]
pub struct Registry {
    entries: &'static [StrategyDescriptor],
}

impl Registry {
    /// Build a registry, checking that every supplier is registered exactly
    /// once and that each strategy parses the supplier it is filed under.
    pub fn from_entries(
        entries: &'static [StrategyDescriptor],
    ) -> std::result::Result<Self, InvoicerError> {
        let mut seen = HashSet::new();

        for entry in entries {
            if !seen.insert(entry.supplier) {
                return Err(InvoicerError::Config(format!(
                    "supplier {} registered twice",
                    entry.supplier
                )));
            }
            if entry.strategy.supplier() != entry.supplier {
                return Err(InvoicerError::Config(format!(
                    "supplier {} registered with the {} strategy",
                    entry.supplier,
                    entry.strategy.supplier()
                )));
            }
        }

        if let Some(missing) = Supplier::ALL.iter().find(|s| !seen.contains(*s)) {
            return Err(InvoicerError::Config(format!(
                "supplier {} has no registered strategy",
                missing
            )));
        }

        debug!("Supplier registry ready with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Look up a supplier by identifier.
    pub fn resolve(
        &self,
        supplier_id: &str,
    ) -> std::result::Result<&'static StrategyDescriptor, ExtractionError> {
        let supplier: Supplier = supplier_id.parse()?;
        self.get(supplier)
            .ok_or_else(|| ExtractionError::UnsupportedSupplier(supplier_id.to_string()))
    }

    pub fn get(&self, supplier: Supplier) -> Option<&'static StrategyDescriptor> {
        self.entries.iter().find(|entry| entry.supplier == supplier)
    }

    /// Registered suppliers in table order.
    pub fn suppliers(&self) -> impl Iterator<Item = Supplier> + '_ {
        self.entries.iter().map(|entry| entry.supplier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static DUPLICATED: [StrategyDescriptor; 2] = [
        StrategyDescriptor {
            supplier: Supplier::SoakRochford,
            text_source: TextSourceKind::Pdf,
            strategy: &SoakRochford,
        },
        StrategyDescriptor {
            supplier: Supplier::SoakRochford,
            text_source: TextSourceKind::PlainText,
            strategy: &SoakRochford,
        },
    ];

    static MISFILED: [StrategyDescriptor; 1] = [StrategyDescriptor {
        supplier: Supplier::Amazon,
        text_source: TextSourceKind::Pdf,
        strategy: &AmazonOrderSummary,
    }];

    static INCOMPLETE: [StrategyDescriptor; 1] = [StrategyDescriptor {
        supplier: Supplier::Amazon,
        text_source: TextSourceKind::Pdf,
        strategy: &AmazonInvoice,
    }];

    #[test]
    fn test_every_supplier_resolves() {
        for supplier in Supplier::ALL {
            let descriptor = registry().resolve(supplier.name()).unwrap();
            assert_eq!(descriptor.supplier, supplier);
            assert_eq!(descriptor.strategy.supplier(), supplier);
            assert_eq!(descriptor.text_source, TextSourceKind::Pdf);
        }
        assert_eq!(registry().len(), Supplier::ALL.len());
    }

    #[test]
    fn test_unknown_supplier() {
        let err = registry().resolve("Acme Supplies").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedSupplier(ref id) if id == "Acme Supplies"));
    }

    #[test]
    fn test_supported_suppliers() {
        assert_eq!(
            supported_suppliers(),
            vec!["Amazon", "Amazon Order Summary", "Soak Rochford"]
        );
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let err = Registry::from_entries(&DUPLICATED).unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_misfiled_strategy_rejected() {
        let err = Registry::from_entries(&MISFILED).unwrap_err();
        assert!(err.to_string().contains("Amazon Order Summary strategy"));
    }

    #[test]
    fn test_missing_supplier_rejected() {
        let err = Registry::from_entries(&INCOMPLETE).unwrap_err();
        assert!(err.to_string().contains("no registered strategy"));
    }
}
