//! Normalized invoice records produced by the supplier strategies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// A supplier with a registered parsing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supplier {
    /// Amazon VAT invoice.
    #[serde(rename = "Amazon")]
    Amazon,
    /// Amazon order summary printout.
    #[serde(rename = "Amazon Order Summary")]
    AmazonOrderSummary,
    /// Soak Rochford order invoice.
    #[serde(rename = "Soak Rochford")]
    SoakRochford,
}

impl Supplier {
    /// Every supplier, in registry order.
    pub const ALL: [Supplier; 3] = [
        Supplier::Amazon,
        Supplier::AmazonOrderSummary,
        Supplier::SoakRochford,
    ];

    /// The identifier consumers use to select this supplier.
    pub fn name(&self) -> &'static str {
        match self {
            Supplier::Amazon => "Amazon",
            Supplier::AmazonOrderSummary => "Amazon Order Summary",
            Supplier::SoakRochford => "Soak Rochford",
        }
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Supplier {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Supplier::ALL
            .into_iter()
            .find(|supplier| supplier.name() == wanted)
            .ok_or_else(|| ExtractionError::UnsupportedSupplier(s.to_string()))
    }
}

/// Whether an item price includes VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Price before VAT.
    ExVat,
    /// Price including VAT.
    IncVat,
}

impl PriceBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBasis::ExVat => "ex_vat",
            PriceBasis::IncVat => "inc_vat",
        }
    }
}

/// A single purchased product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Units ordered.
    pub quantity: u32,

    /// Price for the line as printed by the supplier.
    pub price: Decimal,

    /// Price of one unit, when the layout prints it separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    /// Whether `price` includes VAT.
    pub basis: PriceBasis,
}

/// Products keyed by cleaned name, in document order.
pub type Items = IndexMap<String, LineItem>;

/// The five aggregate monetary fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    Subtotal,
    Vat,
    Delivery,
    Promotion,
    Total,
}

impl SummaryField {
    /// All fields in rendering order.
    pub const ALL: [SummaryField; 5] = [
        SummaryField::Subtotal,
        SummaryField::Vat,
        SummaryField::Delivery,
        SummaryField::Promotion,
        SummaryField::Total,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SummaryField::Subtotal => "subtotal",
            SummaryField::Vat => "vat",
            SummaryField::Delivery => "delivery",
            SummaryField::Promotion => "promotion",
            SummaryField::Total => "total",
        }
    }
}

/// Invoice cost summary. `None` means the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub subtotal: Option<Decimal>,
    pub vat: Option<Decimal>,
    pub delivery: Option<Decimal>,
    /// Discount magnitude as printed; sign normalization is left to consumers.
    pub promotion: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl InvoiceSummary {
    /// Read one field.
    pub fn get(&self, field: SummaryField) -> Option<Decimal> {
        match field {
            SummaryField::Subtotal => self.subtotal,
            SummaryField::Vat => self.vat,
            SummaryField::Delivery => self.delivery,
            SummaryField::Promotion => self.promotion,
            SummaryField::Total => self.total,
        }
    }

    /// Write one field.
    pub fn set(&mut self, field: SummaryField, value: Option<Decimal>) {
        let slot = match field {
            SummaryField::Subtotal => &mut self.subtotal,
            SummaryField::Vat => &mut self.vat,
            SummaryField::Delivery => &mut self.delivery,
            SummaryField::Promotion => &mut self.promotion,
            SummaryField::Total => &mut self.total,
        };
        *slot = value;
    }

    /// Flat mapping with exactly the five keys, found or not.
    pub fn as_map(&self) -> IndexMap<&'static str, Option<Decimal>> {
        SummaryField::ALL
            .iter()
            .map(|field| (field.key(), self.get(*field)))
            .collect()
    }

    /// Check if every field was found.
    pub fn is_complete(&self) -> bool {
        SummaryField::ALL.iter().all(|field| self.get(*field).is_some())
    }
}

/// Order number and date, when the layout carries them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMetadata {
    pub order_number: Option<String>,
    pub order_date: Option<NaiveDate>,
}

/// One parse attempt over one document.
///
/// `raw_lines` is fixed at construction; every other field is derived from it
/// by the owning parser's lifecycle and is `None` until that runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInvoice {
    document_ref: PathBuf,
    supplier: Supplier,
    raw_lines: Vec<String>,
    order_number: Option<String>,
    order_date: Option<NaiveDate>,
    summary: InvoiceSummary,
    items: Option<Items>,
}

impl ParsedInvoice {
    pub(crate) fn new(document_ref: PathBuf, supplier: Supplier, raw_lines: Vec<String>) -> Self {
        Self {
            document_ref,
            supplier,
            raw_lines,
            order_number: None,
            order_date: None,
            summary: InvoiceSummary::default(),
            items: None,
        }
    }

    /// Replace every derived field at once.
    pub(crate) fn apply(&mut self, items: Items, summary: InvoiceSummary, metadata: OrderMetadata) {
        self.items = Some(items);
        self.summary = summary;
        self.order_number = metadata.order_number;
        self.order_date = metadata.order_date;
    }

    pub fn document_ref(&self) -> &Path {
        &self.document_ref
    }

    pub fn supplier(&self) -> Supplier {
        self.supplier
    }

    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    /// Items, or `None` before processing.
    pub fn items(&self) -> Option<&Items> {
        self.items.as_ref()
    }

    pub fn invoice_summary(&self) -> &InvoiceSummary {
        &self.summary
    }

    /// The five monetary fields as a flat mapping.
    pub fn summary(&self) -> IndexMap<&'static str, Option<Decimal>> {
        self.summary.as_map()
    }

    /// Sum of item prices, if any items were found.
    pub fn items_total(&self) -> Option<Decimal> {
        let items = self.items.as_ref().filter(|items| !items.is_empty())?;
        Some(items.values().map(|item| item.price).sum())
    }

    /// Check if the order number and all monetary fields are known.
    pub fn is_complete(&self) -> bool {
        self.order_number.is_some() && self.summary.is_complete()
    }

    /// The consumer-facing view of the parsed data.
    pub fn record(&self) -> InvoiceRecord<'_> {
        InvoiceRecord {
            supplier: self.supplier,
            order_number: self.order_number.as_deref(),
            order_date: self.order_date,
            summary: self.summary(),
            items: self.items.as_ref(),
        }
    }
}

impl fmt::Display for ParsedInvoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order_date {
            Some(date) => write!(f, "{} - {}", date, self.supplier),
            None => write!(f, "{} - {}", self.supplier, self.document_ref.display()),
        }
    }
}

/// Serializable result handed to the order-tracking side.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRecord<'a> {
    pub supplier: Supplier,
    pub order_number: Option<&'a str>,
    pub order_date: Option<NaiveDate>,
    pub summary: IndexMap<&'static str, Option<Decimal>>,
    pub items: Option<&'a Items>,
}
