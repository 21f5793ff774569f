//! Bounded line scanning shared by the supplier strategies.

use regex::Regex;
use tracing::warn;

use super::Result;
use super::rules::parse_amount;
use crate::error::{ExtractionError, ScanFailure};
use crate::models::invoice::{InvoiceSummary, Supplier, SummaryField};

/// Counts lines consumed by one inner loop and fails once the ceiling is passed.
///
/// At most `limit` lines may be consumed. Asking for a line past the end of
/// the document is also a failure: the scan started but never terminated.
/// Lines are handed out trimmed; callers never see source padding.
#[derive(Debug)]
pub struct ScanGuard {
    supplier: Supplier,
    stage: &'static str,
    limit: usize,
    consumed: usize,
}

impl ScanGuard {
    pub fn new(supplier: Supplier, stage: &'static str, limit: usize) -> Self {
        Self {
            supplier,
            stage,
            limit,
            consumed: 0,
        }
    }

    /// Consume the line at `index`.
    pub fn consume<'a>(&mut self, lines: &'a [String], index: usize) -> Result<&'a str> {
        let Some(line) = lines.get(index) else {
            return Err(self.fail(ScanFailure::EndOfInput));
        };

        self.consumed += 1;
        if self.consumed > self.limit {
            return Err(self.fail(ScanFailure::LimitExceeded {
                last_line: line.clone(),
            }));
        }

        Ok(line.trim())
    }

    /// Fail the scan for a layout-specific reason.
    pub fn fail(&self, reason: ScanFailure) -> ExtractionError {
        warn!(
            "{} {} scan aborted after {} lines: {}",
            self.supplier, self.stage, self.consumed, reason
        );
        ExtractionError::Unrecoverable {
            supplier: self.supplier.to_string(),
            stage: self.stage,
            limit: self.limit,
            reason,
        }
    }

    /// Lines consumed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Index of the first line at or after `from` whose trimmed text satisfies `is_anchor`.
pub fn find_anchor<F>(lines: &[String], from: usize, is_anchor: F) -> Option<usize>
where
    F: Fn(&str) -> bool,
{
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| is_anchor(line.trim()))
        .map(|(index, _)| index)
}

/// First capture group of the first match.
pub fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Apply one pattern per field; the first match wins and misses stay unknown.
pub fn extract_summary(text: &str, patterns: &[(SummaryField, &Regex)]) -> InvoiceSummary {
    let mut summary = InvoiceSummary::default();
    for (field, pattern) in patterns {
        let value = first_capture(pattern, text).and_then(parse_amount);
        summary.set(*field, value);
    }
    summary
}

/// Collapse internal whitespace runs to single spaces.
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
