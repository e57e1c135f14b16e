//! Review mutations
//!
//! Reviewers may correct the batch and quantity of a stored line or delete it.
//! An edit never touches the line in place: it yields a replacement record
//! carrying the same id, and the session index is rebuilt afterwards.

use crate::aggregate::{aggregate, SessionIndex};
use crate::capture::parse_quantity;
use std::cmp::Ordering;
use stocktake_protocol::{LineId, ScanLine};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Enter a valid batch and a positive quantity")]
    InvalidEdit,

    #[error("No line with id '{0}'")]
    LineNotFound(LineId),
}

/// Corrected batch and quantity for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEdit {
    batch: String,
    qty: f64,
}

impl LineEdit {
    pub fn new(batch: &str, qty: f64) -> Result<Self, ReviewError> {
        let batch = batch.trim();
        if batch.is_empty() || !qty.is_finite() || qty <= 0.0 {
            return Err(ReviewError::InvalidEdit);
        }
        Ok(Self {
            batch: batch.to_string(),
            qty,
        })
    }

    /// Build an edit from the review table's text inputs.
    pub fn from_input(batch: &str, qty: &str) -> Result<Self, ReviewError> {
        let qty = parse_quantity(qty).map_err(|_| ReviewError::InvalidEdit)?;
        Self::new(batch, qty)
    }

    pub fn batch(&self) -> &str {
        &self.batch
    }

    pub fn qty(&self) -> f64 {
        self.qty
    }
}

/// The replacement record for `line` after applying `edit`.
pub fn apply_edit(line: &ScanLine, edit: &LineEdit) -> ScanLine {
    ScanLine {
        batch: edit.batch.clone(),
        qty: edit.qty,
        ..line.clone()
    }
}

/// A snapshot of the stored collection, in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    lines: Vec<ScanLine>,
}

impl LineSet {
    pub fn new(lines: Vec<ScanLine>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn as_slice(&self) -> &[ScanLine] {
        &self.lines
    }

    pub fn into_vec(self) -> Vec<ScanLine> {
        self.lines
    }

    pub fn get(&self, id: &LineId) -> Option<&ScanLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    fn position(&self, id: &LineId) -> Result<usize, ReviewError> {
        self.lines
            .iter()
            .position(|line| &line.id == id)
            .ok_or_else(|| ReviewError::LineNotFound(id.clone()))
    }

    /// Put the edited record at `id`, returning the replacement.
    pub fn replace(&mut self, id: &LineId, edit: &LineEdit) -> Result<&ScanLine, ReviewError> {
        let pos = self.position(id)?;
        let updated = apply_edit(&self.lines[pos], edit);
        self.lines[pos] = updated;
        info!(line = %id, batch = edit.batch(), qty = edit.qty(), "line updated");
        Ok(&self.lines[pos])
    }

    /// Drop the record at `id`, returning it.
    pub fn remove(&mut self, id: &LineId) -> Result<ScanLine, ReviewError> {
        let pos = self.position(id)?;
        let removed = self.lines.remove(pos);
        info!(line = %id, "line deleted");
        Ok(removed)
    }

    /// Order by creation time, oldest first. Uncommitted lines go last; ties keep store order.
    pub fn sort_by_created(&mut self) {
        self.lines.sort_by(|a, b| match (a.created_at, b.created_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    pub fn aggregate(&self) -> SessionIndex<'_> {
        aggregate(&self.lines)
    }
}

impl From<Vec<ScanLine>> for LineSet {
    fn from(lines: Vec<ScanLine>) -> Self {
        Self::new(lines)
    }
}
