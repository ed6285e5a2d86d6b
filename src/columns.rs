//! Fixed identity columns: an ordered set of name/extraction pairs.
//!
//! The set is configuration, not hardcoded logic — callers can supply their
//! own ordered list and the dynamic-column and fallback machinery is
//! untouched. Extractions are plain function pointers evaluated against a
//! request; whatever they return (including [`Cell::Empty`] for absent data)
//! lands in the row as-is.

use crate::data::{Cell, Request, humanize_label};

pub type ExtractFn = fn(&Request) -> Cell;

#[derive(Debug, Clone)]
pub struct FixedColumn {
    name: String,
    extract: ExtractFn,
}

impl FixedColumn {
    pub fn new(name: impl Into<String>, extract: ExtractFn) -> Self {
        Self {
            name: name.into(),
            extract,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, request: &Request) -> Cell {
        (self.extract)(request)
    }
}

/// The leading columns of every report, in declared order.
#[derive(Debug, Clone)]
pub struct FixedColumns {
    columns: Vec<FixedColumn>,
}

impl FixedColumns {
    pub fn new(columns: Vec<FixedColumn>) -> Self {
        Self { columns }
    }

    /// The stock request-export layout: Date, Requestor, Status.
    pub fn standard() -> Self {
        Self::new(vec![
            FixedColumn::new("Date", extract_date),
            FixedColumn::new("Requestor", extract_requestor),
            FixedColumn::new("Status", extract_status),
        ])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(FixedColumn::name)
    }

    /// Evaluates every extraction against `request`, in declared order.
    pub fn evaluate(&self, request: &Request) -> Vec<Cell> {
        self.columns
            .iter()
            .map(|column| column.evaluate(request))
            .collect()
    }
}

impl Default for FixedColumns {
    fn default() -> Self {
        Self::standard()
    }
}

fn extract_date(request: &Request) -> Cell {
    Cell::Text(request.created_at.format("%m/%d/%Y").to_string())
}

fn extract_requestor(request: &Request) -> Cell {
    match &request.requestor {
        Some(name) => Cell::Text(name.clone()),
        None => Cell::Empty,
    }
}

fn extract_status(request: &Request) -> Cell {
    Cell::Text(humanize_label(&request.status))
}
