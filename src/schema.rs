//! Report schema model and column inference.
//!
//! A [`ReportSchema`] is the immutable hand-off between the two report
//! passes: inference fixes the column order once over the full input, and
//! every row is then built against that order. The layout is always
//! `[fixed columns] + [distinct resolvable item names, ascending] +
//! [fallback column]`.
//!
//! ## Responsibilities
//!
//! - Collect every line item across every request and resolve it against the
//!   catalog, discarding misses
//! - Sort surviving names ascending (byte order, deterministic for identical
//!   input) and deduplicate
//! - Append the fallback column for quantities whose catalog entry no longer
//!   exists
//! - Build the name-to-index map once so row construction never does a linear
//!   header search

use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    columns::FixedColumns,
    data::{Catalog, Request},
};

/// Header of the column that absorbs quantities of deleted catalog entries.
/// Present in every report, even when all references resolve.
pub const DELETED_ITEMS_COLUMN: &str = "<DELETED_ITEMS>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSchema {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    fixed: usize,
}

impl ReportSchema {
    /// Infers the column order from the full request set. Runs exactly once
    /// per report; the result is immutable for the run.
    pub fn infer(columns: &FixedColumns, requests: &[Request], catalog: &Catalog) -> Self {
        let item_names = requests
            .iter()
            .flat_map(|request| &request.line_items)
            .filter_map(|line| catalog.resolve_name(line.item_id))
            .map(str::to_owned)
            .sorted()
            .dedup();

        let headers = columns
            .names()
            .map(str::to_owned)
            .chain(item_names)
            .chain(std::iter::once(DELETED_ITEMS_COLUMN.to_string()))
            .collect::<Vec<_>>();

        Self::from_headers(headers, columns.len())
    }

    fn from_headers(headers: Vec<String>, fixed: usize) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self {
            headers,
            index,
            fixed,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Total cell count of every row built against this schema.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed
    }

    pub fn dynamic_count(&self) -> usize {
        self.headers.len() - self.fixed - 1
    }

    /// The inferred item columns, fixed columns and fallback excluded.
    pub fn item_columns(&self) -> &[String] {
        &self.headers[self.fixed..self.headers.len() - 1]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn fallback_index(&self) -> usize {
        self.headers.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::{CatalogItem, LineItem, Quantity};

    fn request_with_items(item_ids: &[Option<u64>]) -> Request {
        Request {
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .expect("valid date")
                .and_hms_opt(0, 0, 0)
                .expect("valid time"),
            requestor: Some("Casey".to_string()),
            status: "open".to_string(),
            line_items: item_ids
                .iter()
                .map(|id| LineItem {
                    quantity: Quantity::Count(1),
                    item_id: *id,
                })
                .collect(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            CatalogItem {
                id: 1,
                name: "Soap".to_string(),
            },
            CatalogItem {
                id: 2,
                name: "Diapers".to_string(),
            },
        ])
    }

    #[test]
    fn item_columns_are_sorted_and_deduplicated() {
        let requests = vec![
            request_with_items(&[Some(1), Some(2)]),
            request_with_items(&[Some(2), Some(1), Some(1)]),
        ];
        let schema = ReportSchema::infer(&FixedColumns::standard(), &requests, &catalog());
        assert_eq!(schema.item_columns(), ["Diapers", "Soap"]);
        assert_eq!(schema.width(), 3 + 2 + 1);
    }

    #[test]
    fn fallback_column_is_always_last() {
        let requests = vec![request_with_items(&[Some(1)])];
        let schema = ReportSchema::infer(&FixedColumns::standard(), &requests, &catalog());
        assert_eq!(
            schema.headers().last().map(String::as_str),
            Some(DELETED_ITEMS_COLUMN)
        );
        assert_eq!(schema.fallback_index(), schema.width() - 1);
    }

    #[test]
    fn unresolvable_references_add_no_item_columns() {
        let requests = vec![request_with_items(&[Some(99), None])];
        let schema = ReportSchema::infer(&FixedColumns::standard(), &requests, &catalog());
        assert!(schema.item_columns().is_empty());
        assert_eq!(schema.dynamic_count(), 0);
        assert_eq!(schema.width(), 3 + 1);
    }

    #[test]
    fn name_lookup_matches_header_positions() {
        let requests = vec![request_with_items(&[Some(1), Some(2)])];
        let schema = ReportSchema::infer(&FixedColumns::standard(), &requests, &catalog());
        for (idx, header) in schema.headers().iter().enumerate() {
            assert_eq!(schema.column_index(header), Some(idx));
        }
        assert_eq!(schema.column_index("NoSuchColumn"), None);
    }
}
