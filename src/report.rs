//! Two-pass report generation: infer the schema, then build one row per
//! request against the fixed column order.

use log::debug;

use crate::{
    columns::FixedColumns,
    data::{Catalog, Cell, Request},
    dataset::Dataset,
    schema::ReportSchema,
};

/// A fully built report: the inferred schema plus one row per request, in
/// input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    schema: ReportSchema,
    rows: Vec<Vec<Cell>>,
}

impl Report {
    /// Builds the whole report in one pass over `dataset`. The schema is
    /// inferred first from all line items; rows are then constructed against
    /// that fixed order.
    pub fn build(columns: &FixedColumns, dataset: &Dataset) -> Self {
        let schema = ReportSchema::infer(columns, &dataset.requests, &dataset.catalog);
        let rows = dataset
            .requests
            .iter()
            .map(|request| build_row(&schema, columns, &dataset.catalog, request))
            .collect();
        Self { schema, rows }
    }

    pub fn schema(&self) -> &ReportSchema {
        &self.schema
    }

    pub fn headers(&self) -> &[String] {
        self.schema.headers()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Renders the report to plain string records: the header row first,
    /// then one aligned record per request. Consumers own serialization.
    pub fn into_records(self) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.rows.len() + 1);
        records.push(self.schema.headers().to_vec());
        records.extend(
            self.rows
                .into_iter()
                .map(|row| row.iter().map(Cell::as_display).collect()),
        );
        records
    }
}

fn build_row(
    schema: &ReportSchema,
    columns: &FixedColumns,
    catalog: &Catalog,
    request: &Request,
) -> Vec<Cell> {
    let mut row = columns.evaluate(request);
    row.resize(schema.width(), Cell::Count(0));

    for line in &request.line_items {
        let quantity = line.quantity.coerce();
        if !line.quantity.is_well_formed() {
            debug!(
                "Coercing quantity {:?} to {} for item reference {:?}",
                line.quantity, quantity, line.item_id
            );
        }
        let slot = match catalog.resolve_name(line.item_id) {
            Some(name) => schema
                .column_index(name)
                .unwrap_or_else(|| schema.fallback_index()),
            None => {
                debug!(
                    "Routing quantity {} to the deleted-items column (unresolvable reference {:?})",
                    quantity, line.item_id
                );
                schema.fallback_index()
            }
        };
        if let Some(Cell::Count(total)) = row.get_mut(slot) {
            *total += quantity;
        }
    }

    row
}
