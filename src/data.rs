//! Domain entities and the report cell value type.
//!
//! This module owns the read-only view of the upstream store: [`Request`],
//! [`LineItem`], [`Catalog`]/[`CatalogItem`], the lossy [`Quantity`] wrapper,
//! and the [`Cell`] values that report rows are made of.
//!
//! Two coercions are deliberate policy rather than errors:
//!
//! - a line item's catalog reference may no longer resolve (the catalog entry
//!   was deleted after the line item was recorded) — resolution returns `None`
//!   and the caller routes the quantity to the fallback column;
//! - a quantity may be absent or malformed — [`Quantity::coerce`] yields 0.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDateTime;
use heck::ToTitleCase;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
};

pub type ItemId = u64;

/// A catalog entry. Only `name` is consumed by report generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
}

/// Id-keyed catalog lookup. Line items hold ids, never owned entries, so a
/// deleted entry leaves the line item valid but unresolvable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<ItemId, CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = CatalogItem>,
    {
        Self {
            entries: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    pub fn insert(&mut self, item: CatalogItem) {
        self.entries.insert(item.id, item);
    }

    pub fn remove(&mut self, id: ItemId) -> Option<CatalogItem> {
        self.entries.remove(&id)
    }

    pub fn resolve(&self, id: ItemId) -> Option<&CatalogItem> {
        self.entries.get(&id)
    }

    /// Follows a line item's optional reference to a catalog name.
    pub fn resolve_name(&self, reference: Option<ItemId>) -> Option<&str> {
        reference
            .and_then(|id| self.resolve(id))
            .map(|item| item.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.entries.values()
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for item in self.entries.values() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of catalog items")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Catalog, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut catalog = Catalog::new();
                while let Some(item) = seq.next_element::<CatalogItem>()? {
                    catalog.insert(item);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_seq(CatalogVisitor)
    }
}

/// A recorded quantity as the upstream store holds it: a well-formed count,
/// a raw token of unknown shape, or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Quantity {
    #[default]
    Missing,
    Count(u64),
    Raw(String),
}

impl Quantity {
    /// Collapses the recorded value to a non-negative count. Missing,
    /// non-numeric, and negative values coerce to 0; fractional values
    /// truncate toward zero.
    pub fn coerce(&self) -> u64 {
        match self {
            Quantity::Missing => 0,
            Quantity::Count(count) => *count,
            Quantity::Raw(token) => coerce_token(token),
        }
    }

    /// True when [`Quantity::coerce`] returns the value exactly as recorded.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Quantity::Count(_) => true,
            Quantity::Raw(token) => token.trim().parse::<u64>().is_ok(),
            Quantity::Missing => false,
        }
    }
}

fn coerce_token(token: &str) -> u64 {
    let token = token.trim();
    if let Ok(count) = token.parse::<u64>() {
        return count;
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
        _ => 0,
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Quantity::Missing => serializer.serialize_none(),
            Quantity::Count(count) => serializer.serialize_u64(*count),
            Quantity::Raw(token) => serializer.serialize_str(token),
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct QuantityVisitor;

        impl<'de> Visitor<'de> for QuantityVisitor {
            type Value = Quantity;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a count, a raw quantity token, or null")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Quantity, E> {
                Ok(Quantity::Count(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Quantity, E> {
                match u64::try_from(value) {
                    Ok(count) => Ok(Quantity::Count(count)),
                    Err(_) => Ok(Quantity::Raw(value.to_string())),
                }
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Quantity, E> {
                Ok(Quantity::Raw(value.to_string()))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Quantity, E> {
                Ok(Quantity::Raw(value.to_string()))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Quantity, E> {
                Ok(Quantity::Raw(value.to_string()))
            }

            fn visit_none<E: de::Error>(self) -> Result<Quantity, E> {
                Ok(Quantity::Missing)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Quantity, E> {
                Ok(Quantity::Missing)
            }

            fn visit_some<D2>(self, deserializer: D2) -> Result<Quantity, D2::Error>
            where
                D2: Deserializer<'de>,
            {
                deserializer.deserialize_any(QuantityVisitor)
            }
        }

        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// One requested line: a quantity plus an optional catalog reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub item_id: Option<ItemId>,
}

/// A request record as supplied by the upstream store. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub requestor: Option<String>,
    pub status: String,
    #[serde(default, rename = "items")]
    pub line_items: Vec<LineItem>,
}

/// A single report cell. `Empty` is what a fixed extraction naturally yields
/// when its source datum is absent; it is surfaced, never repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Text(String),
    Count(u64),
}

impl Cell {
    pub fn as_display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Count(count) => count.to_string(),
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Cell::Count(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Turns a machine status token into a display label (`under_review` ->
/// `Under Review`).
pub fn humanize_label(token: &str) -> String {
    token.to_title_case()
}
