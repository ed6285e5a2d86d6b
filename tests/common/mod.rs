#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use request_export::data::{Catalog, CatalogItem, LineItem, Quantity, Request};
use request_export::dataset::Dataset;
use tempfile::{TempDir, tempdir};

/// The documented two-request example: Alice orders Pen twice, Bob's single
/// line references a catalog entry that no longer exists.
pub const SAMPLE_YAML: &str = "\
catalog:
  - id: 1
    name: Pen
requests:
  - created_at: 2024-01-01T00:00:00
    requestor: Alice
    status: open
    items:
      - item_id: 1
        quantity: 2
      - item_id: 1
        quantity: 3
  - created_at: 2024-01-02T00:00:00
    requestor: Bob
    status: closed
    items:
      - item_id: 99
        quantity: 5
";

pub fn sample_dataset() -> Dataset {
    Dataset {
        catalog: Catalog::from_items(vec![CatalogItem {
            id: 1,
            name: "Pen".to_string(),
        }]),
        requests: vec![
            request(
                january(1),
                Some("Alice"),
                "open",
                vec![line(Some(1), Quantity::Count(2)), line(Some(1), Quantity::Count(3))],
            ),
            request(
                january(2),
                Some("Bob"),
                "closed",
                vec![line(Some(99), Quantity::Count(5))],
            ),
        ],
    }
}

pub fn january(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
}

pub fn line(item_id: Option<u64>, quantity: Quantity) -> LineItem {
    LineItem { quantity, item_id }
}

pub fn request(
    created_at: NaiveDateTime,
    requestor: Option<&str>,
    status: &str,
    line_items: Vec<LineItem>,
) -> Request {
    Request {
        created_at,
        requestor: requestor.map(str::to_owned),
        status: status.to_string(),
        line_items,
    }
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
