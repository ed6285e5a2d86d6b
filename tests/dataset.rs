mod common;

use common::{SAMPLE_YAML, TestWorkspace, sample_dataset};
use request_export::{
    data::Quantity,
    dataset::{self, DatasetError},
};

#[test]
fn yaml_dataset_round_trips_into_the_domain_model() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("requests.yaml", SAMPLE_YAML);

    let dataset = dataset::load(&path).expect("load yaml dataset");
    assert_eq!(dataset, sample_dataset());
    assert_eq!(dataset.line_item_count(), 3);
}

#[test]
fn json_dataset_loads_equivalently() {
    let workspace = TestWorkspace::new();
    let json = serde_json::to_string(&sample_dataset()).expect("serialize dataset");
    let path = workspace.write("requests.json", &json);

    let dataset = dataset::load(&path).expect("load json dataset");
    assert_eq!(dataset, sample_dataset());
}

#[test]
fn malformed_quantities_survive_loading() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "requests.yaml",
        "\
catalog: []
requests:
  - created_at: 2024-06-01T00:00:00
    requestor: Gus
    status: open
    items:
      - item_id: 3
        quantity: about ten
      - item_id: 3
",
    );

    let dataset = dataset::load(&path).expect("load dataset");
    let items = &dataset.requests[0].line_items;
    assert_eq!(items[0].quantity, Quantity::Raw("about ten".to_string()));
    assert_eq!(items[1].quantity, Quantity::Missing);
    assert_eq!(items.iter().map(|i| i.quantity.coerce()).sum::<u64>(), 0);
}

#[test]
fn unsupported_extension_is_rejected() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("requests.txt", "catalog: []\nrequests: []\n");

    let err = dataset::load(&path).expect_err("txt must be rejected");
    assert!(matches!(err, DatasetError::UnsupportedFormat { .. }));
}

#[test]
fn missing_file_surfaces_the_io_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("absent.yaml");

    let err = dataset::load(&path).expect_err("missing file must fail");
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn unparsable_content_is_fatal() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("requests.yaml", "requests: [{status: open}]");

    let err = dataset::load(&path).expect_err("missing created_at must fail");
    assert!(matches!(err, DatasetError::Yaml { .. }));
}
