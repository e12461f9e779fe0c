mod common;

use std::fs;

use common::{fixture_dataset, fixture_paths};
use ecoroute_lib::{Dataset, DatasetPaths, Error, LocationTable, TravelMode};
use tempfile::tempdir;

#[test]
fn loads_fixture_tables() {
    let dataset = fixture_dataset();

    assert_eq!(dataset.locations.len(), 8);
    assert_eq!(dataset.edges.len(), 10);
    assert_eq!(dataset.graph.edge_count(), 10);
    // The island has no edges and never enters the graph.
    assert_eq!(dataset.graph.node_count(), 7);
    assert!(!dataset.graph.contains("IS"));
}

#[test]
fn parking_codes_follow_table_order() {
    let dataset = fixture_dataset();
    assert_eq!(dataset.locations.parking_codes(), vec!["OT", "UN", "ST"]);
}

#[test]
fn unavailable_marker_becomes_missing_cost() {
    let dataset = fixture_dataset();
    let edge = dataset.graph.edge_between("RS", "ST").expect("edge exists");

    assert_eq!(edge.cost(TravelMode::Driving), None);
    assert_eq!(edge.cost(TravelMode::Walking), Some(6));
}

#[test]
fn lookups_by_id_and_code_agree() {
    let dataset = fixture_dataset();
    for location in dataset.locations.iter() {
        assert_eq!(dataset.locations.code_for_id(location.id), Some(location.code.as_str()));
        assert_eq!(dataset.locations.id_for_code(&location.code), Some(location.id));
    }
}

#[test]
fn codes_with_spaces_are_cleaned() {
    let dir = tempdir().expect("tempdir");
    let locations = dir.path().join("Locations.csv");
    let distances = dir.path().join("Distances.csv");
    fs::write(&locations, "Location,Id,Code,Parking\nNorth Gate,1,N G,1\nSouth Gate,2,SG,0\n")
        .expect("write locations");
    fs::write(&distances, "Location1,Location2,Driving,Walking\nN G,SG,3,9\n")
        .expect("write distances");

    let dataset = DatasetPaths::new(&locations, &distances).load().expect("loads");
    assert_eq!(dataset.locations.code_for_id(1), Some("NG"));
    assert!(dataset.graph.edge_between("NG", "SG").is_some());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let paths = DatasetPaths::new(dir.path().join("nope.csv"), fixture_paths().distances);

    let err = paths.load().expect_err("missing locations file");
    assert!(matches!(err, Error::Io(_)), "{err}");
}

#[test]
fn malformed_location_id_is_reported() {
    let input = "Location,Id,Code,Parking\nHarbour,one,HB,0\n";
    let err = LocationTable::from_reader(input.as_bytes()).expect_err("bad id");
    assert!(matches!(err, Error::InvalidLocation { row: 2, .. }), "{err}");
}

#[test]
fn dangling_edge_codes_still_load() {
    let locations =
        LocationTable::from_reader("Location,Id,Code,Parking\nA,1,A,0\n".as_bytes()).unwrap();
    let edges = ecoroute_lib::load_edges_from_reader(
        "Location1,Location2,Driving,Walking\nA,Z,2,X\n".as_bytes(),
    )
    .unwrap();

    let dataset = Dataset::from_parts(locations, edges);
    assert!(dataset.graph.contains("Z"));
}
