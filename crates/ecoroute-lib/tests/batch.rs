mod common;

use std::fs;

use common::{fixture_dataset, fixtures_dir};
use ecoroute_lib::{
    load_edges_from_reader, run_batch, BatchMode, BatchReport, BatchRequest, Dataset, Error,
    LocationTable, UNKNOWN_ID,
};
use tempfile::tempdir;

fn run_fixture(name: &str) -> BatchReport {
    let dataset = fixture_dataset();
    let request = BatchRequest::from_path(&fixtures_dir().join(name)).expect("batch parses");
    run_batch(&dataset, &request).expect("batch runs")
}

#[test]
fn driving_batch_reports_best_and_alternative() {
    let report = run_fixture("batch_driving.txt");
    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:5\nBestDrivingRoute:1,2,3,5(15)\nAlternativeDrivingRoute:1,4,5(16)\n"
    );
}

#[test]
fn restricted_batch_passes_through_required_location() {
    let report = run_fixture("batch_restricted.txt");
    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:5\nRestrictedDrivingRoute:1,2,6,7,5(20)\n"
    );
}

#[test]
fn eco_batch_reports_parking_and_total() {
    let report = run_fixture("batch_eco.txt");
    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:5\nDrivingRoute:1,2,6(7)\nParkingNode:6\nWalkingRoute:6,5(6)\nTotalTime:13\n"
    );
}

#[test]
fn eco_batch_without_viable_route_reports_message() {
    let dataset = fixture_dataset();
    let request = BatchRequest::parse("Mode:driving-walking\nSource:1\nDestination:5\nMaxWalkTime:5\n")
        .expect("parses");
    let report = run_batch(&dataset, &request).expect("runs");

    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:5\nDrivingRoute:none\nParkingNode:none\nWalkingRoute:none\nTotalTime:\nMessage:No viable eco route found.\n"
    );
}

#[test]
fn unreachable_destination_prints_none() {
    let dataset = fixture_dataset();
    let request =
        BatchRequest::parse("Mode:driving\nSource:1\nDestination:8\n").expect("parses");
    let report = run_batch(&dataset, &request).expect("runs");

    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:8\nBestDrivingRoute:none\nAlternativeDrivingRoute:none\n"
    );
}

#[test]
fn avoided_segments_are_honoured() {
    let dataset = fixture_dataset();
    let request = BatchRequest::parse(
        "Mode:driving-restricted\nSource:1\nDestination:5\nAvoidNodes:\nAvoidSegments:(3,5),(1,4)\n",
    )
    .expect("parses");
    assert_eq!(request.mode, BatchMode::DrivingRestricted);

    let report = run_batch(&dataset, &request).expect("runs");
    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:5\nRestrictedDrivingRoute:1,2,6,7,5(20)\n"
    );
}

#[test]
fn unknown_location_id_is_an_error() {
    let dataset = fixture_dataset();
    let request =
        BatchRequest::parse("Mode:driving\nSource:1\nDestination:42\n").expect("parses");

    let err = run_batch(&dataset, &request).expect_err("unknown id");
    assert!(matches!(err, Error::UnknownLocationId { id: 42 }), "{err}");
}

#[test]
fn route_through_code_missing_from_locations_uses_unknown_id() {
    let locations = "Location,Id,Code,Parking\nAlpha,1,A,0\nBeta,2,B,0\n";
    let distances = "Location1,Location2,Driving,Walking\nA,Z,2,X\nZ,B,2,X\n";
    let dataset = Dataset::from_parts(
        LocationTable::from_reader(locations.as_bytes()).expect("locations"),
        load_edges_from_reader(distances.as_bytes()).expect("edges"),
    );
    let request =
        BatchRequest::parse("Mode:driving\nSource:1\nDestination:2\n").expect("parses");

    let report = run_batch(&dataset, &request).expect("runs");
    match &report {
        BatchReport::Driving { best, .. } => {
            let best = best.as_ref().expect("route found");
            assert_eq!(best.steps, vec![1, UNKNOWN_ID, 2]);
        }
        other => panic!("unexpected report {other:?}"),
    }
    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:2\nBestDrivingRoute:1,-1,2(4)\nAlternativeDrivingRoute:none\n"
    );
}

#[test]
fn driving_batch_ignores_unknown_avoided_ids() {
    let dataset = fixture_dataset();
    let request = BatchRequest::parse(
        "Mode:driving\nSource:1\nDestination:5\nAvoidNodes:99\nAvoidSegments:(98,97)\n",
    )
    .expect("parses");

    let report = run_batch(&dataset, &request).expect("unused directives are not resolved");
    assert_eq!(
        report.render_text(),
        "Source:1\nDestination:5\nBestDrivingRoute:1,2,3,5(15)\nAlternativeDrivingRoute:1,4,5(16)\n"
    );
}

#[test]
fn restricted_batch_rejects_unknown_avoided_id() {
    let dataset = fixture_dataset();
    let request = BatchRequest::parse(
        "Mode:driving-restricted\nSource:1\nDestination:5\nAvoidNodes:99\n",
    )
    .expect("parses");

    let err = run_batch(&dataset, &request).expect_err("unknown avoided id");
    assert!(matches!(err, Error::UnknownLocationId { id: 99 }), "{err}");
}

#[test]
fn report_is_written_to_disk() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("output.txt");
    fs::write(&out, "stale contents that should be replaced\n").expect("seed output");

    let report = run_fixture("batch_driving.txt");
    report.write_to(&out).expect("writes");

    let written = fs::read_to_string(&out).expect("reads back");
    assert_eq!(written, report.render_text());
}
