use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .canonicalize()
        .expect("fixture directory present")
}

#[test]
fn batch_writes_output_file() {
    let dir = fixtures_dir();
    let temp = tempdir().expect("tempdir");
    let output = temp.path().join("output.txt");

    cargo_bin_cmd!("ecoroute")
        .env("RUST_LOG", "error")
        .arg("--locations")
        .arg(dir.join("Locations.csv"))
        .arg("--distances")
        .arg(dir.join("Distances.csv"))
        .arg("batch")
        .arg("--input")
        .arg(dir.join("batch_eco.txt"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch processed."));

    let written = fs::read_to_string(&output).expect("output written");
    assert_eq!(
        written,
        "Source:1\nDestination:5\nDrivingRoute:1,2,6(7)\nParkingNode:6\nWalkingRoute:6,5(6)\nTotalTime:13\n"
    );
}

#[test]
fn batch_uses_default_file_names_in_working_directory() {
    let dir = fixtures_dir();
    let temp = tempdir().expect("tempdir");
    fs::copy(dir.join("Locations.csv"), temp.path().join("Locations.csv")).expect("copy");
    fs::copy(dir.join("Distances.csv"), temp.path().join("Distances.csv")).expect("copy");
    fs::copy(dir.join("batch_driving.txt"), temp.path().join("input.txt")).expect("copy");

    cargo_bin_cmd!("ecoroute")
        .current_dir(temp.path())
        .env("RUST_LOG", "error")
        .env_remove("ECOROUTE_LOCATIONS")
        .env_remove("ECOROUTE_DISTANCES")
        .arg("batch")
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("output.txt")).expect("output written");
    assert_eq!(
        written,
        "Source:1\nDestination:5\nBestDrivingRoute:1,2,3,5(15)\nAlternativeDrivingRoute:1,4,5(16)\n"
    );
}

#[test]
fn batch_json_format_prints_report() {
    let dir = fixtures_dir();
    let temp = tempdir().expect("tempdir");
    let output = temp.path().join("out.txt");

    let result = cargo_bin_cmd!("ecoroute")
        .env("RUST_LOG", "error")
        .arg("--locations")
        .arg(dir.join("Locations.csv"))
        .arg("--distances")
        .arg(dir.join("Distances.csv"))
        .arg("--format")
        .arg("json")
        .arg("batch")
        .arg("--input")
        .arg(dir.join("batch_restricted.txt"))
        .arg("--output")
        .arg(&output)
        .output()
        .expect("command runs");
    assert!(result.status.success());

    let json: serde_json::Value = serde_json::from_slice(&result.stdout).expect("valid json");
    assert_eq!(json["mode"], "driving-restricted");
    assert_eq!(json["route"]["steps"], serde_json::json!([1, 2, 6, 7, 5]));
    assert_eq!(json["route"]["time"], 20);
}

#[test]
fn batch_with_unsupported_mode_fails() {
    let dir = fixtures_dir();
    let temp = tempdir().expect("tempdir");
    let input = temp.path().join("input.txt");
    fs::write(&input, "Mode:flying\nSource:1\nDestination:5\n").expect("write input");

    cargo_bin_cmd!("ecoroute")
        .env("RUST_LOG", "error")
        .arg("--locations")
        .arg(dir.join("Locations.csv"))
        .arg("--distances")
        .arg(dir.join("Distances.csv"))
        .arg("batch")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("output.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read batch request"))
        .stderr(predicate::str::contains("flying"));
}

#[test]
fn menu_runs_from_stdin() {
    let dir = fixtures_dir();

    cargo_bin_cmd!("ecoroute")
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error")
        .arg("--locations")
        .arg(dir.join("Locations.csv"))
        .arg("--distances")
        .arg(dir.join("Distances.csv"))
        .arg("menu")
        .write_stdin("1\n1\n5\n6\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 8 locations and 10 segments."))
        .stdout(predicate::str::contains(
            "Fastest route from Harbour [1] to Riverside [5]: 15 min",
        ))
        .stdout(predicate::str::contains("Goodbye!"));
}
