use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

#[test]
fn cli_writes_layout_dump() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("layout.json");

    let exe = assert_cmd::cargo_bin!("genogram");
    Command::new(exe)
        .args([
            "-i",
            fixture("couple_child.json").to_string_lossy().as_ref(),
            "-o",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let json = fs::read_to_string(&out).expect("read layout");
    let value: serde_json::Value = serde_json::from_str(&json).expect("layout is json");
    let ids: Vec<&str> = value["connectors"]
        .as_array()
        .expect("connectors array")
        .iter()
        .filter_map(|connector| connector["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["marriage-1-2", "child-marriage-node-1-2-3"]);
}

#[test]
fn cli_exports_document_with_pinned_positions() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("pinned.json");

    let exe = assert_cmd::cargo_bin!("genogram");
    Command::new(exe)
        .args([
            "-i",
            fixture("manual_positions.json").to_string_lossy().as_ref(),
            "-o",
            out.to_string_lossy().as_ref(),
            "--outputFormat",
            "document",
            "--relayout",
        ])
        .assert()
        .success();

    let json = fs::read_to_string(&out).expect("read document");
    let value: serde_json::Value = serde_json::from_str(&json).expect("document is json");
    assert_eq!(value["version"], "1.0");
    let people = value["familyData"].as_array().expect("familyData");
    assert_eq!(people.len(), 4);
    assert!(people.iter().all(|person| person["position"].is_object()));
    // Relayout dropped the stored override before pinning.
    assert_eq!(people[0]["position"]["x"], 0.0);
}

#[test]
fn cli_reads_stdin_and_honours_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("genogram.json5");
    fs::write(&config, "{ layout: { verticalSpacing: 200 } }").expect("write config");
    let input = fs::read_to_string(fixture("couple_child.json")).expect("read fixture");

    let exe = assert_cmd::cargo_bin!("genogram");
    let output = assert_cmd::Command::new(exe)
        .args(["--configFile", config.to_string_lossy().as_ref()])
        .write_stdin(input)
        .output()
        .expect("run genogram");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is json");
    let child = value["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .find(|node| node["id"] == "3")
        .expect("child node");
    assert_eq!(child["y"], 200.0);
}

#[test]
fn cli_rejects_cyclic_document() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("cycle.json");
    fs::write(
        &input,
        r#"{"version":"1.0","nextKey":3,"familyData":[
            {"key":1,"name":"A","gender":"M","father":2},
            {"key":2,"name":"B","gender":"M","father":1}
        ]}"#,
    )
    .expect("write input");

    let exe = assert_cmd::cargo_bin!("genogram");
    let output = Command::new(exe)
        .args(["-i", input.to_string_lossy().as_ref()])
        .output()
        .expect("run genogram");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is a descendant of"), "stderr: {stderr}");
}
