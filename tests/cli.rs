mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{TestWorkspace, fixture_path};

const DASHBOARD_SAMPLE: &str = "\
title,journal,publish_time
Cats in Homes,J1,2020-01-01
Dogs in Parks,J2,2021-05-01
Owl Migration,J1,2022-02-02
Undated Note,,
";

fn bibliometa() -> Command {
    Command::cargo_bin("bibliometa").expect("binary exists")
}

fn read_rows(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("open sample");
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| record.expect("record").iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn analyze_writes_sample_and_charts() {
    let workspace = TestWorkspace::new();
    let out = workspace.path().join("outputs");

    bibliometa()
        .args(["analyze", "-i"])
        .arg(fixture_path("metadata_small.csv"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Publications by year (2000 - 2020)"))
        .stdout(contains("Dropped columns: mag_id"))
        .stdout(contains("Top title words"));

    let (headers, rows) = read_rows(&out.join("metadata_clean_sample.csv"));
    assert!(headers.contains(&"year".to_string()));
    assert!(headers.contains(&"abstract_wordcount".to_string()));
    assert!(!headers.contains(&"mag_id".to_string()));
    assert_eq!(rows.len(), 2);

    for chart in [
        "publications_by_year.svg",
        "top_journals.svg",
        "title_wordcloud.svg",
        "top_sources.svg",
    ] {
        let svg = fs::read_to_string(out.join(chart)).expect("chart written");
        assert!(svg.starts_with("<svg"), "{chart} is not an SVG document");
    }
}

#[test]
fn analyze_sample_is_reproducible_for_a_seed() {
    let workspace = TestWorkspace::new();
    let mut samples = Vec::new();
    for dir in ["first", "second"] {
        let out = workspace.path().join(dir);
        bibliometa()
            .args(["analyze", "--no-charts", "--seed", "7", "--sample-fraction", "0.5", "-i"])
            .arg(fixture_path("metadata_small.csv"))
            .arg("-o")
            .arg(&out)
            .assert()
            .success();
        assert!(!out.join("publications_by_year.svg").exists());
        samples.push(fs::read_to_string(out.join("metadata_clean_sample.csv")).expect("sample"));
    }
    assert_eq!(samples[0], samples[1]);
    let (_, rows) = read_rows(&workspace.path().join("first/metadata_clean_sample.csv"));
    assert_eq!(rows.len(), 5);
}

#[test]
fn analyze_json_summary() {
    let workspace = TestWorkspace::new();
    let output = bibliometa()
        .args(["analyze", "--json", "--no-charts", "-i"])
        .arg(fixture_path("metadata_small.csv"))
        .arg("-o")
        .arg(workspace.path())
        .output()
        .expect("run analyze");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["raw_rows"], 10);
    assert_eq!(summary["dropped"][0], "mag_id");
    assert_eq!(summary["date_column"], "publish_time");
    assert_eq!(summary["years"]["2001"], 4);
    assert_eq!(summary["top_journals"][0]["label"], "PMC");
    assert_eq!(summary["top_journals"][0]["count"], 4);
}

#[test]
fn analyze_honours_config_file() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("analysis.yaml", "top_words: 3\nsample_fraction: 1.0\n");
    let out = workspace.path().join("out");
    let output = bibliometa()
        .args(["analyze", "--json", "--no-charts", "-c"])
        .arg(&config)
        .arg("-i")
        .arg(fixture_path("metadata_small.csv"))
        .arg("-o")
        .arg(&out)
        .output()
        .expect("run analyze");
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(summary["top_words"].as_array().map(Vec::len), Some(3));
    let (_, rows) = read_rows(&out.join("metadata_clean_sample.csv"));
    assert_eq!(rows.len(), 10);
}

#[test]
fn analyze_rejects_unknown_config_keys() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("analysis.yaml", "top_wrds: 3\n");
    bibliometa()
        .args(["analyze", "-c"])
        .arg(&config)
        .arg("-i")
        .arg(fixture_path("metadata_small.csv"))
        .arg("-o")
        .arg(workspace.path())
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn analyze_missing_input_fails() {
    let workspace = TestWorkspace::new();
    bibliometa()
        .args(["analyze", "-i"])
        .arg(workspace.path().join("absent.csv"))
        .arg("-o")
        .arg(workspace.path())
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("absent.csv")));
}

#[test]
fn analyze_limit_caps_rows() {
    let workspace = TestWorkspace::new();
    let output = bibliometa()
        .args(["analyze", "--json", "--no-charts", "--limit", "4", "-i"])
        .arg(fixture_path("metadata_small.csv"))
        .arg("-o")
        .arg(workspace.path())
        .output()
        .expect("run analyze");
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(summary["raw_rows"], 4);
}

#[test]
fn explore_full_range_shows_every_row() {
    let workspace = TestWorkspace::new();
    let sample = workspace.write("sample.csv", DASHBOARD_SAMPLE);
    bibliometa()
        .args(["explore", "-i"])
        .arg(&sample)
        .assert()
        .success()
        .stdout(contains("Showing 4 records for years 2020-2022"))
        .stdout(contains("Data sample (4 row(s))"));
}

#[test]
fn explore_narrow_range_and_journal() {
    let workspace = TestWorkspace::new();
    let sample = workspace.write("sample.csv", DASHBOARD_SAMPLE);
    bibliometa()
        .args(["explore", "--from-year", "2021", "-i"])
        .arg(&sample)
        .assert()
        .success()
        .stdout(contains("Showing 2 records for years 2021-2022"));

    bibliometa()
        .args(["explore", "--journal", "J1", "-i"])
        .arg(&sample)
        .assert()
        .success()
        .stdout(contains("Showing 2 records for years 2020-2022"))
        .stdout(contains("Dogs").not());
}

#[test]
fn explore_lists_journals() {
    let workspace = TestWorkspace::new();
    let sample = workspace.write("sample.csv", DASHBOARD_SAMPLE);
    bibliometa()
        .args(["explore", "--list-journals", "-i"])
        .arg(&sample)
        .assert()
        .success()
        .stdout("All\nJ1\nJ2\nUnknown\n");
}

#[test]
fn explore_rejects_inverted_range() {
    let workspace = TestWorkspace::new();
    let sample = workspace.write("sample.csv", DASHBOARD_SAMPLE);
    bibliometa()
        .args(["explore", "--from-year", "2022", "--to-year", "2020", "-i"])
        .arg(&sample)
        .assert()
        .failure()
        .stderr(contains("is after"));
}

#[test]
fn explore_writes_filtered_charts() {
    let workspace = TestWorkspace::new();
    let sample = workspace.write("sample.csv", DASHBOARD_SAMPLE);
    let charts = workspace.path().join("charts");
    bibliometa()
        .args(["explore", "-i"])
        .arg(&sample)
        .arg("--charts")
        .arg(&charts)
        .assert()
        .success();
    assert!(charts.join("publications_by_year.svg").exists());
    assert!(charts.join("top_journals.svg").exists());
    assert!(!charts.join("top_sources.svg").exists());
}
