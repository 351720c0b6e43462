use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// `cargo run --` with the configuration environment cleared
fn catalog_command(args: &[&str]) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "--"]).args(args);
    for var in [
        "AFFILIATION",
        "OUTFILE",
        "MANUAL_FILE",
        "AFFILIATION_MODE",
        "SOURCES",
        "GENERATED_AT",
        "EUROPEPMC_API_URL",
        "CROSSREF_API_URL",
        "OPENALEX_API_URL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_update_help() {
    let output = catalog_command(&["update", "--help"])
        .output()
        .expect("Failed to run update --help");

    assert!(output.status.success(), "update --help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--affiliation-mode"));
    assert!(stdout.contains("--outfile"));
}

#[test]
fn test_query_prints_europepmc_query() {
    let output = catalog_command(&["query", "--affiliation", "Institute for Systems Biology"])
        .output()
        .expect("Failed to run query");

    assert!(output.status.success(), "query should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "AFF:\"Institute for Systems Biology\" OR AFF:(Institute AND Systems AND Biology*) OR \
         \"Institute for Systems Biology\""
    );
}

#[test]
fn test_query_default_affiliation() {
    let output = catalog_command(&["query"]).output().expect("Failed to run query");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("AFF:\"Ukrainian Institute for Systems Biology and Medicine\""));
}

#[test]
fn test_primary_failure_keeps_previous_catalog() {
    let dir = tempdir().unwrap();
    let outfile = dir.path().join("publications.json");
    let previous = "{\n  \"generatedAt\": \"2025-06-01T00:00:00Z\",\n  \"count\": 0,\n  \"sources\": {},\n  \"items\": []\n}\n";
    fs::write(&outfile, previous).unwrap();

    let status = catalog_command(&[
        "update",
        "--outfile",
        outfile.to_str().unwrap(),
        "--manual",
        dir.path().join("manual.json").to_str().unwrap(),
        "--sources",
        "europepmc",
        "--europepmc-url",
        "http://127.0.0.1:9",
        "--timeout",
        "5",
        "--log-level",
        "ERROR",
    ])
    .status()
    .expect("Failed to run update");

    assert!(status.success(), "update should fall back to the previous catalog");
    assert_eq!(fs::read_to_string(&outfile).unwrap(), previous, "previous catalog must be untouched");
}

#[test]
fn test_primary_failure_without_previous_catalog_fails() {
    let dir = tempdir().unwrap();
    let outfile = dir.path().join("publications.json");

    let status = catalog_command(&[
        "update",
        "--outfile",
        outfile.to_str().unwrap(),
        "--manual",
        dir.path().join("manual.json").to_str().unwrap(),
        "--sources",
        "europepmc",
        "--europepmc-url",
        "http://127.0.0.1:9",
        "--timeout",
        "5",
        "--log-level",
        "OFF",
    ])
    .status()
    .expect("Failed to run update");

    assert!(!status.success(), "update without a previous catalog should fail");
    assert!(!outfile.exists());
}

#[test]
fn test_manual_only_update() {
    let dir = tempdir().unwrap();
    let outfile = dir.path().join("data/publications.json");
    let manual = dir.path().join("manual.json");
    fs::write(
        &manual,
        r#"{
            "dois": ["https://doi.org/10.5555/Seeded.v2"],
            "pmids": ["31234567"],
            "items": [
                {"title": "Book chapter", "authors": ["A. Author"], "url": "https://example.org/chapter", "date": "2020-02-03"}
            ]
        }"#,
    )
    .unwrap();

    let status = catalog_command(&[
        "update",
        "--outfile",
        outfile.to_str().unwrap(),
        "--manual",
        manual.to_str().unwrap(),
        "--sources",
        "crossref",
        "--crossref-url",
        "http://127.0.0.1:9",
        "--timeout",
        "5",
        "--generated-at",
        "2026-01-01T00:00:00Z",
        "--log-level",
        "OFF",
    ])
    .status()
    .expect("Failed to run update");
    assert!(status.success());

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&outfile).unwrap()).unwrap();
    assert_eq!(doc["generatedAt"], "2026-01-01T00:00:00Z");
    assert_eq!(doc["affiliationMode"], "lenient");

    // Crossref is unreachable and contributes nothing; the PMID-only seed has no title.
    let items = doc["items"].as_array().unwrap();
    assert_eq!(doc["count"], items.len());
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Book chapter");
    assert_eq!(items[1]["doi"], "10.5555/seeded.v2");
    assert!(items[1]["venue"].is_null());
    assert_eq!(doc["sources"]["manual"], 2);
    assert_eq!(doc["sources"]["crossref"], 0);
}
