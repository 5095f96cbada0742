//! Batch runs over directories of synthetic PDFs.

mod common;

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use pdf_outline::batch::{self, BatchOptions, FileStatus};
use pdf_outline::render::JsonFormat;
use pdf_outline::Error;
use tempfile::TempDir;

#[test]
fn test_batch_writes_one_json_per_pdf() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("outlines");

    common::write_pdf(&input.path().join("paper.pdf"), &common::paper());
    common::write_pdf(&input.path().join("Second.PDF"), &common::paper());
    fs::write(input.path().join("notes.txt"), "not a pdf").unwrap();

    let report = batch::run(input.path(), &out_dir, &BatchOptions::default()).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);

    let json = fs::read_to_string(out_dir.join("paper.json")).unwrap();
    assert!(json.starts_with("{\n  \"title\": \"Sparse Edge Ideals\""));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["outline"][0]["level"], "H1");
    assert_eq!(value["outline"][0]["text"], "1. Introduction");
    assert_eq!(value["outline"][0]["page"], 1);
    assert_eq!(value["outline"][2]["text"], "2. Results");

    assert!(out_dir.join("Second.json").exists());
    assert!(!out_dir.join("notes.json").exists());
}

#[test]
fn test_batch_skips_unreadable_documents() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    common::write_pdf(&input.path().join("a_good.pdf"), &common::paper());
    fs::write(input.path().join("b_broken.pdf"), "this is not a PDF file").unwrap();

    let options = BatchOptions::new().sequential().with_format(JsonFormat::Compact);
    let report = batch::run(input.path(), output.path(), &options).unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.succeeded(), 1);
    assert!(report.outcomes[0].is_success());
    assert!(matches!(
        report.outcomes[1].status,
        FileStatus::Skipped { .. }
    ));

    // No partial output for the broken document
    assert!(output.path().join("a_good.json").exists());
    assert!(!output.path().join("b_broken.json").exists());

    let json = fs::read_to_string(output.path().join("a_good.json")).unwrap();
    assert!(!json.contains('\n'));
}

#[test]
fn test_batch_reports_progress_per_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    for name in ["one.pdf", "two.pdf", "three.pdf"] {
        common::write_pdf(&input.path().join(name), &common::paper());
    }

    let seen = AtomicUsize::new(0);
    let report = batch::run_with_progress(input.path(), output.path(), &BatchOptions::default(), |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 3);
    // Outcomes come back in sorted input order
    let names: Vec<String> = report
        .outcomes
        .iter()
        .map(|o| o.input.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["one.pdf", "three.pdf", "two.pdf"]);
}

#[test]
fn test_batch_missing_input_dir() {
    let output = TempDir::new().unwrap();
    let missing = output.path().join("no-such-dir");

    let result = batch::run(&missing, output.path(), &BatchOptions::default());
    assert!(matches!(result, Err(Error::InputNotFound(_))));
}

#[test]
fn test_batch_empty_input_dir() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let out_dir = output.path().join("created");

    let report = batch::run(input.path(), &out_dir, &BatchOptions::default()).unwrap();
    assert!(report.is_empty());
    assert!(out_dir.is_dir());
}

#[test]
fn test_batch_output_write_failure_is_reported() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    common::write_pdf(&input.path().join("paper.pdf"), &common::paper());
    // A directory where the output file should go makes the write fail
    fs::create_dir(output.path().join("paper.json")).unwrap();

    let report = batch::run(input.path(), output.path(), &BatchOptions::default()).unwrap();
    assert_eq!(report.failed(), 1);
    assert!(matches!(report.outcomes[0].status, FileStatus::Failed { .. }));
}
