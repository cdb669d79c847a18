use lexitrial::export::{CsvExporter, Exporter};
use lexitrial::sequence::WordCategory;
use lexitrial::session::TrialRecord;
use lexitrial::stage::Stage;
use lexitrial::summary::SummaryBook;
use lexitrial::tracker::AccuracyTracker;
use std::fs;
use tempfile::TempDir;

fn sample_book() -> SummaryBook {
    let mut book = SummaryBook::new("2026-08-24_10h00".to_string());

    let mut tracker = AccuracyTracker::new();
    tracker.record(WordCategory::TrueWord, true);
    tracker.record(WordCategory::Target, true);
    let records = vec![
        TrialRecord {
            word: "豆腐".to_string(),
            response: "a".to_string(),
            reaction_time_ms: 420,
            expected: WordCategory::TrueWord,
        },
        TrialRecord {
            word: "雞蛋".to_string(),
            response: "space".to_string(),
            reaction_time_ms: 900,
            expected: WordCategory::Target,
        },
    ];
    book.fold_stage(Stage::Reward, &records, &tracker, &[200, 210]);
    book
}

#[test]
fn writes_one_labeled_block_per_non_empty_stage() {
    let dir = TempDir::new().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let book = sample_book();

    let path = exporter.export(&book, "participant1", "groupA").unwrap();
    assert_eq!(path.file_name().unwrap(), "groupA_participant1.csv");

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("lexical_rfb"));
    assert!(content.contains("accum_rfb"));
    assert!(content.contains("2026-08-24_10h00"));
    assert!(content.contains("豆腐"));
    // Stages with no folded rows produce no block.
    assert!(!content.contains("lexical_prac"));
    assert!(!content.contains("lexical_nofb"));
}

#[test]
fn export_rows_are_length_aligned() {
    let dir = TempDir::new().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let path = exporter.export(&sample_book(), "p", "g").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();

    // Header + two data rows for the reward block, all the same width.
    let block: Vec<&Vec<String>> = rows.iter().filter(|r| r.len() > 2).collect();
    assert_eq!(block.len(), 3);
    assert!(block.iter().all(|r| r.len() == block[0].len()));
}

#[test]
fn overwrites_a_previous_export_of_the_same_name() {
    let dir = TempDir::new().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let book = sample_book();

    let first = exporter.export(&book, "p", "g").unwrap();
    let second = exporter.export(&book, "p", "g").unwrap();
    assert_eq!(first, second);

    let content = fs::read_to_string(&second).unwrap();
    // One reward header, not two appended runs.
    assert_eq!(content.matches("lexical_rfb").count(), 1);
}

#[test]
fn the_book_survives_export_untouched() {
    let dir = TempDir::new().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let book = sample_book();

    exporter.export(&book, "p", "g").unwrap();
    // Padding happened on a copy: the in-memory columns keep their
    // pre-export lengths, so a retry sees identical state.
    let cols = book.stage(Stage::Reward);
    assert_eq!(cols.words.len(), 2);
    assert_eq!(cols.lexical_accuracy.len(), 1);
}
