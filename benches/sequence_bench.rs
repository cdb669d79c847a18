use criterion::{criterion_group, criterion_main, Criterion};
use lexitrial::config::StageWordSet;
use lexitrial::sequence::build_sequence;
use lexitrial::sequence::WordCategory;
use lexitrial::session::TrialRecord;
use lexitrial::stage::Stage;
use lexitrial::summary::SummaryBook;
use lexitrial::tracker::AccuracyTracker;
use std::collections::BTreeMap;
use std::hint::black_box;

fn big_word_set() -> StageWordSet {
    let true_words: Vec<String> = (0..250).map(|i| format!("true{:03}", i)).collect();
    let false_words: Vec<String> = (0..250).map(|i| format!("false{:03}", i)).collect();
    let mut targets = BTreeMap::new();
    for i in 0..20 {
        targets.insert(format!("target{:02}", i), Some(i * 25 + 1));
    }
    StageWordSet {
        true_words,
        false_words,
        targets,
    }
}

fn synthetic_records(n: usize) -> (Vec<TrialRecord>, AccuracyTracker, Vec<i64>) {
    let mut tracker = AccuracyTracker::new();
    let mut records = Vec::with_capacity(n);
    let mut log = Vec::with_capacity(n);
    let mut balance = 200i64;
    for i in 0..n {
        let category = match i % 3 {
            0 => WordCategory::TrueWord,
            1 => WordCategory::FalseWord,
            _ => WordCategory::Target,
        };
        let correct = i % 4 != 0;
        tracker.record(category, correct);
        records.push(TrialRecord {
            word: format!("word{:03}", i),
            response: "a".to_string(),
            reaction_time_ms: 400 + (i as u64 % 700),
            expected: category,
        });
        if category == WordCategory::Target {
            balance += if correct { 10 } else { -10 };
        }
        log.push(balance);
    }
    (records, tracker, log)
}

fn bench_build_sequence(c: &mut Criterion) {
    let set = big_word_set();
    c.bench_function("build_sequence_520", |b| {
        let mut rng = fastrand::Rng::with_seed(42);
        b.iter(|| build_sequence(black_box(&set), &mut rng).unwrap());
    });
}

fn bench_fold_stage(c: &mut Criterion) {
    let (records, tracker, log) = synthetic_records(500);
    c.bench_function("fold_stage_500", |b| {
        b.iter(|| {
            let mut book = SummaryBook::new("bench".to_string());
            book.fold_stage(
                Stage::Reward,
                black_box(&records),
                black_box(&tracker),
                black_box(&log),
            );
            book.pad_all();
            book
        });
    });
}

criterion_group!(benches, bench_build_sequence, bench_fold_stage);
criterion_main!(benches);
