use crate::sequence::WordCategory;
use crate::session::TrialRecord;
use crate::stage::Stage;
use crate::tracker::AccuracyTracker;
use strum::IntoEnumIterator;

/// Empty placeholder used to pad short columns. Padding uses this, never a
/// zero, so padded cells are distinguishable from real values at export.
pub const EMPTY_CELL: &str = "";

/// Parallel per-stage columns in export-ready shape. All cells are strings;
/// shorter columns are right-padded with `EMPTY_CELL` before export.
#[derive(Debug, Clone)]
pub struct StageColumns {
    pub words: Vec<String>,
    pub key_responses: Vec<String>,
    pub lexical_expected: Vec<String>,
    pub phonetic_expected: Vec<String>,
    pub lexical_accuracy: Vec<String>,
    pub phonetic_accuracy: Vec<String>,
    pub reaction_times: Vec<String>,
    pub mean_reaction_times: Vec<String>,
    /// Running-balance column; present only for feedback-bearing stages.
    pub balance_accum: Option<Vec<String>>,
}

impl StageColumns {
    fn new(bears_feedback: bool) -> Self {
        Self {
            words: Vec::new(),
            key_responses: Vec::new(),
            lexical_expected: Vec::new(),
            phonetic_expected: Vec::new(),
            lexical_accuracy: Vec::new(),
            phonetic_accuracy: Vec::new(),
            reaction_times: Vec::new(),
            mean_reaction_times: Vec::new(),
            balance_accum: bears_feedback.then(Vec::new),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.columns().iter().map(|(_, col)| col.len()).max().unwrap_or(0)
    }

    /// Column labels and contents, in export order. Labels carry the stage
    /// prefix suffix at export time.
    pub fn columns(&self) -> Vec<(&'static str, &Vec<String>)> {
        let mut cols = vec![
            ("lexical", &self.words),
            ("keyresponse", &self.key_responses),
            ("lexical_ans", &self.lexical_expected),
            ("lexical_crate", &self.lexical_accuracy),
            ("phonetic_ans", &self.phonetic_expected),
            ("phonetic_crate", &self.phonetic_accuracy),
            ("reactiontime", &self.reaction_times),
            ("reactiontime_avg", &self.mean_reaction_times),
        ];
        if let Some(accum) = &self.balance_accum {
            cols.push(("accum", accum));
        }
        cols
    }

    /// Right-pads every column with the empty placeholder until all columns
    /// are the same length. Required before export; unpadded columns would
    /// produce ragged rows.
    pub fn pad(&mut self) {
        let max = self.row_count();
        for col in [
            &mut self.words,
            &mut self.key_responses,
            &mut self.lexical_expected,
            &mut self.phonetic_expected,
            &mut self.lexical_accuracy,
            &mut self.phonetic_accuracy,
            &mut self.reaction_times,
            &mut self.mean_reaction_times,
        ] {
            col.resize(max, EMPTY_CELL.to_string());
        }
        if let Some(accum) = &mut self.balance_accum {
            accum.resize(max, EMPTY_CELL.to_string());
        }
    }
}

/// Integer mean reaction time over a record list, 0 when empty.
pub fn mean_reaction_time(records: &[TrialRecord]) -> u64 {
    if records.is_empty() {
        return 0;
    }
    let sum: u64 = records.iter().map(|r| r.reaction_time_ms).sum();
    sum / records.len() as u64
}

/// Accumulated summary state for the whole session, one column block per
/// stage prefix. Survives a failed export so the export can be retried.
#[derive(Debug, Clone)]
pub struct SummaryBook {
    pub timestamp: String,
    stages: Vec<StageColumns>,
}

impl SummaryBook {
    pub fn new(timestamp: String) -> Self {
        Self {
            timestamp,
            stages: Stage::iter()
                .map(|s| StageColumns::new(s.policy().bears_feedback()))
                .collect(),
        }
    }

    pub fn stage(&self, stage: Stage) -> &StageColumns {
        &self.stages[stage.index()]
    }

    /// Folds one stage attempt into its column block. Practice retries fold
    /// once per attempt, so their rows accumulate. Folding an empty record
    /// list appends nothing.
    pub fn fold_stage(
        &mut self,
        stage: Stage,
        records: &[TrialRecord],
        tracker: &AccuracyTracker,
        balance_log: &[i64],
    ) {
        if records.is_empty() {
            return;
        }
        let cols = &mut self.stages[stage.index()];

        for record in records {
            cols.words.push(record.word.clone());
            cols.key_responses.push(record.response.clone());
            // The expected answer lands in exactly one of the two columns;
            // the other holds the placeholder for that row.
            match record.expected {
                WordCategory::Target => {
                    cols.phonetic_expected.push(record.expected.label().to_string());
                    cols.lexical_expected.push(EMPTY_CELL.to_string());
                }
                WordCategory::TrueWord | WordCategory::FalseWord => {
                    cols.lexical_expected.push(record.expected.label().to_string());
                    cols.phonetic_expected.push(EMPTY_CELL.to_string());
                }
            }
            cols.reaction_times.push(record.reaction_time_ms.to_string());
        }

        cols.lexical_accuracy.push(format!("{:.2}", tracker.lexical_pct()));
        cols.phonetic_accuracy.push(format!("{:.2}", tracker.target_pct()));
        cols.mean_reaction_times
            .push(mean_reaction_time(records).to_string());

        if let Some(accum) = &mut cols.balance_accum {
            accum.extend(balance_log.iter().map(i64::to_string));
            // Length parity with the word column; padded cells stay empty,
            // not zero.
            if accum.len() < cols.words.len() {
                accum.resize(cols.words.len(), EMPTY_CELL.to_string());
            }
        }
    }

    /// Pads every stage's columns to equal length. Call before export.
    pub fn pad_all(&mut self) {
        for cols in &mut self.stages {
            cols.pad();
        }
    }
}
