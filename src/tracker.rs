use crate::sequence::WordCategory;

/// Per-stage response counters. Reset (rebuilt) at the start of every stage
/// attempt, including practice retries; never carried across stages.
#[derive(Debug, Default, Clone)]
pub struct AccuracyTracker {
    true_count: u32,
    true_correct: u32,
    false_count: u32,
    false_correct: u32,
    target_count: u32,
    target_correct: u32,
}

impl AccuracyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: WordCategory, correct: bool) {
        let (count, correct_count) = match category {
            WordCategory::TrueWord => (&mut self.true_count, &mut self.true_correct),
            WordCategory::FalseWord => (&mut self.false_count, &mut self.false_correct),
            WordCategory::Target => (&mut self.target_count, &mut self.target_correct),
        };
        *count += 1;
        if correct {
            *correct_count += 1;
        }
    }

    fn ratio(correct: u32, count: u32) -> f64 {
        if count == 0 {
            0.0
        } else {
            f64::from(correct) / f64::from(count)
        }
    }

    /// Combined correctness over true and false words, 0 when none recorded.
    pub fn lexical_accuracy(&self) -> f64 {
        Self::ratio(
            self.true_correct + self.false_correct,
            self.true_count + self.false_count,
        )
    }

    /// Correctness over targets alone, 0 when none recorded.
    pub fn target_accuracy(&self) -> f64 {
        Self::ratio(self.target_correct, self.target_count)
    }

    // The practice gate checks true-word and false-word accuracy separately.
    pub fn true_word_accuracy(&self) -> f64 {
        Self::ratio(self.true_correct, self.true_count)
    }

    pub fn false_word_accuracy(&self) -> f64 {
        Self::ratio(self.false_correct, self.false_count)
    }

    /// Percentage forms surfaced to the summary.
    pub fn lexical_pct(&self) -> f64 {
        self.lexical_accuracy() * 100.0
    }

    pub fn target_pct(&self) -> f64 {
        self.target_accuracy() * 100.0
    }
}
