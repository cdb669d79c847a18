use crate::config::SessionParams;
use crate::ledger::BalanceLedger;
use crate::sequence::WordCategory;
use crate::stage::Stage;
use crate::tracker::AccuracyTracker;

/// One resolved trial. Immutable once created; the per-stage list is cleared
/// by being folded into the summary at stage end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub word: String,
    /// The raw key name of the response, empty on timeout.
    pub response: String,
    pub reaction_time_ms: u64,
    pub expected: WordCategory,
}

/// All mutable state of one stage attempt, created fresh on every (re)entry
/// and discarded after folding. Owning it as a value rules out cross-stage
/// leakage of counters, balance, or records.
#[derive(Debug, Clone)]
pub struct StageSession {
    pub stage: Stage,
    pub tracker: AccuracyTracker,
    pub ledger: BalanceLedger,
    pub records: Vec<TrialRecord>,
}

impl StageSession {
    pub fn new(stage: Stage, params: &SessionParams) -> Self {
        let starting = if stage.policy().bears_feedback() {
            params.starting_balance
        } else {
            0
        };
        Self {
            stage,
            tracker: AccuracyTracker::new(),
            ledger: BalanceLedger::new(starting, params.feedback_delta),
            records: Vec::new(),
        }
    }
}
