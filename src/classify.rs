use crate::sequence::WordCategory;
use crate::stage::FeedbackPolicy;

/// The three logical response classes. Raw key names are mapped to these by
/// `KeyBindings::resolve`; unrecognized keys resolve to nothing and never
/// reach classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKey {
    TrueWord,
    FalseWord,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Reward,
    Penalty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    /// Which feedback branch this trial takes, if any. Only target items in
    /// feedback-bearing stages ever produce one.
    pub feedback: Option<FeedbackKind>,
}

/// Maps a resolved response (or a timeout, `None`) to a semantic outcome.
/// Pure: identical inputs always yield identical outcomes.
///
/// A timeout counts against the category and is never correct; for targets
/// under a penalty-bearing policy it takes the penalty branch exactly as an
/// incorrect explicit response would.
pub fn classify(
    category: WordCategory,
    response: Option<ResponseKey>,
    policy: FeedbackPolicy,
) -> Outcome {
    let correct = matches!(
        (category, response),
        (WordCategory::TrueWord, Some(ResponseKey::TrueWord))
            | (WordCategory::FalseWord, Some(ResponseKey::FalseWord))
            | (WordCategory::Target, Some(ResponseKey::Target))
    );

    let feedback = match category {
        WordCategory::Target if correct && policy.rewards() => Some(FeedbackKind::Reward),
        WordCategory::Target if !correct && policy.penalizes() => Some(FeedbackKind::Penalty),
        _ => None,
    };

    Outcome { correct, feedback }
}
