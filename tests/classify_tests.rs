use lexitrial::classify::{classify, FeedbackKind, ResponseKey};
use lexitrial::sequence::WordCategory;
use lexitrial::stage::FeedbackPolicy;
use rstest::rstest;

use FeedbackPolicy::{Both, PenaltyOnly, RewardOnly};
use ResponseKey::{FalseWord as KeyFalse, Target as KeyTarget, TrueWord as KeyTrue};
use WordCategory::{FalseWord, Target, TrueWord};

#[rstest]
// Lexical categories: only the matching key is correct, never any feedback.
#[case(TrueWord, Some(KeyTrue), FeedbackPolicy::None, true, None)]
#[case(TrueWord, Some(KeyFalse), FeedbackPolicy::None, false, None)]
#[case(TrueWord, Some(KeyTarget), Both, false, None)]
#[case(FalseWord, Some(KeyFalse), Both, true, None)]
#[case(FalseWord, Some(KeyTrue), RewardOnly, false, None)]
#[case(TrueWord, None, PenaltyOnly, false, None)]
// Targets without feedback-bearing policy.
#[case(Target, Some(KeyTarget), FeedbackPolicy::None, true, None)]
#[case(Target, Some(KeyTrue), FeedbackPolicy::None, false, None)]
// Reward branch only on correct target under a rewarding policy.
#[case(Target, Some(KeyTarget), RewardOnly, true, Some(FeedbackKind::Reward))]
#[case(Target, Some(KeyTarget), Both, true, Some(FeedbackKind::Reward))]
#[case(Target, Some(KeyTarget), PenaltyOnly, true, None)]
// Penalty branch on incorrect target under a penalizing policy.
#[case(Target, Some(KeyTrue), PenaltyOnly, false, Some(FeedbackKind::Penalty))]
#[case(Target, Some(KeyFalse), Both, false, Some(FeedbackKind::Penalty))]
#[case(Target, Some(KeyTrue), RewardOnly, false, None)]
// Timeout behaves as an incorrect response, penalty branch included.
#[case(Target, None, PenaltyOnly, false, Some(FeedbackKind::Penalty))]
#[case(Target, None, Both, false, Some(FeedbackKind::Penalty))]
#[case(Target, None, RewardOnly, false, None)]
fn classification_table(
    #[case] category: WordCategory,
    #[case] response: Option<ResponseKey>,
    #[case] policy: FeedbackPolicy,
    #[case] correct: bool,
    #[case] feedback: Option<FeedbackKind>,
) {
    let outcome = classify(category, response, policy);
    assert_eq!(outcome.correct, correct);
    assert_eq!(outcome.feedback, feedback);
}

#[test]
fn classify_is_pure() {
    for _ in 0..100 {
        let outcome = classify(Target, Some(KeyTarget), Both);
        assert!(outcome.correct);
        assert_eq!(outcome.feedback, Some(FeedbackKind::Reward));
    }
}
