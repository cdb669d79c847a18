use crate::config::StageWordSet;
use crate::error::{ExpResult, ExperimentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordCategory {
    TrueWord,
    FalseWord,
    Target,
}

impl WordCategory {
    /// Label written to the expected-answer summary columns.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TrueWord => "true_word",
            Self::FalseWord => "false_word",
            Self::Target => "target",
        }
    }
}

/// One stimulus to present. Produced here, popped and discarded by the
/// trial runner; at most one trial is current at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub word: String,
    pub category: WordCategory,
}

/// Builds the ordered trial list for one stage attempt.
///
/// Positioned targets are pinned at `position - 1`; everything else (true
/// words, false words, and unpinned targets) is shuffled uniformly and fills
/// the remaining slots left to right. The result is one-shot: a fresh
/// sequence is built on every stage (re)entry.
pub fn build_sequence(set: &StageWordSet, rng: &mut fastrand::Rng) -> ExpResult<Vec<Trial>> {
    let total = set.total();
    let mut slots: Vec<Option<Trial>> = vec![None; total];

    let mut fillers: Vec<Trial> = Vec::with_capacity(total);
    for word in &set.true_words {
        fillers.push(Trial {
            word: word.clone(),
            category: WordCategory::TrueWord,
        });
    }
    for word in &set.false_words {
        fillers.push(Trial {
            word: word.clone(),
            category: WordCategory::FalseWord,
        });
    }

    for (word, position) in &set.targets {
        let trial = Trial {
            word: word.clone(),
            category: WordCategory::Target,
        };
        match position {
            Some(pos) => {
                if *pos < 1 || *pos > total {
                    return Err(ExperimentError::Validation(format!(
                        "The stage word list is {} long; target '{}' position {} is out of range",
                        total, word, pos
                    )));
                }
                if let Some(occupant) = &slots[pos - 1] {
                    return Err(ExperimentError::Validation(format!(
                        "Targets '{}' and '{}' both pinned to position {}",
                        occupant.word, word, pos
                    )));
                }
                slots[pos - 1] = Some(trial);
            }
            None => fillers.push(trial),
        }
    }

    rng.shuffle(&mut fillers);

    let mut fill = fillers.into_iter();
    for slot in slots.iter_mut() {
        if slot.is_none() {
            *slot = fill.next();
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
