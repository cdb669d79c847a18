#![allow(dead_code)]

use lexitrial::config::{StageWordSet, WordsConfig};
use lexitrial::controller::StageController;
use lexitrial::runner::{Effect, TimerToken};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Instant;

pub fn stage_set(
    true_words: &[&str],
    false_words: &[&str],
    targets: &[(&str, Option<usize>)],
) -> StageWordSet {
    StageWordSet {
        true_words: true_words.iter().map(|w| w.to_string()).collect(),
        false_words: false_words.iter().map(|w| w.to_string()).collect(),
        targets: targets
            .iter()
            .map(|(w, p)| (w.to_string(), *p))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// A config where every stage shares the same small word set: two true
/// words, two false words, one target pinned to slot 2.
pub fn small_config() -> WordsConfig {
    let mut stages = HashMap::new();
    for name in ["practice", "formal", "reward", "penalty", "reward_penalty"] {
        stages.insert(
            name.to_string(),
            stage_set(
                &["true01", "true02"],
                &["false01", "false02"],
                &[("target01", Some(2))],
            ),
        );
    }
    WordsConfig { stages }
}

/// Word names encode their category so response plans can decide by name.
pub fn key_for_correct(word: &str) -> String {
    if word.starts_with("true") {
        "a".to_string()
    } else if word.starts_with("false") {
        "l".to_string()
    } else {
        "space".to_string()
    }
}

/// Drives one full stage attempt of a controller whose next stage is
/// pending. `respond` maps each presented word to a key, or `None` to let
/// the response deadline elapse. Returns the terminal controller effect
/// (`AwaitStage` or `ExperimentComplete`) plus the full effect transcript.
pub fn play_attempt<F>(ctrl: &mut StageController, mut respond: F) -> (Effect, Vec<Effect>)
where
    F: FnMut(&str) -> Option<String>,
{
    let mut queue: VecDeque<Effect> = ctrl
        .start_pending()
        .expect("a stage should be pending")
        .into();
    let mut transcript = Vec::new();
    let mut armed: Option<TimerToken> = None;
    let mut presented: Option<String> = None;

    loop {
        while let Some(effect) = queue.pop_front() {
            transcript.push(effect.clone());
            match &effect {
                Effect::StartTimer(token, _) => armed = Some(*token),
                Effect::ShowStimulus(word) => presented = Some(word.clone()),
                Effect::AwaitStage(_) | Effect::ExperimentComplete => {
                    return (effect, transcript);
                }
                _ => {}
            }
        }

        let effects = match presented.take() {
            Some(word) => match respond(&word) {
                Some(key) => ctrl.on_key(&key, Instant::now()),
                None => {
                    let token = armed.take().expect("deadline timer armed");
                    ctrl.on_timer(token)
                }
            },
            None => {
                let token = armed.take().expect("a timer should be armed");
                ctrl.on_timer(token)
            }
        };
        queue.extend(effects);
    }
}

pub fn balances_shown(transcript: &[Effect]) -> Vec<i64> {
    transcript
        .iter()
        .filter_map(|e| match e {
            Effect::ShowBalance(v) => Some(*v),
            _ => None,
        })
        .collect()
}

pub fn feedback_messages(transcript: &[Effect]) -> Vec<String> {
    transcript
        .iter()
        .filter_map(|e| match e {
            Effect::ShowFeedback(m) => Some(m.clone()),
            _ => None,
        })
        .collect()
}

pub fn stimuli(transcript: &[Effect]) -> Vec<String> {
    transcript
        .iter()
        .filter_map(|e| match e {
            Effect::ShowStimulus(w) => Some(w.clone()),
            _ => None,
        })
        .collect()
}
