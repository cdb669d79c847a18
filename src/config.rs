use crate::classify::ResponseKey;
use crate::error::{ExpResult, ExperimentError};
use crate::stage::Stage;
use clap::Args;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::info;

/// Word sets for one stage. Role names are explicit in the JSON file; a
/// configuration that does not name its roles is rejected during parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageWordSet {
    #[serde(default)]
    pub true_words: Vec<String>,
    #[serde(default)]
    pub false_words: Vec<String>,
    /// Target word -> optional 1-based fixed position in the trial sequence.
    /// `null` leaves the target unconstrained.
    #[serde(default)]
    pub targets: BTreeMap<String, Option<usize>>,
}

impl StageWordSet {
    pub fn total(&self) -> usize {
        self.true_words.len() + self.false_words.len() + self.targets.len()
    }

    /// Every stimulus must belong to exactly one category.
    fn validate(&self, stage: &str) -> ExpResult<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        let all = self
            .true_words
            .iter()
            .chain(self.false_words.iter())
            .map(String::as_str)
            .chain(self.targets.keys().map(String::as_str));
        for word in all {
            if !seen.insert(word) {
                return Err(ExperimentError::Validation(format!(
                    "Stage '{}': word '{}' appears in more than one category",
                    stage, word
                )));
            }
        }
        Ok(())
    }
}

/// The full words configuration: one `StageWordSet` per stage, keyed by the
/// stage name. All five stages are required.
#[derive(Debug, Clone, Deserialize)]
pub struct WordsConfig {
    pub stages: HashMap<String, StageWordSet>,
}

impl WordsConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ExpResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: WordsConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(
            "📚 Loaded word sets for {} stages from '{}'",
            config.stages.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> ExpResult<()> {
        let missing: Vec<String> = Stage::iter()
            .map(|s| s.to_string())
            .filter(|name| !self.stages.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(ExperimentError::Config(format!(
                "Missing word sets for stage(s): {}",
                missing.join(", ")
            )));
        }
        for (name, set) in &self.stages {
            set.validate(name)?;
        }
        Ok(())
    }

    pub fn stage_words(&self, stage: Stage) -> ExpResult<&StageWordSet> {
        self.stages.get(&stage.to_string()).ok_or_else(|| {
            ExperimentError::Config(format!("Missing word sets for stage(s): {}", stage))
        })
    }
}

/// Tunable session parameters. Defaults follow the experimental protocol:
/// 500 ms blank, 3000 ms response deadline, 1500 ms feedback display, a
/// starting balance of 200 and a 10-dollar delta per target outcome.
#[derive(Args, Debug, Clone)]
pub struct SessionParams {
    #[arg(long, default_value_t = 0.8)]
    pub accuracy_threshold: f64,
    #[arg(long, default_value_t = 500)]
    pub blank_ms: u64,
    #[arg(long, default_value_t = 3000)]
    pub deadline_ms: u64,
    #[arg(long, default_value_t = 1500)]
    pub feedback_ms: u64,
    #[arg(long, default_value_t = 200)]
    pub starting_balance: i64,
    #[arg(long, default_value_t = 10)]
    pub feedback_delta: i64,
    #[arg(long, default_value = "formal,reward,penalty,reward_penalty")]
    pub stage_order: String,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            accuracy_threshold: 0.8,
            blank_ms: 500,
            deadline_ms: 3000,
            feedback_ms: 1500,
            starting_balance: 200,
            feedback_delta: 10,
            stage_order: "formal,reward,penalty,reward_penalty".to_string(),
        }
    }
}

impl SessionParams {
    pub fn parse_stage_order(&self) -> ExpResult<Vec<Stage>> {
        crate::stage::parse_stage_order(&self.stage_order)
    }
}

/// Mapping from raw key names to the three logical response classes.
/// Anything that resolves to `None` is not a response at all.
#[derive(Args, Debug, Clone)]
pub struct KeyBindings {
    #[arg(long, default_value = "a")]
    pub true_key: String,
    #[arg(long, default_value = "l")]
    pub false_key: String,
    #[arg(long, default_value = "space")]
    pub target_key: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            true_key: "a".to_string(),
            false_key: "l".to_string(),
            target_key: "space".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn resolve(&self, raw: &str) -> Option<ResponseKey> {
        let raw = raw.to_lowercase();
        if raw == self.true_key.to_lowercase() {
            Some(ResponseKey::TrueWord)
        } else if raw == self.false_key.to_lowercase() {
            Some(ResponseKey::FalseWord)
        } else if raw == self.target_key.to_lowercase() {
            Some(ResponseKey::Target)
        } else {
            None
        }
    }

    pub fn label(&self, key: ResponseKey) -> &str {
        match key {
            ResponseKey::TrueWord => &self.true_key,
            ResponseKey::FalseWord => &self.false_key,
            ResponseKey::Target => &self.target_key,
        }
    }

    pub fn validate(&self) -> ExpResult<()> {
        for key in [&self.true_key, &self.false_key, &self.target_key] {
            if key.trim().is_empty() {
                return Err(ExperimentError::Config(
                    "Key bindings must not be empty".to_string(),
                ));
            }
        }
        let distinct: HashSet<String> = [&self.true_key, &self.false_key, &self.target_key]
            .iter()
            .map(|k| k.to_lowercase())
            .collect();
        if distinct.len() != 3 {
            return Err(ExperimentError::Config(format!(
                "Key bindings must be distinct (got '{}', '{}', '{}')",
                self.true_key, self.false_key, self.target_key
            )));
        }
        Ok(())
    }
}
