use crate::config::{KeyBindings, SessionParams, WordsConfig};
use crate::error::{ExpResult, ExperimentError};
use crate::export::session_timestamp;
use crate::runner::{Effect, TimerToken, TrialRunner};
use crate::sequence::build_sequence;
use crate::session::StageSession;
use crate::stage::Stage;
use crate::summary::SummaryBook;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the driver to show instructions and start the stage.
    AwaitingStart(Stage),
    Running(Stage),
    Done,
}

/// Orchestrates the stage lifecycle: practice first with an accuracy-gated
/// retry loop, then the configured order of the remaining stages, folding
/// each attempt into the summary and signalling export at the end.
pub struct StageController {
    words: WordsConfig,
    params: SessionParams,
    bindings: KeyBindings,
    order: Vec<Stage>,
    order_index: usize,
    phase: Phase,
    runner: Option<TrialRunner>,
    summary: SummaryBook,
    rng: fastrand::Rng,
}

impl StageController {
    pub fn new(
        words: WordsConfig,
        params: SessionParams,
        bindings: KeyBindings,
        rng: fastrand::Rng,
    ) -> ExpResult<Self> {
        words.validate()?;
        bindings.validate()?;
        let order = params.parse_stage_order()?;
        Ok(Self {
            words,
            params,
            bindings,
            order,
            order_index: 0,
            phase: Phase::AwaitingStart(Stage::Practice),
            runner: None,
            summary: SummaryBook::new(session_timestamp()),
            rng,
        })
    }

    /// The first effect of the session: practice instructions.
    pub fn bootstrap(&self) -> Vec<Effect> {
        vec![Effect::AwaitStage(Stage::Practice)]
    }

    pub fn pending_stage(&self) -> Option<Stage> {
        match self.phase {
            Phase::AwaitingStart(stage) => Some(stage),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn summary(&self) -> &SummaryBook {
        &self.summary
    }

    /// Starts the pending stage: fresh session (counters reset, balance
    /// re-seeded), fresh sequence, new runner.
    pub fn start_pending(&mut self) -> ExpResult<Vec<Effect>> {
        let Phase::AwaitingStart(stage) = self.phase else {
            return Err(ExperimentError::Validation(
                "No stage is pending start".to_string(),
            ));
        };
        info!("▶️  Starting stage '{}'", stage);
        let word_set = self.words.stage_words(stage)?;
        let sequence = build_sequence(word_set, &mut self.rng)?;
        let session = StageSession::new(stage, &self.params);
        let mut runner = TrialRunner::new(
            stage,
            sequence,
            session,
            self.params.clone(),
            self.bindings.clone(),
        );
        let effects = runner.begin();
        self.runner = Some(runner);
        self.phase = Phase::Running(stage);
        Ok(effects)
    }

    pub fn on_key(&mut self, raw: &str, now: Instant) -> Vec<Effect> {
        let Some(runner) = self.runner.as_mut() else {
            debug!(key = raw, "key outside a running stage ignored");
            return Vec::new();
        };
        let effects = runner.on_key(raw, now);
        self.intercept_completion(effects)
    }

    pub fn on_timer(&mut self, token: TimerToken) -> Vec<Effect> {
        let Some(runner) = self.runner.as_mut() else {
            return Vec::new();
        };
        let effects = runner.on_timer(token);
        self.intercept_completion(effects)
    }

    /// Replaces the runner's internal `StageComplete` marker with the
    /// controller-level stage-end effects.
    fn intercept_completion(&mut self, mut effects: Vec<Effect>) -> Vec<Effect> {
        if effects.contains(&Effect::StageComplete) {
            effects.retain(|e| *e != Effect::StageComplete);
            effects.extend(self.finish_stage());
        }
        effects
    }

    fn finish_stage(&mut self) -> Vec<Effect> {
        let Some(runner) = self.runner.take() else {
            return Vec::new();
        };
        let stage = runner.stage();
        let session = runner.into_session();

        // Every attempt folds, practice retries included.
        self.summary.fold_stage(
            stage,
            &session.records,
            &session.tracker,
            session.ledger.log(),
        );

        let mut effects = Vec::new();
        if stage.policy().bears_feedback() {
            effects.push(Effect::ClearBalance);
        }

        if stage == Stage::Practice {
            let threshold = self.params.accuracy_threshold;
            let true_acc = session.tracker.true_word_accuracy();
            let false_acc = session.tracker.false_word_accuracy();
            if true_acc < threshold || false_acc < threshold {
                info!(
                    "🔁 Practice below threshold (true {:.0}%, false {:.0}%); restarting",
                    true_acc * 100.0,
                    false_acc * 100.0
                );
                self.phase = Phase::AwaitingStart(Stage::Practice);
                effects.push(Effect::AwaitStage(Stage::Practice));
                return effects;
            }
            info!(
                "✅ Practice passed (true {:.0}%, false {:.0}%)",
                true_acc * 100.0,
                false_acc * 100.0
            );
        }

        match self.next_stage(stage) {
            Some(next) => {
                self.phase = Phase::AwaitingStart(next);
                effects.push(Effect::AwaitStage(next));
            }
            None => {
                info!("🏁 All stages complete");
                self.phase = Phase::Done;
                effects.push(Effect::ExperimentComplete);
            }
        }
        effects
    }

    fn next_stage(&mut self, finished: Stage) -> Option<Stage> {
        if finished == Stage::Practice {
            self.order_index = 0;
        } else {
            self.order_index += 1;
        }
        self.order.get(self.order_index).copied()
    }
}
