use crate::classify::{classify, FeedbackKind, ResponseKey};
use crate::config::{KeyBindings, SessionParams};
use crate::sequence::Trial;
use crate::session::{StageSession, TrialRecord};
use crate::stage::Stage;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Identifies one scheduled timer. Tokens are handed out monotonically and
/// only the most recently armed one is live; a timer event carrying any
/// older token fired after its state was superseded and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Side effects requested from the driver. The runner (and the controller
/// above it) never renders or sleeps itself; transitions return the effects
/// to perform, which keeps every state change testable without a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowBlank,
    ShowStimulus(String),
    ShowFeedback(String),
    ShowBalance(i64),
    ClearBalance,
    StartTimer(TimerToken, Duration),
    /// Emitted by the runner when its sequence is exhausted; consumed by the
    /// stage controller, never surfaced to the driver.
    StageComplete,
    /// The named stage is ready: the driver shows its instructions and calls
    /// `StageController::start_pending` when the participant is ready.
    AwaitStage(Stage),
    ExperimentComplete,
}

#[derive(Debug)]
enum RunnerState {
    /// Blank interval before the next stimulus; no input accepted.
    Blank,
    /// The response window: blocked on the earlier of a recognized key or
    /// the deadline timer.
    Awaiting { trial: Trial, presented_at: Instant },
    /// Non-interruptible reward/penalty display.
    Feedback,
    Complete,
}

/// Per-trial state machine for one stage attempt:
/// Blank -> Awaiting -> resolve -> (Feedback)? -> Blank | Complete.
pub struct TrialRunner {
    stage: Stage,
    params: SessionParams,
    bindings: KeyBindings,
    sequence: VecDeque<Trial>,
    state: RunnerState,
    pending_timer: Option<TimerToken>,
    next_token: u64,
    session: StageSession,
}

impl TrialRunner {
    pub fn new(
        stage: Stage,
        sequence: Vec<Trial>,
        session: StageSession,
        params: SessionParams,
        bindings: KeyBindings,
    ) -> Self {
        Self {
            stage,
            params,
            bindings,
            sequence: sequence.into(),
            state: RunnerState::Blank,
            pending_timer: None,
            next_token: 0,
            session,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session(&self) -> &StageSession {
        &self.session
    }

    pub fn into_session(self) -> StageSession {
        self.session
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, RunnerState::Complete)
    }

    /// Presentation instant of the current stimulus, if a response window is
    /// open.
    pub fn presented_at(&self) -> Option<Instant> {
        match &self.state {
            RunnerState::Awaiting { presented_at, .. } => Some(*presented_at),
            _ => None,
        }
    }

    /// Starts the stage: balance display for feedback-bearing stages, then
    /// the first blank interval.
    pub fn begin(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.stage.policy().bears_feedback() {
            effects.push(Effect::ShowBalance(self.session.ledger.balance()));
        }
        self.enter_blank(&mut effects);
        effects
    }

    /// A timer fired. Stale tokens are dropped; the live token drives the
    /// blank -> present, deadline -> timeout, and feedback -> blank edges.
    pub fn on_timer(&mut self, token: TimerToken) -> Vec<Effect> {
        if self.pending_timer != Some(token) {
            debug!(stage = %self.stage, ?token, "stale timer ignored");
            return Vec::new();
        }
        self.pending_timer = None;

        match std::mem::replace(&mut self.state, RunnerState::Blank) {
            RunnerState::Blank => self.present_next(),
            RunnerState::Awaiting { trial, .. } => {
                debug!(stage = %self.stage, word = %trial.word, "response deadline elapsed");
                self.resolve(trial, None, self.params.deadline_ms)
            }
            RunnerState::Feedback => {
                let mut effects = vec![Effect::ShowBalance(self.session.ledger.balance())];
                self.enter_blank(&mut effects);
                effects
            }
            RunnerState::Complete => {
                self.state = RunnerState::Complete;
                Vec::new()
            }
        }
    }

    /// A raw key arrived. Keys are ignored unless a response window is open,
    /// and unrecognized keys leave the window open without any state change.
    pub fn on_key(&mut self, raw: &str, now: Instant) -> Vec<Effect> {
        if !matches!(self.state, RunnerState::Awaiting { .. }) {
            debug!(stage = %self.stage, key = raw, "key outside response window ignored");
            return Vec::new();
        }
        let Some(response) = self.bindings.resolve(raw) else {
            debug!(stage = %self.stage, key = raw, "unrecognized key ignored");
            return Vec::new();
        };

        let RunnerState::Awaiting { trial, presented_at } =
            std::mem::replace(&mut self.state, RunnerState::Blank)
        else {
            return Vec::new();
        };
        // The response supersedes the deadline timer.
        self.pending_timer = None;

        let reaction_ms = now.saturating_duration_since(presented_at).as_millis() as u64;
        self.resolve(trial, Some(response), reaction_ms)
    }

    fn arm_timer(&mut self, duration: Duration, effects: &mut Vec<Effect>) {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.pending_timer = Some(token);
        effects.push(Effect::StartTimer(token, duration));
    }

    fn enter_blank(&mut self, effects: &mut Vec<Effect>) {
        self.state = RunnerState::Blank;
        effects.push(Effect::ShowBlank);
        self.arm_timer(Duration::from_millis(self.params.blank_ms), effects);
    }

    fn present_next(&mut self) -> Vec<Effect> {
        match self.sequence.pop_front() {
            Some(trial) => {
                let mut effects = vec![Effect::ShowStimulus(trial.word.clone())];
                self.arm_timer(Duration::from_millis(self.params.deadline_ms), &mut effects);
                self.state = RunnerState::Awaiting {
                    trial,
                    presented_at: Instant::now(),
                };
                effects
            }
            None => {
                self.state = RunnerState::Complete;
                vec![Effect::StageComplete]
            }
        }
    }

    fn resolve(
        &mut self,
        trial: Trial,
        response: Option<ResponseKey>,
        reaction_ms: u64,
    ) -> Vec<Effect> {
        let policy = self.stage.policy();
        let outcome = classify(trial.category, response, policy);

        let label = match response {
            Some(key) => self.bindings.label(key).to_string(),
            None => String::new(),
        };
        self.session.records.push(TrialRecord {
            word: trial.word,
            response: label,
            reaction_time_ms: reaction_ms,
            expected: trial.category,
        });
        self.session.tracker.record(trial.category, outcome.correct);

        match outcome.feedback {
            Some(FeedbackKind::Reward) => {
                let balance = self.session.ledger.reward();
                let message = format!(
                    "You won ${}\nCurrent balance: ${}",
                    self.session.ledger.delta(),
                    balance
                );
                self.state = RunnerState::Feedback;
                let mut effects = vec![Effect::ShowFeedback(message)];
                self.arm_timer(Duration::from_millis(self.params.feedback_ms), &mut effects);
                effects
            }
            Some(FeedbackKind::Penalty) => {
                let balance = self.session.ledger.penalize();
                let message = format!(
                    "You lost ${}\nCurrent balance: ${}",
                    self.session.ledger.delta(),
                    balance
                );
                self.state = RunnerState::Feedback;
                let mut effects = vec![Effect::ShowFeedback(message)];
                self.arm_timer(Duration::from_millis(self.params.feedback_ms), &mut effects);
                effects
            }
            None => {
                if policy.bears_feedback() {
                    self.session.ledger.snapshot();
                }
                let mut effects = Vec::new();
                self.enter_blank(&mut effects);
                effects
            }
        }
    }
}
