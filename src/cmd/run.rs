use crate::reports;
use clap::Args;
use lexitrial::config::{KeyBindings, SessionParams, WordsConfig};
use lexitrial::controller::StageController;
use lexitrial::error::{ExpResult, ExperimentError};
use lexitrial::export::{CsvExporter, Exporter};
use lexitrial::present::Presenter;
use lexitrial::runner::{Effect, TimerToken};
use lexitrial::stage::Stage;
use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info};

/// Warm-up words shown before the practice block, advanced by any
/// recognized response key.
const WARMUP_WORDS: &[&str] = &["民提", "橘子", "歌曲"];

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub params: SessionParams,

    #[command(flatten)]
    pub keys: KeyBindings,

    #[arg(long)]
    pub participant: Option<String>,

    #[arg(long)]
    pub group: Option<String>,

    /// Seed for the stimulus shuffle; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "results")]
    pub out_dir: String,
}

struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn show_blank(&mut self) {
        println!();
    }

    fn show_stimulus(&mut self, word: &str) {
        println!("\n        {}\n", word);
    }

    fn show_feedback(&mut self, message: &str) {
        println!("\n{}\n", message);
    }

    fn show_balance(&mut self, amount: i64) {
        println!("[balance: ${}]", amount);
    }

    fn clear_balance(&mut self) {
        println!();
    }
}

/// Terminal input arrives line-buffered: a bare Enter reads as a Return
/// keypress, a lone space as the space bar, anything else as the trimmed
/// lowercase key name.
fn normalize_key(line: &str) -> String {
    if line.is_empty() {
        "return".to_string()
    } else if line.trim().is_empty() {
        "space".to_string()
    } else {
        line.trim().to_lowercase()
    }
}

fn spawn_input_thread() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(normalize_key(&line)).is_err() {
                break;
            }
        }
    });
    rx
}

fn recv_key(rx: &Receiver<String>) -> ExpResult<String> {
    rx.recv()
        .map_err(|_| ExperimentError::Validation("Input stream closed".to_string()))
}

fn prompt(rx: &Receiver<String>, label: &str) -> ExpResult<String> {
    loop {
        println!("{}", label);
        let value = recv_key(rx)?;
        if value != "return" && !value.is_empty() {
            return Ok(value);
        }
        println!("A value is required.");
    }
}

fn instructions(stage: Stage, keys: &KeyBindings, params: &SessionParams) -> String {
    let base = format!(
        "Press '{}' for real words and '{}' for non-words.\n\
         When the word is a designated target, press '{}' instead.",
        keys.true_key, keys.false_key, keys.target_key
    );
    let delta = params.feedback_delta;
    match stage {
        Stage::Practice => format!("== Practice ==\n{}", base),
        Stage::Formal => format!("== Formal block ==\n{}", base),
        Stage::Reward => format!(
            "== Reward block ==\n{}\n\nEach correctly identified target wins you ${}.\n\
             Your balance is shown as it accumulates.",
            base, delta
        ),
        Stage::Penalty => format!(
            "== Penalty block ==\n{}\n\nEach missed target costs you ${}.\n\
             Your balance is shown as it accumulates.",
            base, delta
        ),
        Stage::RewardPenalty => format!(
            "== Reward/penalty block ==\n{}\n\nCorrectly identified targets win you ${}; \
             missed targets cost you ${}.\nYour balance is shown as it accumulates.",
            base, delta, delta
        ),
    }
}

/// Instruction screen gated on Enter, practice warm-up, then the
/// any-key-to-begin screen.
fn stage_intro(
    stage: Stage,
    rx: &Receiver<String>,
    keys: &KeyBindings,
    params: &SessionParams,
) -> ExpResult<()> {
    println!("\n{}\n", instructions(stage, keys, params));
    println!("Press Enter to continue.");
    loop {
        if recv_key(rx)? == "return" {
            break;
        }
    }

    if stage == Stage::Practice {
        println!("\nWarm-up: respond to each word with any response key.\n");
        for word in WARMUP_WORDS {
            println!("\n        {}\n", word);
            loop {
                let key = recv_key(rx)?;
                if keys.resolve(&key).is_some() {
                    break;
                }
                debug!(key = %key, "warm-up key ignored");
            }
        }
    }

    println!("\nPress any key to begin.");
    recv_key(rx)?;
    Ok(())
}

pub fn run(args: RunArgs, words: WordsConfig) -> ExpResult<()> {
    let rx = spawn_input_thread();
    let mut presenter = ConsolePresenter;

    let participant = match args.participant {
        Some(p) => p,
        None => prompt(&rx, "Participant name:")?,
    };
    let group = match args.group {
        Some(g) => g,
        None => prompt(&rx, "Group:")?,
    };

    let rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut controller =
        StageController::new(words, args.params.clone(), args.keys.clone(), rng)?;

    info!("🧪 Session start: participant '{}', group '{}'", participant, group);

    let mut queue: VecDeque<Effect> = controller.bootstrap().into();
    let mut deadline: Option<(TimerToken, Instant)> = None;

    loop {
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ShowBlank => presenter.show_blank(),
                Effect::ShowStimulus(word) => presenter.show_stimulus(&word),
                Effect::ShowFeedback(message) => presenter.show_feedback(&message),
                Effect::ShowBalance(amount) => presenter.show_balance(amount),
                Effect::ClearBalance => presenter.clear_balance(),
                Effect::StartTimer(token, duration) => {
                    deadline = Some((token, Instant::now() + duration));
                }
                Effect::AwaitStage(stage) => {
                    deadline = None;
                    stage_intro(stage, &rx, &args.keys, &args.params)?;
                    let started = controller.start_pending()?;
                    queue.extend(started);
                }
                Effect::ExperimentComplete => {
                    return finish(&controller, &rx, &participant, &group, &args.out_dir);
                }
                // Internal marker; the controller never surfaces it.
                Effect::StageComplete => {}
            }
        }

        let effects = match deadline {
            Some((token, when)) => {
                let wait = when.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(key) => controller.on_key(&key, Instant::now()),
                    Err(RecvTimeoutError::Timeout) => {
                        deadline = None;
                        controller.on_timer(token)
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(ExperimentError::Validation(
                            "Input stream closed mid-session".to_string(),
                        ));
                    }
                }
            }
            None => controller.on_key(&recv_key(&rx)?, Instant::now()),
        };
        queue.extend(effects);
    }
}

fn finish(
    controller: &StageController,
    rx: &Receiver<String>,
    participant: &str,
    group: &str,
    out_dir: &str,
) -> ExpResult<()> {
    reports::print_session_report(controller.summary());

    let exporter = CsvExporter::new(out_dir);
    loop {
        match exporter.export(controller.summary(), participant, group) {
            Ok(path) => {
                println!("\nResults written to {}", path.display());
                break;
            }
            Err(e) => {
                // The summary stays in memory; offer a retry.
                error!("Export failed: {}", e);
                println!("Export failed ({}). Retry? [y/n]", e);
                let answer = recv_key(rx)?;
                if answer != "y" {
                    return Err(e);
                }
            }
        }
    }

    println!("\nThank you for participating. The session is complete.");
    Ok(())
}
