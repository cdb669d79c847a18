use crate::reports::{self, ConfigAuditRow};
use clap::Args;
use lexitrial::config::WordsConfig;
use lexitrial::error::{ExpResult, ExperimentError};
use lexitrial::sequence::build_sequence;
use lexitrial::stage::Stage;
use strum::IntoEnumIterator;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Only audit stages whose name contains this filter.
    #[arg(short, long)]
    pub stage: Option<String>,
}

pub fn run(args: ValidateArgs, words: &WordsConfig) -> ExpResult<()> {
    println!("\n🔎 === WORDS CONFIG AUDIT === 🔎");

    let mut rows = Vec::new();
    let mut failures = 0usize;

    for stage in Stage::iter() {
        let name = stage.to_string();
        if let Some(ref filter) = args.stage {
            if !name.contains(&filter.to_lowercase()) {
                continue;
            }
        }

        let set = words.stage_words(stage)?;
        let pinned = set.targets.values().filter(|p| p.is_some()).count();

        // A dry build with a fixed seed surfaces position errors without
        // running anything.
        let status = match build_sequence(set, &mut fastrand::Rng::with_seed(0)) {
            Ok(_) => "ok".to_string(),
            Err(e) => {
                failures += 1;
                e.to_string()
            }
        };

        rows.push(ConfigAuditRow {
            stage: name,
            true_words: set.true_words.len(),
            false_words: set.false_words.len(),
            targets: set.targets.len(),
            pinned,
            total: set.total(),
            status,
        });
    }

    reports::print_config_audit(&rows);

    if failures > 0 {
        return Err(ExperimentError::Validation(format!(
            "{} stage(s) failed the audit",
            failures
        )));
    }
    Ok(())
}
