use crate::error::{ExpResult, ExperimentError};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The five experimental stages, in canonical (export) order.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Practice,
    Formal,
    Reward,
    Penalty,
    RewardPenalty,
}

impl Stage {
    /// Short column prefix used in the exported summary.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Practice => "prac",
            Self::Formal => "nofb",
            Self::Reward => "rfb",
            Self::Penalty => "pfb",
            Self::RewardPenalty => "rpfb",
        }
    }

    pub fn policy(&self) -> FeedbackPolicy {
        match self {
            Self::Practice | Self::Formal => FeedbackPolicy::None,
            Self::Reward => FeedbackPolicy::RewardOnly,
            Self::Penalty => FeedbackPolicy::PenaltyOnly,
            Self::RewardPenalty => FeedbackPolicy::Both,
        }
    }

    /// Position in canonical order. Used as a stable index into per-stage
    /// summary storage.
    pub fn index(&self) -> usize {
        match self {
            Self::Practice => 0,
            Self::Formal => 1,
            Self::Reward => 2,
            Self::Penalty => 3,
            Self::RewardPenalty => 4,
        }
    }
}

/// How target-item outcomes affect the monetary balance in a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPolicy {
    None,
    RewardOnly,
    PenaltyOnly,
    Both,
}

impl FeedbackPolicy {
    pub fn rewards(&self) -> bool {
        matches!(self, Self::RewardOnly | Self::Both)
    }

    pub fn penalizes(&self) -> bool {
        matches!(self, Self::PenaltyOnly | Self::Both)
    }

    /// True when the stage maintains a visible balance at all.
    pub fn bears_feedback(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Parses the post-practice stage order from a comma-separated list.
/// Practice is always first and is not part of the configurable order; the
/// other four stages must each appear exactly once.
pub fn parse_stage_order(spec: &str) -> ExpResult<Vec<Stage>> {
    let mut order = Vec::new();
    for part in spec.split(',') {
        let name = part.trim();
        let stage = Stage::from_str(name).map_err(|_| {
            ExperimentError::Config(format!("Unknown stage '{}' in stage order", name))
        })?;
        if stage == Stage::Practice {
            return Err(ExperimentError::Config(
                "Practice always runs first and cannot appear in the stage order".to_string(),
            ));
        }
        if order.contains(&stage) {
            return Err(ExperimentError::Config(format!(
                "Stage '{}' listed more than once in stage order",
                stage
            )));
        }
        order.push(stage);
    }

    let missing: Vec<String> = Stage::iter()
        .filter(|s| *s != Stage::Practice && !order.contains(s))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ExperimentError::Config(format!(
            "Stage order is missing: {}",
            missing.join(", ")
        )));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_stable() {
        let prefixes: Vec<&str> = Stage::iter().map(|s| s.prefix()).collect();
        assert_eq!(prefixes, vec!["prac", "nofb", "rfb", "pfb", "rpfb"]);
    }

    #[test]
    fn order_parses_and_rejects_practice() {
        let order = parse_stage_order("penalty,reward,reward_penalty,formal").unwrap();
        assert_eq!(
            order,
            vec![Stage::Penalty, Stage::Reward, Stage::RewardPenalty, Stage::Formal]
        );
        assert!(parse_stage_order("practice,formal,reward,penalty").is_err());
        assert!(parse_stage_order("formal,reward,penalty").is_err());
        assert!(parse_stage_order("formal,formal,reward,penalty").is_err());
    }
}
