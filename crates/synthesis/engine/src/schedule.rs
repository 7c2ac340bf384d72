use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use synthesis_genome::Mode;

/// Decides which selection regime runs a given generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSchedule {
    /// Always the same regime.
    Fixed(Mode),
    /// Darwin on even generations, Kropotkin on odd ones.
    Alternate,
    /// Cooperate when population diversity drops below the threshold,
    /// compete otherwise.
    Adaptive { threshold: usize },
}

impl ModeSchedule {
    /// Diversity below which the adaptive schedule switches to cooperation.
    pub const DEFAULT_DIVERSITY_THRESHOLD: usize = 5;

    pub fn adaptive() -> Self {
        Self::Adaptive {
            threshold: Self::DEFAULT_DIVERSITY_THRESHOLD,
        }
    }

    /// Pick the mode for the upcoming generation.
    pub fn pick(&self, generation: u64, diversity: usize) -> Mode {
        match self {
            ModeSchedule::Fixed(mode) => *mode,
            ModeSchedule::Alternate => {
                if generation % 2 == 0 {
                    Mode::Darwin
                } else {
                    Mode::Kropotkin
                }
            }
            ModeSchedule::Adaptive { threshold } => {
                if diversity < *threshold {
                    Mode::Kropotkin
                } else {
                    Mode::Darwin
                }
            }
        }
    }
}

impl Default for ModeSchedule {
    fn default() -> Self {
        Self::adaptive()
    }
}

impl fmt::Display for ModeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeSchedule::Fixed(mode) => write!(f, "{}", mode),
            ModeSchedule::Alternate => write!(f, "alternate"),
            ModeSchedule::Adaptive { threshold } => write!(f, "auto(<{})", threshold),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown schedule: {0} (expected auto, alternate, darwin or kropotkin)")]
pub struct ParseScheduleError(String);

impl FromStr for ModeSchedule {
    type Err = ParseScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "adaptive" => Ok(Self::adaptive()),
            "alternate" => Ok(Self::Alternate),
            other => other
                .parse::<Mode>()
                .map(ModeSchedule::Fixed)
                .map_err(|_| ParseScheduleError(other.to_string())),
        }
    }
}
