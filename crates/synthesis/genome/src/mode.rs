use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Evolutionary strategy a genome was bred under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Competitive selection: survival of the fittest.
    Darwin,
    /// Cooperative selection: knowledge sharing through the commons.
    Kropotkin,
}

impl Mode {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Mode::Darwin
        } else {
            Mode::Kropotkin
        }
    }

    pub fn other(self) -> Self {
        match self {
            Mode::Darwin => Mode::Kropotkin,
            Mode::Kropotkin => Mode::Darwin,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Darwin => write!(f, "darwin"),
            Mode::Kropotkin => write!(f, "kropotkin"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mode: {0} (expected darwin or kropotkin)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "darwin" => Ok(Mode::Darwin),
            "kropotkin" => Ok(Mode::Kropotkin),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serde() {
        let json = serde_json::to_string(&Mode::Kropotkin).unwrap();
        assert_eq!(json, "\"kropotkin\"");
        let back: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mode::Kropotkin);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Darwin".parse::<Mode>().unwrap(), Mode::Darwin);
        assert!("lamarck".parse::<Mode>().is_err());
    }

    #[test]
    fn other_flips() {
        assert_eq!(Mode::Darwin.other(), Mode::Kropotkin);
        assert_eq!(Mode::Kropotkin.other(), Mode::Darwin);
    }
}
