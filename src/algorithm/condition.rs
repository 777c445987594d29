//! Track condition categories derived from predicted fault labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label the classifier emits for healthy track
pub const NORMAL_LABEL: &str = "normal_like";
/// Label the classifier emits for misaligned track
pub const MISALIGNMENT_LABEL: &str = "misalignment_like";

/// Dashboard-facing condition of a track segment
///
/// Ordering follows severity: `Good < Ok < Danger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    /// Normal vibration levels, safe for operation
    Good = 1,
    /// Minor misalignment, requires monitoring
    #[serde(rename = "OK")]
    Ok = 2,
    /// Bearing or unbalance faults, immediate inspection required
    Danger = 3,
}

impl Condition {
    /// All conditions in ascending severity
    pub const ALL: [Self; 3] = [Self::Good, Self::Ok, Self::Danger];

    /// Map a predicted label to its condition
    ///
    /// Any label other than the normal and misalignment labels, including
    /// empty or never-seen labels, is `Danger`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            NORMAL_LABEL => Self::Good,
            MISALIGNMENT_LABEL => Self::Ok,
            _ => Self::Danger,
        }
    }

    /// Severity rank: Danger 3, OK 2, Good 1
    #[must_use]
    pub const fn severity(self) -> u8 {
        self as u8
    }

    /// Name shown on the dashboard and stored in the `Condition` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Ok => "OK",
            Self::Danger => "Danger",
        }
    }

    /// Chart color of the condition
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Ok => "orange",
            Self::Danger => "red",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a condition name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown condition '{0}'")]
pub struct ParseConditionError(pub String);

impl FromStr for Condition {
    type Err = ParseConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseConditionError(s.to_string()))
    }
}

/// Map a predicted label to its condition
#[must_use]
pub fn map_condition(label: &str) -> Condition {
    Condition::from_label(label)
}
