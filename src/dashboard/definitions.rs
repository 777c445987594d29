//! Fixed descriptions of what each condition means.

use crate::algorithm::condition::Condition;

/// Title and bullet points describing one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionDefinition {
    pub condition: Condition,
    pub title: &'static str,
    pub points: [&'static str; 3],
}

const DEFINITIONS: [ConditionDefinition; 3] = [
    ConditionDefinition {
        condition: Condition::Good,
        title: "Good",
        points: [
            "Normal vibration levels",
            "No detectable faults",
            "Safe for railway operation",
        ],
    },
    ConditionDefinition {
        condition: Condition::Ok,
        title: "OK",
        points: [
            "Minor misalignment detected",
            "Requires monitoring",
            "Maintenance recommended",
        ],
    },
    ConditionDefinition {
        condition: Condition::Danger,
        title: "Dangerous",
        points: [
            "Bearing or unbalance faults detected",
            "High vibration severity",
            "Immediate inspection required",
        ],
    },
];

/// Definitions in Good, OK, Danger order
#[must_use]
pub const fn condition_definitions() -> &'static [ConditionDefinition] {
    &DEFINITIONS
}

/// Definition of a single condition
#[must_use]
pub fn definition_of(condition: Condition) -> &'static ConditionDefinition {
    &DEFINITIONS[usize::from(condition.severity()) - 1]
}
