use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::consts::{DOMINANT_THRESHOLD, HIGH_THRESHOLD, LOW_THRESHOLD, MEDIUM_THRESHOLD};

///
/// Categorical grade of an amino acid at a motif position.
///
/// Variants are declared from weakest to strongest so that the derived
/// ordering follows the percentage scale.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
    VeryLow,
    Low,
    Medium,
    High,
    Dominant,
}

impl Grade {
    ///
    /// Grade a percentage. Breakpoints are exclusive lower bounds, so a value
    /// sitting exactly on a breakpoint falls into the lower grade.
    ///
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > DOMINANT_THRESHOLD {
            Grade::Dominant
        } else if percentage > HIGH_THRESHOLD {
            Grade::High
        } else if percentage > MEDIUM_THRESHOLD {
            Grade::Medium
        } else if percentage > LOW_THRESHOLD {
            Grade::Low
        } else {
            Grade::VeryLow
        }
    }

    /// Grades kept in simplified motifs.
    pub fn is_prominent(&self) -> bool {
        matches!(self, Grade::Dominant | Grade::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Dominant => "dominant",
            Grade::High => "high",
            Grade::Medium => "medium",
            Grade::Low => "low",
            Grade::VeryLow => "very-low",
        }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
