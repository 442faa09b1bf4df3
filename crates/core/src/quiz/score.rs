use serde::{Deserialize, Serialize};
use std::fmt;

/// Final tally of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    #[must_use]
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// Percentage of correct answers, rounded half away from zero to two
    /// decimals. A quiz with no questions scores `0.0`.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let raw = f64::from(self.correct) / f64::from(self.total) * 100.0;
        (raw * 100.0).round() / 100.0
    }

    /// Percentage formatted for speech with trailing zeros dropped:
    /// `66.67`, `50`, `100`.
    #[must_use]
    pub fn percentage_text(&self) -> String {
        let text = format!("{:.2}", self.percentage());
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.correct, self.total, self.percentage_text())
    }
}
