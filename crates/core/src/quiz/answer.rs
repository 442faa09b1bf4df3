use std::fmt;
use std::str::FromStr;

use crate::model::OPTION_COUNT;
use crate::quiz::QuizError;

/// A user's answer, normalized to a zero-based option index.
///
/// Users speak the 1-based option number ("two"), which the platform hands
/// over as the string slot value `"2"`. The slot is trimmed and parsed as an
/// integer in `1..=4`; anything else is rejected instead of being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerChoice(usize);

impl AnswerChoice {
    /// Build from a zero-based option index.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidAnswer` if `index` is not a valid option.
    pub fn from_index(index: usize) -> Result<Self, QuizError> {
        if index < OPTION_COUNT {
            Ok(Self(index))
        } else {
            Err(QuizError::InvalidAnswer((index + 1).to_string()))
        }
    }

    /// Parse a spoken slot value such as `"3"`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidAnswer` for non-numeric or out-of-range input.
    pub fn from_slot(raw: &str) -> Result<Self, QuizError> {
        let number: usize = raw
            .trim()
            .parse()
            .map_err(|_| QuizError::InvalidAnswer(raw.to_owned()))?;
        if !(1..=OPTION_COUNT).contains(&number) {
            return Err(QuizError::InvalidAnswer(raw.to_owned()));
        }
        Ok(Self(number - 1))
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// The 1-based number as spoken.
    #[must_use]
    pub fn option_number(self) -> usize {
        self.0 + 1
    }
}

impl FromStr for AnswerChoice {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slot(s)
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.option_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_numbers_are_one_based() {
        assert_eq!(AnswerChoice::from_slot("1").unwrap().index(), 0);
        assert_eq!(AnswerChoice::from_slot(" 4 ").unwrap().index(), 3);
        assert_eq!(AnswerChoice::from_slot("3").unwrap().to_string(), "3");
    }

    #[test]
    fn rejects_out_of_range_and_text() {
        for raw in ["0", "5", "-1", "two", "", "1.0"] {
            let err = AnswerChoice::from_slot(raw).unwrap_err();
            assert!(matches!(err, QuizError::InvalidAnswer(_)), "{raw}");
        }
    }

    #[test]
    fn from_index_checks_bounds() {
        assert_eq!(AnswerChoice::from_index(2).unwrap().option_number(), 3);
        assert!(AnswerChoice::from_index(4).is_err());
    }
}
