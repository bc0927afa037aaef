use std::fmt;
use std::ops::RangeInclusive;

use clap::ValueEnum;
use thiserror::Error;

use crate::utils::trim_line;

pub const INPUT_REQUIRED_MESSAGE: &str = "Please enter both Role and Topic.";

pub const MIN_QUESTIONS: u8 = 3;
pub const MAX_QUESTIONS: u8 = 20;
pub const DEFAULT_QUESTIONS: u8 = 6;

pub const QUESTION_COUNT_RANGE: RangeInclusive<u8> = MIN_QUESTIONS..=MAX_QUESTIONS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Level {
    Intern,
    #[default]
    Junior,
    MidLevel,
    Senior,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Intern, Level::Junior, Level::MidLevel, Level::Senior];

    pub fn label(&self) -> &'static str {
        match self {
            Level::Intern => "Intern",
            Level::Junior => "Junior",
            Level::MidLevel => "Mid-level",
            Level::Senior => "Senior",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Arabic];

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter both Role and Topic.")]
    MissingRoleOrTopic,
    #[error("Number of questions must be between 3 and 20, got {0}.")]
    QuestionCountOutOfRange(u8),
}

/// A validated set of form inputs. Role and topic are stored trimmed and are
/// never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudySetRequest {
    role: String,
    level: Level,
    topic: String,
    question_count: u8,
    language: Language,
}

impl StudySetRequest {
    pub fn new(
        role: &str,
        level: Level,
        topic: &str,
        question_count: u8,
        language: Language,
    ) -> Result<Self, InputError> {
        let (Some(role), Some(topic)) = (trim_line(role), trim_line(topic)) else {
            return Err(InputError::MissingRoleOrTopic);
        };
        if !QUESTION_COUNT_RANGE.contains(&question_count) {
            return Err(InputError::QuestionCountOutOfRange(question_count));
        }

        Ok(Self {
            role: role.to_string(),
            level,
            topic: topic.to_string(),
            question_count,
            language,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn question_count(&self) -> u8 {
        self.question_count
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_role_and_topic() {
        let request =
            StudySetRequest::new("  Data Analyst ", Level::Junior, "\tSQL\n", 6, Language::English)
                .unwrap();
        assert_eq!(request.role(), "Data Analyst");
        assert_eq!(request.topic(), "SQL");
    }

    #[test]
    fn rejects_blank_role_or_topic() {
        for (role, topic) in [("", "SQL"), ("Dev", ""), ("   ", "SQL"), ("Dev", " \t ")] {
            let err = StudySetRequest::new(role, Level::Senior, topic, 5, Language::Arabic)
                .unwrap_err();
            assert_eq!(err, InputError::MissingRoleOrTopic);
            assert_eq!(err.to_string(), "Please enter both Role and Topic.");
        }
    }

    #[test]
    fn enforces_question_count_bounds() {
        assert!(StudySetRequest::new("Dev", Level::Intern, "Rust", 3, Language::English).is_ok());
        assert!(StudySetRequest::new("Dev", Level::Intern, "Rust", 20, Language::English).is_ok());
        assert_eq!(
            StudySetRequest::new("Dev", Level::Intern, "Rust", 2, Language::English),
            Err(InputError::QuestionCountOutOfRange(2))
        );
        assert_eq!(
            StudySetRequest::new("Dev", Level::Intern, "Rust", 21, Language::English),
            Err(InputError::QuestionCountOutOfRange(21))
        );
    }

    #[test]
    fn blank_inputs_win_over_count_errors() {
        assert_eq!(
            StudySetRequest::new("", Level::Intern, "", 99, Language::English),
            Err(InputError::MissingRoleOrTopic)
        );
    }

    #[test]
    fn labels_match_form_choices() {
        let levels: Vec<_> = Level::ALL.iter().map(Level::label).collect();
        assert_eq!(levels, ["Intern", "Junior", "Mid-level", "Senior"]);
        assert_eq!(Language::Arabic.to_string(), "Arabic");
        assert_eq!(Level::default(), Level::Junior);
        assert_eq!(Language::default(), Language::English);
    }
}
