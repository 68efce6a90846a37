//! Skill areas, question types, and the static mapping between them.
//!
//! Both axes are closed enums: strings coming in over HTTP or out of the
//! database are parsed exactly once at the boundary, and everything inside
//! the engine works with typed keys. The area -> types table is the single
//! source of truth for which exercise formats a practice session may pick
//! from for a given skill.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Skill areas
// ---------------------------------------------------------------------------

/// One of the four top-level practice domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillArea {
    Speaking,
    Listening,
    Reading,
    Writing,
}

impl SkillArea {
    /// All four skill areas, in canonical order.
    pub const ALL: [SkillArea; 4] = [
        SkillArea::Speaking,
        SkillArea::Listening,
        SkillArea::Reading,
        SkillArea::Writing,
    ];

    /// The exercise formats that belong to this skill area.
    pub fn question_types(self) -> &'static [QuestionType] {
        match self {
            SkillArea::Speaking => &[
                QuestionType::ListenThenSpeak,
                QuestionType::ReadAloud,
                QuestionType::DescribeImage,
            ],
            SkillArea::Listening => &[
                QuestionType::ListenAndChoose,
                QuestionType::DictationTyping,
            ],
            SkillArea::Reading => &[
                QuestionType::ReadAndChoose,
                QuestionType::FillInTheBlank,
            ],
            SkillArea::Writing => &[
                QuestionType::WriteAboutPhoto,
                QuestionType::RespondToPrompt,
            ],
        }
    }

    /// The database/wire form, e.g. `"speaking"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SkillArea::Speaking => "speaking",
            SkillArea::Listening => "listening",
            SkillArea::Reading => "reading",
            SkillArea::Writing => "writing",
        }
    }
}

impl fmt::Display for SkillArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillArea {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speaking" => Ok(SkillArea::Speaking),
            "listening" => Ok(SkillArea::Listening),
            "reading" => Ok(SkillArea::Reading),
            "writing" => Ok(SkillArea::Writing),
            other => Err(CoreError::Validation(format!(
                "Unknown skill area '{other}'. Must be one of: speaking, listening, reading, writing"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Question types
// ---------------------------------------------------------------------------

/// A specific exercise format, nested under exactly one [`SkillArea`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    // Speaking
    ListenThenSpeak,
    ReadAloud,
    DescribeImage,
    // Listening
    ListenAndChoose,
    DictationTyping,
    // Reading
    ReadAndChoose,
    FillInTheBlank,
    // Writing
    WriteAboutPhoto,
    RespondToPrompt,
}

impl QuestionType {
    /// All exercise formats across every skill area.
    pub const ALL: [QuestionType; 9] = [
        QuestionType::ListenThenSpeak,
        QuestionType::ReadAloud,
        QuestionType::DescribeImage,
        QuestionType::ListenAndChoose,
        QuestionType::DictationTyping,
        QuestionType::ReadAndChoose,
        QuestionType::FillInTheBlank,
        QuestionType::WriteAboutPhoto,
        QuestionType::RespondToPrompt,
    ];

    /// The skill area this format belongs to.
    pub fn skill_area(self) -> SkillArea {
        match self {
            QuestionType::ListenThenSpeak
            | QuestionType::ReadAloud
            | QuestionType::DescribeImage => SkillArea::Speaking,
            QuestionType::ListenAndChoose | QuestionType::DictationTyping => SkillArea::Listening,
            QuestionType::ReadAndChoose | QuestionType::FillInTheBlank => SkillArea::Reading,
            QuestionType::WriteAboutPhoto | QuestionType::RespondToPrompt => SkillArea::Writing,
        }
    }

    /// The database/wire form, e.g. `"listen_then_speak"`.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::ListenThenSpeak => "listen_then_speak",
            QuestionType::ReadAloud => "read_aloud",
            QuestionType::DescribeImage => "describe_image",
            QuestionType::ListenAndChoose => "listen_and_choose",
            QuestionType::DictationTyping => "dictation_typing",
            QuestionType::ReadAndChoose => "read_and_choose",
            QuestionType::FillInTheBlank => "fill_in_the_blank",
            QuestionType::WriteAboutPhoto => "write_about_photo",
            QuestionType::RespondToPrompt => "respond_to_prompt",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|qt| qt.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = QuestionType::ALL.iter().map(|qt| qt.as_str()).collect();
                CoreError::Validation(format!(
                    "Unknown question type '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
