//! Conversation data model
//!
//! Turns, transcripts and the user metadata passed alongside them.
//! Everything here is plain data: no I/O, no prompt text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content of the placeholder turn that marks an in-flight reply
pub const PENDING_REPLY_SENTINEL: &str = "\u{2026}\u{2026}";

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
    System,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
            Speaker::System => "system",
        }
    }
}

/// One message in a conversation
///
/// Immutable once created; fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Speaker,
    content: String,
}

impl Turn {
    pub fn new(role: Speaker, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Speaker::System, content)
    }

    /// Placeholder assistant turn shown while a reply streams in
    pub fn pending() -> Self {
        Self::assistant(PENDING_REPLY_SENTINEL)
    }

    pub fn role(&self) -> Speaker {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_pending(&self) -> bool {
        self.role == Speaker::Assistant && self.content == PENDING_REPLY_SENTINEL
    }
}

/// Ordered, append-only history of turns for one session
///
/// The only in-place mutation is [`Transcript::replace_pending`], which swaps
/// the trailing placeholder for the finished (or failed) reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Replace the trailing placeholder turn
    ///
    /// Returns false (and leaves the transcript untouched) when the last
    /// turn is not a placeholder.
    pub fn replace_pending(&mut self, turn: Turn) -> bool {
        match self.turns.last_mut() {
            Some(last) if last.is_pending() => {
                *last = turn;
                true
            }
            _ => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.turns.last().map(Turn::is_pending).unwrap_or(false)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

/// Validation failure for user metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("age must be between 1 and 120, got {0}")]
    AgeOutOfRange(i64),

    #[error("age is not a number: {0}")]
    InvalidAge(String),

    #[error("unknown gender: {0}")]
    UnknownGender(String),

    #[error("unknown symptom duration: {0}")]
    UnknownDuration(String),

    #[error("unknown prompt preset: {0}")]
    UnknownPreset(String),
}

/// Age in whole years, 1..=120
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 120;

    pub fn new(years: i64) -> Result<Self, ProfileError> {
        if years < i64::from(Self::MIN) || years > i64::from(Self::MAX) {
            return Err(ProfileError::AgeOutOfRange(years));
        }
        Ok(Self(years as u8))
    }

    pub fn years(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Age {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let years: i64 = s
            .trim()
            .parse()
            .map_err(|_| ProfileError::InvalidAge(s.trim().to_string()))?;
        Age::new(years)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Undisclosed,
}

impl Gender {
    /// Label used in prompts and on screen
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
            Gender::Undisclosed => "不方便透露",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "男" | "male" | "m" => Ok(Gender::Male),
            "女" | "female" | "f" => Ok(Gender::Female),
            "不方便透露" | "-" | "undisclosed" => Ok(Gender::Undisclosed),
            other => Err(ProfileError::UnknownGender(other.to_string())),
        }
    }
}

/// How long the symptoms have lasted (five fixed buckets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SymptomDuration {
    #[default]
    OneToThreeDays,
    AboutAWeek,
    TwoToFourWeeks,
    OneToThreeMonths,
    OverThreeMonths,
}

impl SymptomDuration {
    pub const ALL: [SymptomDuration; 5] = [
        SymptomDuration::OneToThreeDays,
        SymptomDuration::AboutAWeek,
        SymptomDuration::TwoToFourWeeks,
        SymptomDuration::OneToThreeMonths,
        SymptomDuration::OverThreeMonths,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SymptomDuration::OneToThreeDays => "1-3天",
            SymptomDuration::AboutAWeek => "1周左右",
            SymptomDuration::TwoToFourWeeks => "2-4周",
            SymptomDuration::OneToThreeMonths => "1-3个月",
            SymptomDuration::OverThreeMonths => "3个月以上",
        }
    }
}

impl fmt::Display for SymptomDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SymptomDuration {
    type Err = ProfileError;

    /// Accepts the label itself or its 1-based position in [`SymptomDuration::ALL`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(found) = Self::ALL.iter().find(|d| d.label() == s) {
            return Ok(*found);
        }
        s.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| ProfileError::UnknownDuration(s.to_string()))
    }
}

/// Optional user metadata sent alongside every chat request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub age: Option<Age>,
    pub gender: Gender,
}

impl UserProfile {
    pub fn new(age: Option<Age>, gender: Gender) -> Self {
        Self { age, gender }
    }
}

/// Single-shot analysis input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub symptoms: String,
    pub age: Option<Age>,
    pub gender: Gender,
    pub duration: SymptomDuration,
}

impl AnalysisRequest {
    pub fn new(
        symptoms: impl Into<String>,
        age: Option<Age>,
        gender: Gender,
        duration: SymptomDuration,
    ) -> Self {
        Self {
            symptoms: symptoms.into(),
            age,
            gender,
            duration,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::new(self.age, self.gender)
    }
}

/// Which instruction template family to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptPreset {
    Basic,
    #[default]
    Detailed,
}

impl PromptPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptPreset::Basic => "basic",
            PromptPreset::Detailed => "detailed",
        }
    }
}

impl FromStr for PromptPreset {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(PromptPreset::Basic),
            "detailed" | "structured" => Ok(PromptPreset::Detailed),
            other => Err(ProfileError::UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bounds() {
        assert!(Age::new(0).is_err());
        assert!(Age::new(121).is_err());
        assert_eq!(Age::new(1).unwrap().years(), 1);
        assert_eq!(Age::new(120).unwrap().years(), 120);
        assert_eq!("28".parse::<Age>().unwrap().years(), 28);
        assert!("abc".parse::<Age>().is_err());
    }

    #[test]
    fn test_gender_labels_round_trip() {
        for g in [Gender::Male, Gender::Female, Gender::Undisclosed] {
            assert_eq!(g.label().parse::<Gender>().unwrap(), g);
        }
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn test_duration_by_label_or_index() {
        assert_eq!(
            "2-4周".parse::<SymptomDuration>().unwrap(),
            SymptomDuration::TwoToFourWeeks
        );
        assert_eq!(
            "5".parse::<SymptomDuration>().unwrap(),
            SymptomDuration::OverThreeMonths
        );
        assert!("0".parse::<SymptomDuration>().is_err());
        assert!("6".parse::<SymptomDuration>().is_err());
    }

    #[test]
    fn test_replace_pending_only_touches_placeholder() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::user("头晕"));
        assert!(!transcript.replace_pending(Turn::assistant("x")));

        transcript.push(Turn::pending());
        assert!(transcript.has_pending());
        assert!(transcript.replace_pending(Turn::assistant("多休息")));
        assert!(!transcript.has_pending());
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().unwrap().content(), "多休息");
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("Basic".parse::<PromptPreset>().unwrap(), PromptPreset::Basic);
        assert_eq!(
            "structured".parse::<PromptPreset>().unwrap(),
            PromptPreset::Detailed
        );
        assert!("fancy".parse::<PromptPreset>().is_err());
    }
}
