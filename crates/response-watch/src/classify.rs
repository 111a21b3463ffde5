//! Pure classification of newly arrived reply text.

use serde::{Deserialize, Serialize};

/// The assistant's stock failure shrug.
const SHRUG_EMOTICON: &str = "¯_(ツ)_/¯";
/// Backend marker leaked into the transcript when an agent run dies.
const AGENT_FAILED: &str = "AGENT_FAILED";

const DEFAULT_MIN_LENGTH: usize = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ReplyQuality {
    Meaningful,
    Empty,
    /// Contains a known failure marker.
    FailureMarker,
    /// Non-empty but below the minimum length threshold.
    TooShort,
}

/// Judges whether retrieved reply text is a meaningful result.
///
/// Deliberately not part of the waiting primitive: arrival and quality are
/// separate questions.
#[derive(Clone, Debug)]
pub struct ReplyClassifier {
    failure_markers: Vec<String>,
    min_length: usize,
}

impl Default for ReplyClassifier {
    fn default() -> Self {
        Self {
            failure_markers: vec![SHRUG_EMOTICON.to_string(), AGENT_FAILED.to_string()],
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl ReplyClassifier {
    pub fn new(failure_markers: Vec<String>, min_length: usize) -> Self {
        Self {
            failure_markers,
            min_length,
        }
    }

    pub fn classify(&self, text: &str) -> ReplyQuality {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ReplyQuality::Empty;
        }
        if self
            .failure_markers
            .iter()
            .any(|marker| trimmed.contains(marker.as_str()))
        {
            return ReplyQuality::FailureMarker;
        }
        if trimmed.chars().count() < self.min_length {
            return ReplyQuality::TooShort;
        }
        ReplyQuality::Meaningful
    }

    pub fn is_meaningful(&self, text: &str) -> bool {
        self.classify(text) == ReplyQuality::Meaningful
    }
}
