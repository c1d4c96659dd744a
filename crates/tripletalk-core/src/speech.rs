//! Speech sequence items.

use serde::{Deserialize, Serialize};

/// Opaque caller token echoed back once the text before it has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexMark(pub i64);

impl std::fmt::Display for IndexMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One element of a speech sequence.
///
/// Rate, pitch and volume overrides take the caller scale (see
/// [`Parameter::to_device`](crate::Parameter::to_device)) and apply to the
/// rest of the sequence they appear in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SpeechItem {
    /// Text to speak. Converted to the device alphabet when sent.
    Text(String),

    /// Position marker reported back through the event sink.
    Index(IndexMark),

    /// Rate override for the remainder of the sequence.
    Rate(i32),

    /// Pitch override for the remainder of the sequence.
    Pitch(i32),

    /// Volume override for the remainder of the sequence.
    Volume(i32),

    /// Pause of the given length in milliseconds.
    Break(u32),
}

impl SpeechItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub const fn index(mark: i64) -> Self {
        Self::Index(IndexMark(mark))
    }
}

impl From<&str> for SpeechItem {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SpeechItem {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<IndexMark> for SpeechItem {
    fn from(value: IndexMark) -> Self {
        Self::Index(value)
    }
}

/// An owned, ordered list of speech items.
pub type SpeechSequence = Vec<SpeechItem>;
