//! RC8660 voice table (Table 8 of the RC8660 manual).
//!
//! Each voice carries the baseline for every voice-dependent parameter.
//! Pitch and formant are device-native (0-99); the rest are on the caller's
//! 0-100 scale, chosen so that [`Parameter::to_device`](crate::Parameter::to_device)
//! lands on the voice's factory setting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::protocol::Parameter;

/// Identifier of one of the enumerated voices (`0..=10`).
///
/// Can only be constructed for ids present in [`VOICES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoiceId(u8);

impl VoiceId {
    /// Perfect Paul.
    pub const DEFAULT: Self = Self(0);

    /// Returns `None` if `id` is not an enumerated voice.
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < VOICE_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Look up a voice by its string form (`"0"` .. `"10"`).
    ///
    /// Only the canonical decimal spelling is accepted; `"007"` or `" 1"`
    /// are unknown ids.
    pub fn parse(id: &str) -> Option<Self> {
        VOICES.iter().map(|v| v.id).find(|v| v.to_string() == id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// The table entry for this voice.
    pub fn voice(self) -> &'static Voice {
        &VOICES[self.0 as usize]
    }

    pub fn profile(self) -> &'static VoiceProfile {
        &self.voice().profile
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VoiceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownVoice(s.to_string()))
    }
}

impl TryFrom<String> for VoiceId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VoiceId> for String {
    fn from(value: VoiceId) -> Self {
        value.to_string()
    }
}

/// Baseline values applied when a voice is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub pitch: i32,
    pub formant: i32,
    pub inflection: i32,
    pub articulation: i32,
    pub reverb: i32,
    pub text_delay: i32,
    pub tone: i32,
}

impl VoiceProfile {
    /// Baseline for a voice-dependent parameter; `None` for rate and volume.
    pub const fn baseline(&self, param: Parameter) -> Option<i32> {
        match param {
            Parameter::Pitch => Some(self.pitch),
            Parameter::Formant => Some(self.formant),
            Parameter::Inflection => Some(self.inflection),
            Parameter::Articulation => Some(self.articulation),
            Parameter::Reverb => Some(self.reverb),
            Parameter::TextDelay => Some(self.text_delay),
            Parameter::Tone => Some(self.tone),
            Parameter::Rate | Parameter::Volume => None,
        }
    }
}

/// An enumerated device voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub id: VoiceId,
    pub name: &'static str,
    pub profile: VoiceProfile,
}

const fn voice(
    id: u8,
    name: &'static str,
    [pitch, formant, inflection, articulation, reverb, text_delay, tone]: [i32; 7],
) -> Voice {
    Voice {
        id: VoiceId(id),
        name,
        profile: VoiceProfile {
            pitch,
            formant,
            inflection,
            articulation,
            reverb,
            text_delay,
            tone,
        },
    }
}

/// Number of enumerated voices.
pub const VOICE_COUNT: usize = 11;

/// All device voices, indexed by id.
///
/// Columns: pitch, formant, inflection, articulation, reverb, text delay, tone.
pub static VOICES: [Voice; VOICE_COUNT] = [
    voice(0, "Perfect Paul", [50, 50, 50, 50, 0, 0, 50]),
    voice(1, "Vader", [10, 40, 60, 40, 30, 0, 50]),
    voice(2, "Big Bob", [40, 46, 50, 50, 0, 0, 0]),
    voice(3, "Precise Pete", [60, 52, 40, 60, 0, 0, 100]),
    voice(4, "Ricochet Randy", [40, 50, 50, 40, 90, 0, 50]),
    voice(5, "Biff", [50, 40, 70, 60, 0, 0, 0]),
    voice(6, "Skip", [15, 58, 70, 60, 0, 0, 0]),
    voice(7, "Robo Robert", [80, 54, 0, 40, 60, 7, 50]),
    voice(8, "Goliath", [20, 15, 50, 50, 20, 0, 50]),
    voice(9, "Alvin", [60, 99, 50, 50, 0, 0, 100]),
    voice(10, "Gretchen", [99, 67, 50, 50, 0, 0, 100]),
];

/// Tone setting labels on the caller scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToneLevel {
    Bass,
    Normal,
    Treble,
}

impl ToneLevel {
    /// Caller-scale value for this level.
    pub const fn value(self) -> i32 {
        match self {
            Self::Bass => 0,
            Self::Normal => 50,
            Self::Treble => 100,
        }
    }

    /// Level the device will use for a caller-scale tone value.
    pub fn from_value(value: i32) -> Self {
        match Parameter::Tone.to_device(value) {
            0 => Self::Bass,
            1 => Self::Normal,
            _ => Self::Treble,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bass => "Bass",
            Self::Normal => "Normal",
            Self::Treble => "Treble",
        }
    }
}
