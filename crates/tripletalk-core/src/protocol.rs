//! Triple-Talk wire protocol.
//!
//! Every tunable parameter is set with a command of the form
//! `<0x01><decimal><letter>`, e.g. `\x017V` for volume 7. Text is sent as
//! plain ASCII and spoken when the device sees a carriage return.
//!
//! Callers work in a 0-100 scale (pitch and formant are device-native
//! 0-99). [`Parameter::to_device`] converts and clamps; nothing in this
//! module rejects a value.

use serde::{Deserialize, Serialize};

use crate::voices::VoiceId;

/// Command prefix (Control-A).
pub const CMD_PREFIX: u8 = 0x01;

/// Silence speech and clear the device input buffer (Control-X).
pub const SILENCE: u8 = 0x18;

/// Terminator that makes the device speak its buffered text.
pub const FLUSH: u8 = b'\r';

/// Hard reset.
pub const RESET: [u8; 2] = [CMD_PREFIX, b'@'];

/// Punctuation mode 6: some punctuation spoken, numbers mode, leading-zero
/// suppression. Sent after every full settings pass.
pub const PUNCTUATION_MODE: [u8; 3] = [CMD_PREFIX, b'6', b'B'];

/// Comma pause, used for breaks up to [`SHORT_PAUSE_MAX_MS`].
pub const SHORT_PAUSE: &[u8] = b", \r";

/// Period pause, used for longer breaks.
pub const LONG_PAUSE: &[u8] = b". \r";

/// Longest break (inclusive) rendered as a comma pause.
pub const SHORT_PAUSE_MAX_MS: u32 = 200;

/// Byte substituted for any character the device cannot represent.
pub const REPLACEMENT: u8 = b' ';

/// A numeric device parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parameter {
    Rate,
    Pitch,
    Inflection,
    Volume,
    Articulation,
    Reverb,
    Formant,
    TextDelay,
    Tone,
}

impl Parameter {
    /// Every numeric parameter, in full-settings-pass order.
    pub const ALL: [Self; 9] = [
        Self::Rate,
        Self::Pitch,
        Self::Inflection,
        Self::Volume,
        Self::Articulation,
        Self::Reverb,
        Self::Formant,
        Self::TextDelay,
        Self::Tone,
    ];

    /// Parameters rebaselined by a voice change, in the order they are
    /// re-sent after the voice command.
    pub const VOICE_DEPENDENT: [Self; 7] = [
        Self::Pitch,
        Self::Inflection,
        Self::Articulation,
        Self::Reverb,
        Self::Formant,
        Self::TextDelay,
        Self::Tone,
    ];

    /// Command letter identifying this parameter on the wire.
    pub const fn letter(self) -> u8 {
        match self {
            Self::Rate => b'S',
            Self::Pitch => b'P',
            Self::Inflection => b'E',
            Self::Volume => b'V',
            Self::Articulation => b'A',
            Self::Reverb => b'R',
            Self::Formant => b'F',
            Self::TextDelay => b'T',
            Self::Tone => b'X',
        }
    }

    /// Largest device-side value accepted for this parameter.
    pub const fn device_max(self) -> u8 {
        match self {
            Self::Rate
            | Self::Inflection
            | Self::Volume
            | Self::Articulation
            | Self::Reverb => 9,
            Self::Pitch | Self::Formant => 99,
            Self::TextDelay => 15,
            Self::Tone => 2,
        }
    }

    /// Stable lowercase name, used in logs and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rate => "rate",
            Self::Pitch => "pitch",
            Self::Inflection => "inflection",
            Self::Volume => "volume",
            Self::Articulation => "articulation",
            Self::Reverb => "reverb",
            Self::Formant => "formant",
            Self::TextDelay => "textDelay",
            Self::Tone => "tone",
        }
    }

    /// Convert a caller-scale value to the device scale, clamped to
    /// `0..=device_max()`.
    ///
    /// Negative values clamp to zero. Text delay rounds half up so that 100
    /// reaches the device maximum of 15; everything else floors.
    pub fn to_device(self, value: i32) -> u8 {
        let value = i64::from(value.max(0));
        let scaled = match self {
            Self::Rate
            | Self::Inflection
            | Self::Volume
            | Self::Articulation
            | Self::Reverb => value / 10,
            Self::Pitch | Self::Formant => value,
            Self::TextDelay => (value * 15 + 50) / 100,
            Self::Tone => value / 50,
        };
        let max = self.device_max();
        u8::try_from(scaled).map_or(max, |v| v.min(max))
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Append `<prefix><digits><letter>` to `buf`.
fn push_command(buf: &mut Vec<u8>, digits: &str, letter: u8) {
    buf.push(CMD_PREFIX);
    buf.extend_from_slice(digits.as_bytes());
    buf.push(letter);
}

/// Append the command for `param` at caller-scale `value` to `buf`.
pub fn encode_into(buf: &mut Vec<u8>, param: Parameter, value: i32) {
    let level = param.to_device(value);
    push_command(buf, &level.to_string(), param.letter());
}

/// Encode the command for `param` at caller-scale `value`.
///
/// ```
/// use tripletalk_core::{Parameter, encode};
///
/// assert_eq!(encode(Parameter::Volume, 75), b"\x017V");
/// assert_eq!(encode(Parameter::Pitch, 250), b"\x0199P");
/// ```
pub fn encode(param: Parameter, value: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(5);
    encode_into(&mut buf, param, value);
    buf
}

/// Encode the voice-selection command.
pub fn encode_voice(voice: VoiceId) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4);
    push_command(&mut buf, &voice.to_string(), b'O');
    buf
}

/// Pause bytes for a break of `millis` milliseconds.
///
/// The device has no variable-length pause, so breaks collapse to two
/// classes: a comma pause or a period pause.
pub const fn pause_for(millis: u32) -> &'static [u8] {
    if millis <= SHORT_PAUSE_MAX_MS {
        SHORT_PAUSE
    } else {
        LONG_PAUSE
    }
}

/// Whether `c` can be sent to the device as-is.
///
/// Printable ASCII plus tab and newline. Other control characters are
/// excluded: `0x01` would start a command and `\r` would force a flush.
pub const fn is_representable(c: char) -> bool {
    matches!(c, ' '..='~' | '\t' | '\n')
}

/// Append `text` to `buf`, replacing every unrepresentable character with a
/// single [`REPLACEMENT`] byte.
pub fn push_text(buf: &mut Vec<u8>, text: &str) {
    buf.reserve(text.len());
    for c in text.chars() {
        if is_representable(c) {
            // Representable characters are ASCII, so this is lossless.
            buf.push(c as u8);
        } else {
            buf.push(REPLACEMENT);
        }
    }
}
