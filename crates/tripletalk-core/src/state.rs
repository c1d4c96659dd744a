//! Driver state: the current value of every device setting.
//!
//! Values are stored exactly as the caller set them (caller scale, not
//! clamped) so getters return what was set. Clamping happens only when a
//! command is encoded.

use serde::{Deserialize, Serialize};

use crate::protocol::{self, Parameter};
use crate::voices::VoiceId;

/// Rate applied at start-up (device default `3S`).
pub const DEFAULT_RATE: i32 = 30;

/// Volume applied at start-up (device default `5V`).
pub const DEFAULT_VOLUME: i32 = 50;

/// Mutable record of the device settings for one driver session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverState {
    pub voice: VoiceId,
    pub rate: i32,
    pub pitch: i32,
    pub inflection: i32,
    pub volume: i32,
    pub articulation: i32,
    pub reverb: i32,
    pub formant: i32,
    pub text_delay: i32,
    pub tone: i32,
}

impl DriverState {
    /// State for `voice` with its baselines, plus the given rate and volume.
    pub fn new(voice: VoiceId, rate: i32, volume: i32) -> Self {
        let mut state = Self {
            voice,
            rate,
            pitch: 0,
            inflection: 0,
            volume,
            articulation: 0,
            reverb: 0,
            formant: 0,
            text_delay: 0,
            tone: 0,
        };
        state.apply_profile(voice);
        state
    }

    /// Current caller-scale value of `param`.
    pub const fn get(&self, param: Parameter) -> i32 {
        match param {
            Parameter::Rate => self.rate,
            Parameter::Pitch => self.pitch,
            Parameter::Inflection => self.inflection,
            Parameter::Volume => self.volume,
            Parameter::Articulation => self.articulation,
            Parameter::Reverb => self.reverb,
            Parameter::Formant => self.formant,
            Parameter::TextDelay => self.text_delay,
            Parameter::Tone => self.tone,
        }
    }

    fn slot_mut(&mut self, param: Parameter) -> &mut i32 {
        match param {
            Parameter::Rate => &mut self.rate,
            Parameter::Pitch => &mut self.pitch,
            Parameter::Inflection => &mut self.inflection,
            Parameter::Volume => &mut self.volume,
            Parameter::Articulation => &mut self.articulation,
            Parameter::Reverb => &mut self.reverb,
            Parameter::Formant => &mut self.formant,
            Parameter::TextDelay => &mut self.text_delay,
            Parameter::Tone => &mut self.tone,
        }
    }

    /// Store `value` for `param` and return the command that applies it.
    pub fn set(&mut self, param: Parameter, value: i32) -> Vec<u8> {
        *self.slot_mut(param) = value;
        protocol::encode(param, value)
    }

    /// Overwrite the voice and every voice-dependent field from its profile.
    /// Rate and volume are left alone.
    pub fn apply_profile(&mut self, voice: VoiceId) {
        let profile = voice.profile();
        self.voice = voice;
        for param in Parameter::VOICE_DEPENDENT {
            if let Some(baseline) = profile.baseline(param) {
                *self.slot_mut(param) = baseline;
            }
        }
    }

    /// Select the voice named by `id`.
    ///
    /// Unknown ids leave the state untouched and return `None`. Otherwise
    /// returns the commands to send, one per write, in device order: voice,
    /// pitch, inflection, articulation, reverb, formant, text delay, tone.
    pub fn select_voice(&mut self, id: &str) -> Option<Vec<Vec<u8>>> {
        let voice = VoiceId::parse(id)?;
        self.apply_profile(voice);

        let mut commands = Vec::with_capacity(1 + Parameter::VOICE_DEPENDENT.len());
        commands.push(protocol::encode_voice(voice));
        commands.extend(
            Parameter::VOICE_DEPENDENT
                .iter()
                .map(|&param| protocol::encode(param, self.get(param))),
        );
        Some(commands)
    }

    /// Commands for a full settings pass, one per write.
    ///
    /// The voice goes first because it resets the chip's voice parameters;
    /// the punctuation-mode command closes the pass.
    pub fn full_pass(&self) -> Vec<Vec<u8>> {
        let mut commands = Vec::with_capacity(2 + Parameter::ALL.len());
        commands.push(protocol::encode_voice(self.voice));
        commands.extend(
            Parameter::ALL
                .iter()
                .map(|&param| protocol::encode(param, self.get(param))),
        );
        commands.push(protocol::PUNCTUATION_MODE.to_vec());
        commands
    }
}

impl Default for DriverState {
    fn default() -> Self {
        Self::new(VoiceId::DEFAULT, DEFAULT_RATE, DEFAULT_VOLUME)
    }
}
