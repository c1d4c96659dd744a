//! Core domain types for the Triple-Talk speech driver.
//!
//! This crate is pure: it knows how parameters map to device command bytes,
//! which voices exist and what their baselines are, and what a speech
//! sequence looks like. It performs no I/O; the `tripletalk-driver` crate
//! owns the transport, the speech queue and the worker thread.
//!
//! # Modules
//!
//! - [`protocol`] - wire constants and the parameter command encoder
//! - [`voices`] - the static voice and voice-profile table
//! - [`speech`] - speech sequence items
//! - [`state`] - the mutable driver state record
//! - [`settings`] - driver configuration and validation

pub mod error;
pub mod protocol;
pub mod settings;
pub mod speech;
pub mod state;
pub mod voices;

pub use error::CoreError;
pub use protocol::{Parameter, encode, encode_voice};
pub use settings::DriverConfig;
pub use speech::{IndexMark, SpeechItem, SpeechSequence};
pub use state::DriverState;
pub use voices::{ToneLevel, VOICE_COUNT, VOICES, Voice, VoiceId, VoiceProfile};
