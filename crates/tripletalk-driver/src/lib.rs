//! Triple-Talk speech driver.
//!
//! Runs speech sequences on a background worker thread and translates them
//! into the Triple-Talk byte protocol.
//!
//! # Architecture
//!
//! ```text
//! caller ──speak──▶ SpeechQueue ──▶ worker thread ──▶ Translator ──▶ Transport
//!    │                                                    │
//!    └── setters / cancel / pause ──────────────▶ Transport    └──▶ SynthEventSink
//! ```
//!
//! - [`SynthDriver`] is the facade hosts use
//! - [`transport`] abstracts the device (`DeviceFileTransport`, `MemoryTransport`)
//! - [`events`] carries index-reached and done-speaking notifications back

pub mod driver;
pub mod error;
pub mod events;
pub mod queue;
pub mod translator;
pub mod transport;
mod worker;

pub use driver::{DESCRIPTION, NAME, SynthDriver};
pub use error::SynthError;
pub use events::{ChannelEventSink, NoopEventSink, SynthEvent, SynthEventSink};
pub use queue::{QueueItem, SpeechQueue};
pub use translator::{SpeechSession, Translator};
pub use transport::{DeviceFileTransport, MemoryTransport, Transport, TransportCall};
