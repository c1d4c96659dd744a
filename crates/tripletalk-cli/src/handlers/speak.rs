//! Speak command handler.

use std::sync::Arc;
use std::time::Duration;

use tripletalk_core::DriverConfig;
use tripletalk_driver::{
    ChannelEventSink, MemoryTransport, SynthDriver, SynthEvent, SynthEventSink, Transport,
};

use crate::error::CliError;
use crate::markup;

/// Options for one `speak` invocation.
#[derive(Debug)]
pub struct SpeakArgs<'a> {
    pub text: &'a str,
    pub pitch: Option<i32>,
    pub dry_run: bool,
    pub wait: Duration,
}

/// Speak `args.text` and wait for it to be sent.
///
/// With `dry_run` the bytes go to a [`MemoryTransport`] and are printed in
/// escaped form instead.
pub fn execute(config: &DriverConfig, args: &SpeakArgs<'_>) -> Result<(), CliError> {
    let sequence = markup::parse(args.text)?;
    let (sink, mut events) = ChannelEventSink::new();
    let sink: Arc<dyn SynthEventSink> = Arc::new(sink);

    let memory = args.dry_run.then(|| Arc::new(MemoryTransport::new()));
    let driver = match &memory {
        Some(memory) => {
            let transport: Arc<dyn Transport> = memory.clone();
            SynthDriver::new(config, transport, sink)?
        }
        None => SynthDriver::open(config, sink)?,
    };

    if let Some(pitch) = args.pitch {
        driver.set_pitch(pitch);
    }
    driver.speak(sequence);

    if !driver.wait_idle(args.wait) {
        tracing::warn!(
            pending = driver.pending(),
            "Timed out waiting for speech, cancelling"
        );
        driver.cancel();
    }
    driver.terminate();

    while let Ok(event) = events.try_recv() {
        match event {
            SynthEvent::IndexReached(mark) => tracing::info!(%mark, "Index reached"),
            SynthEvent::DoneSpeaking => tracing::debug!("Done speaking"),
        }
    }

    if let Some(memory) = memory {
        println!("{}", escape(&memory.bytes()));
    }
    Ok(())
}

/// Render device bytes with control characters escaped.
pub fn escape(bytes: &[u8]) -> String {
    bytes.escape_ascii().to_string()
}
