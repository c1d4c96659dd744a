//! Integration tests for the `SynthDriver` lifecycle.
//!
//! These tests drive a full driver (queue, worker thread, translator) over
//! an in-memory transport. No hardware is required.
//!
//! # What is tested
//!
//! - Construction sends the reset and a full settings pass
//! - Voice selection, including unknown ids
//! - FIFO ordering across sequences and callers
//! - Event sinks that call back into the driver
//! - `cancel` while the worker is busy
//! - A failed write does not stop speech
//! - No notifications after `terminate`
//! - The readiness check never fails

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;

use mockall::mock;
use tokio::sync::mpsc::UnboundedReceiver;
use tripletalk_core::protocol::{self, Parameter};
use tripletalk_core::{DriverConfig, IndexMark, SpeechItem, VoiceId};
use tripletalk_driver::transport;
use tripletalk_driver::{
    ChannelEventSink, MemoryTransport, SynthDriver, SynthError, SynthEvent, Transport,
    TransportCall,
};

const IDLE_TIMEOUT: Duration = Duration::from_secs(2);

// ── Test transports ────────────────────────────────────────────────

/// Records like `MemoryTransport` but holds any write starting with
/// `block` until the gate is opened.
struct GatedTransport {
    inner: MemoryTransport,
    open: Mutex<bool>,
    opened: Condvar,
    entered: Mutex<mpsc::Sender<()>>,
}

impl GatedTransport {
    fn new() -> (Arc<Self>, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel();
        let transport = Arc::new(Self {
            inner: MemoryTransport::new(),
            open: Mutex::new(false),
            opened: Condvar::new(),
            entered: Mutex::new(tx),
        });
        (transport, rx)
    }

    fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

impl Transport for GatedTransport {
    fn write_immediate(&self, byte: u8) -> Result<(), SynthError> {
        self.inner.write_immediate(byte)
    }

    fn write_string(&self, bytes: &[u8]) -> Result<(), SynthError> {
        if bytes.starts_with(b"block") {
            let _ = self.entered.lock().unwrap().send(());
            let mut open = self.open.lock().unwrap();
            while !*open {
                open = self.opened.wait(open).unwrap();
            }
        }
        self.inner.write_string(bytes)
    }

    fn query_ready(&self) -> Result<bool, SynthError> {
        self.inner.query_ready()
    }
}

mock! {
    Device {}

    impl Transport for Device {
        fn write_immediate(&self, byte: u8) -> Result<(), SynthError>;
        fn write_string(&self, bytes: &[u8]) -> Result<(), SynthError>;
        fn query_ready(&self) -> Result<bool, SynthError>;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn start(transport: Arc<dyn Transport>) -> (SynthDriver, UnboundedReceiver<SynthEvent>) {
    start_with(&DriverConfig::default(), transport)
}

fn start_with(
    config: &DriverConfig,
    transport: Arc<dyn Transport>,
) -> (SynthDriver, UnboundedReceiver<SynthEvent>) {
    let (sink, rx) = ChannelEventSink::new();
    let driver = SynthDriver::new(config, transport, Arc::new(sink)).unwrap();
    (driver, rx)
}

/// Drain all pending events from the receiver and return them.
fn drain_events(rx: &mut UnboundedReceiver<SynthEvent>) -> Vec<SynthEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ── Construction & settings ────────────────────────────────────────

#[test]
fn construction_resets_then_sends_full_pass() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());

    let calls = memory.calls();
    assert_eq!(
        &calls[..2],
        &[
            TransportCall::Immediate(protocol::CMD_PREFIX),
            TransportCall::Immediate(b'@'),
        ]
    );

    let expected: [&[u8]; 11] = [
        b"\x010O", b"\x013S", b"\x0150P", b"\x015E", b"\x015V", b"\x015A", b"\x010R",
        b"\x0150F", b"\x010T", b"\x011X", b"\x016B",
    ];
    let strings = memory.strings();
    assert_eq!(strings.len(), expected.len());
    for (sent, want) in strings.iter().zip(expected) {
        assert_eq!(sent.as_slice(), want);
    }

    assert_eq!(driver.voice(), VoiceId::DEFAULT);
    assert_eq!(driver.rate(), 30);
    assert_eq!(driver.volume(), 50);
}

#[test]
fn unknown_voice_is_ignored() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    let before = driver.settings();
    memory.clear();

    driver.set_voice("42");
    driver.set_voice("paul");

    assert_eq!(driver.settings(), before);
    assert!(memory.calls().is_empty());
}

#[test]
fn voice_selection_writes_voice_then_baselines() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    driver.set_rate(80);
    memory.clear();

    driver.set_voice("1");

    let settings = driver.settings();
    let profile = VoiceId::new(1).unwrap().profile();
    assert_eq!(settings.voice.get(), 1);
    assert_eq!(settings.pitch, profile.pitch);
    assert_eq!(settings.tone, profile.tone);
    assert_eq!(settings.rate, 80);
    assert_eq!(settings.volume, 50);

    let strings = memory.strings();
    assert_eq!(strings.len(), 8);
    assert_eq!(strings[0], b"\x011O".to_vec());
    assert_eq!(strings[1], protocol::encode(Parameter::Pitch, profile.pitch));
    assert_eq!(strings[7], protocol::encode(Parameter::Tone, profile.tone));
}

#[test]
fn apply_settings_repeats_full_pass() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    memory.clear();

    driver.apply_settings();

    let strings = memory.strings();
    assert_eq!(strings.len(), 11);
    assert_eq!(strings.last().unwrap(), &protocol::PUNCTUATION_MODE.to_vec());
}

// ── Speaking ───────────────────────────────────────────────────────

#[test]
fn sequences_are_spoken_in_order_with_notifications() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, mut rx) = start(memory.clone());
    memory.clear();

    driver.speak([
        SpeechItem::text("Hello, "),
        SpeechItem::index(42),
        SpeechItem::text(" world"),
    ]);
    driver.speak(vec![SpeechItem::text("second")]);
    assert!(driver.wait_idle(IDLE_TIMEOUT));

    assert_eq!(
        memory.strings(),
        vec![
            b"Hello, \r".to_vec(),
            b" world\r".to_vec(),
            b"second\r".to_vec(),
        ]
    );
    assert_eq!(
        drain_events(&mut rx),
        vec![
            SynthEvent::IndexReached(IndexMark(42)),
            SynthEvent::DoneSpeaking,
            SynthEvent::DoneSpeaking,
        ]
    );
    assert_eq!(driver.last_index(), Some(IndexMark(42)));
}

#[test]
fn failed_write_does_not_stop_speech() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, mut rx) = start(memory.clone());
    memory.clear();
    memory.fail_writes_containing("broken");

    driver.speak([
        SpeechItem::text("broken"),
        SpeechItem::index(1),
        SpeechItem::text("rest"),
    ]);
    driver.speak([SpeechItem::text("fine"), SpeechItem::index(2)]);
    assert!(driver.wait_idle(IDLE_TIMEOUT));

    assert_eq!(memory.strings(), vec![b"rest\r".to_vec(), b"fine\r".to_vec()]);
    assert_eq!(
        drain_events(&mut rx),
        vec![
            SynthEvent::IndexReached(IndexMark(1)),
            SynthEvent::DoneSpeaking,
            SynthEvent::IndexReached(IndexMark(2)),
            SynthEvent::DoneSpeaking,
        ]
    );
}

#[test]
fn sequences_from_two_callers_are_not_interleaved() {
    const PER_CALLER: usize = 20;

    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    memory.clear();

    thread::scope(|scope| {
        for caller in ['a', 'b'] {
            let driver = &driver;
            scope.spawn(move || {
                for i in 0..PER_CALLER {
                    driver.speak([
                        SpeechItem::text(format!("{caller}{i:02}-head")),
                        SpeechItem::index(i64::try_from(i).unwrap()),
                        SpeechItem::text(format!("{caller}{i:02}-tail")),
                    ]);
                }
            });
        }
    });
    assert!(driver.wait_idle(IDLE_TIMEOUT));

    let strings: Vec<String> = memory
        .strings()
        .into_iter()
        .map(|bytes| String::from_utf8(bytes).unwrap())
        .collect();
    assert_eq!(strings.len(), 2 * 2 * PER_CALLER);

    let mut seen = Vec::new();
    for pair in strings.chunks(2) {
        let id = pair[0].strip_suffix("-head\r").unwrap();
        assert_eq!(pair[1], format!("{id}-tail\r"));
        seen.push(id.to_string());
    }
    for caller in ['a', 'b'] {
        let order: Vec<&String> = seen.iter().filter(|id| id.starts_with(caller)).collect();
        let expected: Vec<String> = (0..PER_CALLER).map(|i| format!("{caller}{i:02}")).collect();
        assert_eq!(order, expected.iter().collect::<Vec<_>>());
    }
}

// ── Sinks that call back into the driver ───────────────────────────

/// Start a driver whose sink runs `on_event` with a handle to the driver.
fn start_with_callback<F>(
    config: &DriverConfig,
    transport: Arc<dyn Transport>,
    on_event: F,
) -> Arc<SynthDriver>
where
    F: Fn(&SynthDriver, SynthEvent) + Send + Sync + 'static,
{
    let slot: Arc<OnceLock<Weak<SynthDriver>>> = Arc::default();
    let sink = {
        let slot = Arc::clone(&slot);
        move |event: SynthEvent| {
            if let Some(driver) = slot.get().and_then(Weak::upgrade) {
                on_event(&driver, event);
            }
        }
    };
    let driver = Arc::new(SynthDriver::new(config, transport, Arc::new(sink)).unwrap());
    slot.set(Arc::downgrade(&driver)).unwrap();
    driver
}

#[test]
fn sink_can_queue_the_next_sequence() {
    let memory = Arc::new(MemoryTransport::new());
    let done = Arc::new(AtomicUsize::new(0));
    let driver = {
        let done = Arc::clone(&done);
        start_with_callback(&DriverConfig::default(), memory.clone(), move |driver, event| {
            assert!(!driver.is_terminated());
            if event == SynthEvent::DoneSpeaking && done.fetch_add(1, Ordering::SeqCst) == 0 {
                driver.speak([SpeechItem::text("next")]);
            }
        })
    };
    memory.clear();

    driver.speak([SpeechItem::text("first")]);
    assert!(driver.wait_idle(IDLE_TIMEOUT));

    assert_eq!(memory.strings(), vec![b"first\r".to_vec(), b"next\r".to_vec()]);
    assert_eq!(done.load(Ordering::SeqCst), 2);
}

#[test]
fn terminate_returns_while_sink_queries_driver() {
    let memory = Arc::new(MemoryTransport::new());
    let config = DriverConfig {
        shutdown_timeout_ms: 200,
        ..DriverConfig::default()
    };
    let queried = Arc::new(AtomicUsize::new(0));
    let driver = {
        let queried = Arc::clone(&queried);
        start_with_callback(&config, memory, move |driver, event| {
            if matches!(event, SynthEvent::IndexReached(_)) {
                let _ = driver.is_terminated();
                queried.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    driver.speak([
        SpeechItem::text("a"),
        SpeechItem::index(1),
        SpeechItem::text("b"),
    ]);
    assert!(driver.wait_idle(IDLE_TIMEOUT));
    assert_eq!(queried.load(Ordering::SeqCst), 1);

    let (tx, rx) = mpsc::channel();
    let terminator = {
        let driver = Arc::clone(&driver);
        thread::spawn(move || {
            driver.terminate();
            let _ = tx.send(());
        })
    };
    assert!(rx.recv_timeout(Duration::from_secs(3)).is_ok());
    terminator.join().unwrap();
    assert!(driver.is_terminated());
}

#[test]
fn sink_can_terminate_the_driver() {
    let memory = Arc::new(MemoryTransport::new());
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let events = Arc::new(AtomicUsize::new(0));
    let driver = {
        let events = Arc::clone(&events);
        start_with_callback(&DriverConfig::default(), memory.clone(), move |driver, event| {
            events.fetch_add(1, Ordering::SeqCst);
            if event == SynthEvent::DoneSpeaking {
                driver.terminate();
                let _ = tx.lock().unwrap().send(());
            }
        })
    };

    driver.speak([SpeechItem::text("last words")]);
    driver.speak([SpeechItem::text("never"), SpeechItem::index(9)]);
    assert!(rx.recv_timeout(IDLE_TIMEOUT).is_ok());
    assert!(driver.wait_idle(IDLE_TIMEOUT));

    assert!(driver.is_terminated());
    assert_eq!(events.load(Ordering::SeqCst), 1);
    assert!(!memory.strings().contains(&b"never\r".to_vec()));
}

#[test]
fn pause_silences_only_when_on() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    memory.clear();

    driver.pause(false);
    assert!(memory.calls().is_empty());

    driver.pause(true);
    assert_eq!(memory.calls(), vec![TransportCall::Immediate(protocol::SILENCE)]);
}

// ── Cancel ─────────────────────────────────────────────────────────

#[test]
fn cancel_drops_queued_sequences_and_silences_once() {
    let (gated, entered) = GatedTransport::new();
    let (driver, mut rx) = start(gated.clone());
    gated.inner.clear();

    driver.speak([SpeechItem::text("block")]);
    entered.recv_timeout(IDLE_TIMEOUT).unwrap();

    driver.speak([SpeechItem::text("one")]);
    driver.speak([SpeechItem::text("two"), SpeechItem::index(7)]);
    driver.speak([SpeechItem::text("three")]);
    assert_eq!(driver.pending(), 4);

    driver.cancel();
    assert_eq!(driver.pending(), 1);

    gated.release();
    assert!(driver.wait_idle(IDLE_TIMEOUT));

    assert_eq!(gated.inner.strings(), vec![b"block\r".to_vec()]);
    assert_eq!(gated.inner.immediate_count(protocol::SILENCE), 1);
    assert_eq!(drain_events(&mut rx), vec![SynthEvent::DoneSpeaking]);
}

#[test]
fn cancel_with_empty_queue_still_silences() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    memory.clear();

    driver.cancel();
    assert_eq!(memory.immediate_count(protocol::SILENCE), 1);
}

// ── Terminate ──────────────────────────────────────────────────────

#[test]
fn no_notifications_after_terminate() {
    let (gated, entered) = GatedTransport::new();
    let config = DriverConfig {
        shutdown_timeout_ms: 50,
        ..DriverConfig::default()
    };
    let (driver, mut rx) = start_with(&config, gated.clone());

    driver.speak([SpeechItem::text("block"), SpeechItem::index(3)]);
    entered.recv_timeout(IDLE_TIMEOUT).unwrap();

    // The worker is stuck in the gated write, so the join times out.
    driver.terminate();
    assert!(driver.is_terminated());

    gated.release();
    std::thread::sleep(Duration::from_millis(100));

    assert!(drain_events(&mut rx).is_empty());
    assert_eq!(driver.last_index(), Some(IndexMark(3)));
}

#[test]
fn speak_after_terminate_is_ignored() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, mut rx) = start(memory.clone());
    driver.terminate();
    memory.clear();

    driver.speak([SpeechItem::text("too late")]);

    assert_eq!(driver.pending(), 0);
    assert!(memory.strings().is_empty());
    assert!(drain_events(&mut rx).is_empty());
}

#[test]
fn drop_terminates_driver() {
    let memory = Arc::new(MemoryTransport::new());
    let (driver, _rx) = start(memory.clone());
    memory.clear();

    drop(driver);
    assert_eq!(memory.immediate_count(protocol::SILENCE), 1);
}

// ── Readiness check ────────────────────────────────────────────────

#[test]
fn readiness_errors_count_as_not_ready() {
    let mut device = MockDevice::new();
    device
        .expect_query_ready()
        .times(1)
        .returning(|| Err(SynthError::Write("status query timed out".into())));
    assert!(!transport::is_ready(&device));

    let mut device = MockDevice::new();
    device.expect_query_ready().times(1).returning(|| Ok(false));
    assert!(!transport::is_ready(&device));

    let mut device = MockDevice::new();
    device.expect_query_ready().times(1).returning(|| Ok(true));
    assert!(transport::is_ready(&device));
}

#[test]
fn check_reports_missing_device_as_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!SynthDriver::check(dir.path().join("tripletalk0")));
}

#[test]
fn check_accepts_writable_device_node() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert!(SynthDriver::check(file.path()));
}
