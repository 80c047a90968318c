//! One reconstruction run: protocol state, display memory and snapshot policy.

use crate::config::DisplayConfig;
use crate::emitter::SnapshotEmitter;
use crate::framebuffer::Framebuffer;
use crate::notify::Notification;
use crate::protocol::{Command, Effect, Protocol};
use crate::sink::{ImageFileSink, ImageSink};
use crate::DisplayError;
use sharpsnoop_decode::{SpiEvent, SpiFrame, TimeSpan, Timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events: u64,
    pub transactions: u64,
    pub bytes: u64,
    /// Bytes seen while chip select was released.
    pub ignored_bytes: u64,
    pub unknown_commands: u64,
    pub snapshots: u64,
    pub sink_failures: u64,
}

pub struct DisplaySession<S = ImageFileSink> {
    config: DisplayConfig,
    framebuffer: Framebuffer,
    protocol: Protocol,
    emitter: SnapshotEmitter,
    sink: S,
    selected: bool,
    transaction: Vec<u8>,
    stats: SessionStats,
}

impl<S: ImageSink> DisplaySession<S> {
    pub fn new(config: DisplayConfig, sink: S) -> Result<Self, DisplayError> {
        config.validate()?;
        log::info!(
            "display {}x{} -> {:?}, snapshot interval {:?}",
            config.lines,
            config.bits_per_line,
            config.output_path,
            config.emission_interval
        );
        Ok(Self {
            framebuffer: Framebuffer::new(config.lines, config.bits_per_line),
            protocol: Protocol::new(config.bit_order),
            emitter: SnapshotEmitter::new(config.emission_interval),
            sink,
            selected: false,
            transaction: Vec::new(),
            stats: SessionStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn emitter(&self) -> &SnapshotEmitter {
        &self.emitter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Reduces an analyzer frame to its event and handles it.
    pub fn handle_frame(&mut self, frame: &SpiFrame) -> Option<Notification> {
        let event = frame.event()?;
        self.handle(event, frame.span())
    }

    /// Handles one event. Only chip-select releases produce a notification.
    pub fn handle(&mut self, event: SpiEvent, span: TimeSpan) -> Option<Notification> {
        self.stats.events += 1;
        match event {
            SpiEvent::Select => {
                self.selected = true;
                None
            }
            SpiEvent::Byte(byte) => {
                if !self.selected {
                    self.stats.ignored_bytes += 1;
                    return None;
                }
                self.stats.bytes += 1;
                if log::log_enabled!(log::Level::Debug) {
                    self.transaction.push(byte);
                }
                if let Effect::Command(Command::Unknown(_)) = self.protocol.process(byte, &mut self.framebuffer) {
                    self.stats.unknown_commands += 1;
                }
                None
            }
            SpiEvent::Deselect(at) => Some(self.deselect(at, span)),
        }
    }

    fn deselect(&mut self, at: Timestamp, span: TimeSpan) -> Notification {
        self.selected = false;
        self.stats.transactions += 1;
        if !self.transaction.is_empty() {
            log::debug!("transaction ending {at}: {}", hex::encode(&self.transaction));
            self.transaction.clear();
        }

        let updated = self.emitter.poll(at) && self.persist(at);
        Notification {
            span,
            output_path: self.config.output_path.clone(),
            updated,
        }
    }

    fn persist(&mut self, at: Timestamp) -> bool {
        match self.flush() {
            Ok(()) => {
                log::debug!("snapshot at {at} written to {:?}", self.config.output_path);
                true
            }
            Err(e) => {
                log::error!("snapshot at {at} failed: {e}");
                self.stats.sink_failures += 1;
                false
            }
        }
    }

    /// Writes the current framebuffer regardless of the rate limit.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        self.sink
            .persist(&self.framebuffer, self.config.layout, &self.config.output_path)?;
        self.stats.snapshots += 1;
        Ok(())
    }
}
