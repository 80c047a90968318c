//! Core functionalities: display memory, protocol state machine, snapshot
//! policy, capture replay.

pub mod config;
pub mod emitter;
pub mod error;
pub mod framebuffer;
pub mod notify;
pub mod protocol;
pub mod replay;
pub mod session;
pub mod sink;

pub use config::{BitOrder, DisplayConfig, Layout, MAX_DIMENSION};
pub use emitter::SnapshotEmitter;
pub use error::DisplayError;
pub use framebuffer::{unpack_bits, Framebuffer};
pub use notify::{Notification, NotificationLog};
pub use protocol::{Command, Effect, Mode, Protocol, WritePhase};
pub use replay::{replay, CaptureEvent, CaptureService, ReplaySummary};
pub use session::{DisplaySession, SessionStats};
pub use sink::{ImageFileSink, ImageSink};
