//! Feeds a capture into a display session.
//!
//! A reader thread parses the capture and hands frames over a bounded
//! channel; the session consumes them one at a time on the caller's thread.

use crate::notify::Notification;
use crate::session::DisplaySession;
use crate::sink::ImageSink;
use crossbeam_channel::{bounded, Receiver};
use sharpsnoop_decode::{CaptureError, CaptureReader, SpiFrame};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const CHANNEL_DEPTH: usize = 4096;

#[derive(Debug)]
pub enum CaptureEvent {
    Frame(SpiFrame),
    Error(CaptureError),
    Closed,
}

pub struct CaptureService {
    rx_evt: Receiver<CaptureEvent>,
}

impl CaptureService {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::spawn(BufReader::new(file)))
    }

    /// The reader thread stops on its own once the service is dropped.
    pub fn spawn<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx_evt, rx_evt) = bounded::<CaptureEvent>(CHANNEL_DEPTH);

        std::thread::spawn(move || {
            for item in CaptureReader::new(reader) {
                let event = match item {
                    Ok(frame) => CaptureEvent::Frame(frame),
                    Err(e) if e.is_recoverable() => CaptureEvent::Error(e),
                    Err(e) => {
                        let _ = tx_evt.send(CaptureEvent::Error(e));
                        break;
                    }
                };
                if tx_evt.send(event).is_err() {
                    return;
                }
            }
            let _ = tx_evt.send(CaptureEvent::Closed);
        });

        Self { rx_evt }
    }

    pub fn events(&self) -> &Receiver<CaptureEvent> {
        &self.rx_evt
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: u64,
    pub capture_errors: u64,
    pub notifications: u64,
    pub updates: u64,
}

/// Drives `session` until the capture is exhausted. Capture errors are
/// logged and skipped; the offending frame is dropped.
pub fn replay<S, F>(session: &mut DisplaySession<S>, service: &CaptureService, mut on_notification: F) -> ReplaySummary
where
    S: ImageSink,
    F: FnMut(&Notification),
{
    let mut summary = ReplaySummary::default();
    for event in service.events().iter() {
        match event {
            CaptureEvent::Frame(frame) => {
                summary.frames += 1;
                if let Some(notification) = session.handle_frame(&frame) {
                    summary.notifications += 1;
                    if notification.updated {
                        summary.updates += 1;
                    }
                    on_notification(&notification);
                }
            }
            CaptureEvent::Error(e) => {
                log::warn!("skipping capture input: {e}");
                summary.capture_errors += 1;
            }
            CaptureEvent::Closed => break,
        }
    }
    summary
}
