//! SPI analyzer frames and the events the display protocol consumes.

use crate::{TimeSpan, Timestamp};
use serde::{Deserialize, Serialize};

/// Frame kinds emitted by an SPI analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameType {
    /// Chip select asserted.
    Enable,
    /// Chip select released.
    Disable,
    /// One byte clocked while selected.
    Result,
    /// Analyzer-side framing error; carries no byte.
    Error,
}

/// One exported analyzer frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiFrame {
    #[serde(rename = "type")]
    pub kind: FrameType,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mosi: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miso: Option<u8>,
}

/// Chip-select gated events, in the order the display controller saw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiEvent {
    Select,
    Deselect(Timestamp),
    Byte(u8),
}

impl SpiFrame {
    pub fn enable(at: Timestamp) -> Self {
        Self::new(FrameType::Enable, TimeSpan::at(at), None)
    }

    pub fn disable(span: TimeSpan) -> Self {
        Self::new(FrameType::Disable, span, None)
    }

    pub fn byte(span: TimeSpan, mosi: u8) -> Self {
        Self::new(FrameType::Result, span, Some(mosi))
    }

    fn new(kind: FrameType, span: TimeSpan, mosi: Option<u8>) -> Self {
        Self {
            kind,
            start_time: span.start,
            end_time: span.end,
            mosi,
            miso: None,
        }
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    /// Reduces the frame to a protocol event. Error frames and result frames
    /// without a MOSI byte produce nothing.
    pub fn event(&self) -> Option<SpiEvent> {
        match self.kind {
            FrameType::Enable => Some(SpiEvent::Select),
            FrameType::Disable => Some(SpiEvent::Deselect(self.end_time)),
            FrameType::Result => self.mosi.map(SpiEvent::Byte),
            FrameType::Error => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_uses_end_time() {
        let span = TimeSpan::new(Timestamp::from_millis(3), Timestamp::from_millis(4));
        assert_eq!(
            SpiFrame::disable(span).event(),
            Some(SpiEvent::Deselect(Timestamp::from_millis(4)))
        );
    }

    #[test]
    fn test_result_without_mosi_is_dropped() {
        let mut frame = SpiFrame::byte(TimeSpan::default(), 0x01);
        assert_eq!(frame.event(), Some(SpiEvent::Byte(0x01)));
        frame.mosi = None;
        assert_eq!(frame.event(), None);
    }

    #[test]
    fn test_parse_exported_frame() {
        let frame: SpiFrame =
            serde_json::from_str(r#"{"type":"result","start_time":0.25,"end_time":0.2500001,"mosi":128,"miso":0}"#)
                .unwrap();
        assert_eq!(frame.kind, FrameType::Result);
        assert_eq!(frame.start_time, Timestamp::from_millis(250));
        assert_eq!(frame.event(), Some(SpiEvent::Byte(0x80)));
        assert_eq!(frame.miso, Some(0));
    }
}
