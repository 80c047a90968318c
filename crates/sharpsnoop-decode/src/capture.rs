//! JSON Lines capture reader.
//!
//! One analyzer frame per line. Blank lines and `#` comments are skipped.

use crate::{FrameType, SpiFrame, Timestamp};
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: result frame without a mosi byte")]
    MissingMosi { line: usize },
    #[error("line {line}: frame starts at {current}, before the previous frame at {previous}")]
    OutOfOrder {
        line: usize,
        previous: Timestamp,
        current: Timestamp,
    },
}

impl CaptureError {
    /// Whether the reader can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CaptureError::Io(_))
    }
}

pub struct CaptureReader<R> {
    inner: R,
    line: usize,
    last_start: Option<Timestamp>,
    buf: String,
}

impl<R: BufRead> CaptureReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            last_start: None,
            buf: String::new(),
        }
    }

    /// 1-based number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    fn check(&mut self, frame: &SpiFrame) -> Result<(), CaptureError> {
        if frame.kind == FrameType::Result && frame.mosi.is_none() {
            return Err(CaptureError::MissingMosi { line: self.line });
        }
        if let Some(previous) = self.last_start {
            if frame.start_time < previous {
                return Err(CaptureError::OutOfOrder {
                    line: self.line,
                    previous,
                    current: frame.start_time,
                });
            }
        }
        self.last_start = Some(frame.start_time);
        Ok(())
    }
}

impl<R: BufRead> Iterator for CaptureReader<R> {
    type Item = Result<SpiFrame, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.inner.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let frame = match serde_json::from_str::<SpiFrame>(text) {
                Ok(frame) => frame,
                Err(source) => {
                    return Some(Err(CaptureError::Parse {
                        line: self.line,
                        source,
                    }))
                }
            };
            return Some(self.check(&frame).map(|()| frame));
        }
    }
}
