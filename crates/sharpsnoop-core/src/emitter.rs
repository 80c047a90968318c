//! Rate limiting of snapshots on the capture's own timeline.

use sharpsnoop_decode::Timestamp;
use std::time::Duration;

/// Decides, per chip-select release, whether a snapshot is due.
///
/// The first release only opens the window. Afterwards a snapshot is due
/// whenever a release lands strictly after `next_emission_time`, which then
/// moves to that release plus the interval.
#[derive(Debug, Clone)]
pub struct SnapshotEmitter {
    next_emission_time: Option<Timestamp>,
    interval: Duration,
}

impl SnapshotEmitter {
    pub fn new(interval: Duration) -> Self {
        Self {
            next_emission_time: None,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_emission_time(&self) -> Option<Timestamp> {
        self.next_emission_time
    }

    pub fn poll(&mut self, at: Timestamp) -> bool {
        match self.next_emission_time {
            None => {
                self.next_emission_time = Some(at + self.interval);
                false
            }
            Some(next) if at > next => {
                self.next_emission_time = Some(at + self.interval);
                true
            }
            Some(_) => false,
        }
    }
}
