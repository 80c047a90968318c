use serde::Serialize;
use sharpsnoop_decode::TimeSpan;
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

/// Raised for every chip-select release: the output file may have changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub span: TimeSpan,
    pub output_path: PathBuf,
    /// Whether a snapshot was written for this release.
    pub updated: bool,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpdatedFile: {}, Path: {}", self.updated, self.output_path.display())
    }
}

/// Most recent notifications, oldest evicted first.
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    max_entries: usize,
}

impl NotificationLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.entries.push_back(notification);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn updated_count(&self) -> usize {
        self.entries.iter().filter(|n| n.updated).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_text(&self, show_timestamp: bool) -> String {
        let mut result = String::new();
        for entry in &self.entries {
            if show_timestamp {
                result.push_str(&format!("[{:>14.9}] ", entry.span.start.as_secs_f64()));
            }
            result.push_str(&entry.to_string());
            result.push('\n');
        }
        result
    }

    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut result = String::new();
        for entry in &self.entries {
            result.push_str(&serde_json::to_string(entry)?);
            result.push('\n');
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpsnoop_decode::Timestamp;

    fn note(ms: u64, updated: bool) -> Notification {
        Notification {
            span: TimeSpan::at(Timestamp::from_millis(ms)),
            output_path: PathBuf::from("out.png"),
            updated,
        }
    }

    #[test]
    fn test_display_format() {
        assert_eq!(note(0, true).to_string(), "UpdatedFile: true, Path: out.png");
    }

    #[test]
    fn test_bounded_log_evicts_oldest() {
        let mut log = NotificationLog::new(2);
        log.push(note(1, true));
        log.push(note(2, false));
        log.push(note(3, true));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries().next().unwrap().span.start, Timestamp::from_millis(2));
        assert_eq!(log.updated_count(), 1);
    }

    #[test]
    fn test_text_and_json() {
        let mut log = NotificationLog::new(8);
        log.push(note(1500, false));
        assert_eq!(log.to_text(false), "UpdatedFile: false, Path: out.png\n");
        assert!(log.to_text(true).starts_with("[   1.500000000] "));

        let json = log.to_json_lines().unwrap();
        let value: serde_json::Value = serde_json::from_str(json.trim()).unwrap();
        assert_eq!(value["updated"], false);
        assert_eq!(value["output_path"], "out.png");
        assert_eq!(value["span"]["start"], 1.5);
    }
}
