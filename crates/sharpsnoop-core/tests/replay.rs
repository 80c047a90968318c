use sharpsnoop_core::{
    replay, CaptureService, DisplayConfig, DisplayError, DisplaySession, Framebuffer, ImageFileSink, ImageSink,
    Layout, Mode,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Default)]
struct RecordingSink {
    images: Vec<image::GrayImage>,
}

impl ImageSink for RecordingSink {
    fn persist(&mut self, fb: &Framebuffer, layout: Layout, _path: &Path) -> Result<(), DisplayError> {
        self.images.push(fb.render(layout));
        Ok(())
    }
}

fn frame(kind: &str, t: f64, mosi: Option<u8>) -> String {
    match mosi {
        Some(b) => format!(r#"{{"type":"{kind}","start_time":{t},"end_time":{t},"mosi":{b}}}"#),
        None => format!(r#"{{"type":"{kind}","start_time":{t},"end_time":{t}}}"#),
    }
}

fn transaction(lines: &mut Vec<String>, t: f64, bytes: &[u8]) {
    lines.push(frame("enable", t, None));
    for &b in bytes {
        lines.push(frame("result", t, Some(b)));
    }
    lines.push(frame("disable", t, None));
}

/// Warm-up transaction at 0s, then the 4x8 write scenario at 1s.
fn write_scenario() -> String {
    let mut lines = Vec::new();
    transaction(&mut lines, 0.0, &[0x02]);
    transaction(&mut lines, 1.0, &[0x01, 0x00, 0b1011_0000, 0x00, 0x00]);
    lines.join("\n")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sharpsnoop-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_replay_end_to_end() {
    let config = DisplayConfig::new(4, 8, "frame.png").with_interval_ms(10);
    let mut session = DisplaySession::new(config, RecordingSink::default()).unwrap();
    let service = CaptureService::spawn(Cursor::new(write_scenario().into_bytes()));

    let mut seen = Vec::new();
    let summary = replay(&mut session, &service, |n| seen.push(n.updated));

    assert_eq!(seen, vec![false, true]);
    assert_eq!(summary.frames, 10);
    assert_eq!(summary.notifications, 2);
    assert_eq!(summary.updates, 1);
    assert_eq!(summary.capture_errors, 0);
    assert_eq!(session.protocol().mode(), Mode::Static);

    let image = &session.sink().images[0];
    assert_eq!(image.dimensions(), (4, 8));
    let column0: Vec<u8> = (0..8).map(|y| image.get_pixel(0, y).0[0]).collect();
    assert_eq!(column0, vec![255, 0, 255, 255, 0, 0, 0, 0]);
    for x in 1..4 {
        assert!((0..8).all(|y| image.get_pixel(x, y).0[0] == 0));
    }
}

#[test]
fn test_replay_skips_bad_lines() {
    let capture = format!("{}\nnot json\n{}", frame("enable", 0.0, None), frame("disable", 0.5, None));
    let config = DisplayConfig::new(4, 8, "frame.png");
    let mut session = DisplaySession::new(config, RecordingSink::default()).unwrap();
    let service = CaptureService::spawn(Cursor::new(capture.into_bytes()));

    let summary = replay(&mut session, &service, |_| {});
    assert_eq!(summary.capture_errors, 1);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.notifications, 1);
}

#[test]
fn test_image_file_sink_writes_png() {
    let dir = scratch_dir("sink");
    let output = dir.join("display.png");
    let config = DisplayConfig::new(4, 8, &output).with_interval_ms(10);
    let mut session = DisplaySession::new(config, ImageFileSink).unwrap();
    let service = CaptureService::spawn(Cursor::new(write_scenario().into_bytes()));

    replay(&mut session, &service, |_| {});

    let image = image::open(&output).unwrap().into_luma8();
    assert_eq!(image.dimensions(), (4, 8));
    assert_eq!(image.get_pixel(0, 0).0, [255]);
    assert_eq!(image.get_pixel(0, 1).0, [0]);
    assert_eq!(image.get_pixel(3, 7).0, [0]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_open_missing_capture_fails() {
    assert!(CaptureService::open(Path::new("/no/such/capture.jsonl")).is_err());
}
