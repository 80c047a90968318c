mod settings;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use settings::Settings;
use sharpsnoop_core::{
    replay, BitOrder, CaptureService, DisplayConfig, DisplaySession, ImageFileSink, Layout, NotificationLog,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Reconstructs a memory LCD's contents from a captured SPI trace.
#[derive(Debug, Parser)]
#[command(name = "sharpsnoop", version)]
struct Args {
    /// JSON Lines capture of SPI analyzer frames, `-` for stdin
    capture: PathBuf,

    /// Snapshot file; the extension picks the image format
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of line addresses
    #[arg(long)]
    lines: Option<usize>,

    /// Pixels per line
    #[arg(long)]
    bits_per_line: Option<usize>,

    /// Minimum capture time between snapshots, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Bit placement within a data byte (msb, lsb)
    #[arg(long)]
    bit_order: Option<BitOrder>,

    /// Line addresses as image columns or rows
    #[arg(long)]
    layout: Option<Layout>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every notification as a JSON line
    #[arg(long)]
    notifications: Option<PathBuf>,

    /// Write one more snapshot after the capture ends
    #[arg(long)]
    final_snapshot: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn display_config(&self) -> Result<DisplayConfig> {
        let mut config = Settings::load(self.config.as_deref())?.apply(DisplayConfig::default());
        let overrides = Settings {
            lines: self.lines,
            bits_per_line: self.bits_per_line,
            output_path: self.output.clone(),
            interval_ms: self.interval_ms,
            bit_order: self.bit_order,
            layout: self.layout,
        };
        config = overrides.apply(config);
        Ok(config)
    }

    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level())).init();

    let config = args.display_config()?;
    let mut session = DisplaySession::new(config, ImageFileSink).context("invalid display configuration")?;

    let service = if args.capture.as_os_str() == "-" {
        CaptureService::spawn(BufReader::new(std::io::stdin()))
    } else {
        CaptureService::open(&args.capture)
            .with_context(|| format!("opening capture {}", args.capture.display()))?
    };

    let mut notify_out = match &args.notifications {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => None,
    };
    let mut recent = NotificationLog::new(8);
    let mut write_failed = false;

    let summary = replay(&mut session, &service, |notification| {
        if let Some(out) = notify_out.as_mut() {
            let written = serde_json::to_writer(&mut *out, notification)
                .map_err(std::io::Error::from)
                .and_then(|()| out.write_all(b"\n"));
            if let Err(e) = written {
                if !write_failed {
                    log::error!("writing notifications: {e}");
                    write_failed = true;
                }
            }
        }
        recent.push(notification.clone());
    });

    if let Some(mut out) = notify_out {
        out.flush().context("flushing notifications")?;
    }

    if args.final_snapshot {
        session.flush().context("writing final snapshot")?;
    }

    if log::log_enabled!(log::Level::Debug) && !recent.is_empty() {
        log::debug!("last notifications:\n{}", recent.to_text(true));
    }

    let stats = session.stats();
    log::info!(
        "{} frames, {} transactions, {} snapshots -> {}",
        summary.frames,
        stats.transactions,
        stats.snapshots,
        session.config().output_path.display()
    );
    if summary.capture_errors > 0 {
        log::warn!("{} capture lines skipped", summary.capture_errors);
    }
    if stats.unknown_commands > 0 {
        log::info!("{} unrecognized command bytes ignored", stats.unknown_commands);
    }
    if stats.sink_failures > 0 {
        log::warn!("{} snapshots could not be written", stats.sink_failures);
    }

    Ok(())
}
