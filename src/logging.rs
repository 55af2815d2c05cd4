// Copyright (c) 2026 rezky_nightky

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

/// Appends log lines to a file. The terminal is in the alternate screen
/// while the effect runs, so nothing is ever logged to stdout or stderr.
struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
    start: Instant,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.start.elapsed();
        if let Ok(mut f) = self.file.lock() {
            let _ = writeln!(
                f,
                "{:>6}.{:03} {:<5} {}: {}",
                elapsed.as_secs(),
                elapsed.subsec_millis(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut f) = self.file.lock() {
            let _ = f.flush();
        }
    }
}

pub fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("invalid log level: {} (off, error, warn, info, debug, trace)", s))
}

/// Installs the file logger. Without a path logging stays disabled.
pub fn init(path: Option<&Path>, level: LevelFilter) -> io::Result<()> {
    let Some(path) = path else {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let logger = FileLogger {
        file: Mutex::new(file),
        level,
        start: Instant::now(),
    };
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

pub fn flush() {
    log::logger().flush();
}
