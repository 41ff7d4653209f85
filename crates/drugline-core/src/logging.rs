//! Logging setup: env_logger filtering, indicatif-aware output, optional log file

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use indicatif::MultiProgress;
use log::Log;

/// ANSI color code and padded label for a log level.
fn level_style(level: log::Level, color: bool) -> (&'static str, &'static str, &'static str) {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return ("", label, "");
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    (ansi, label, "\x1b[0m")
}

/// Logger that prints through indicatif MultiProgress to avoid mixing with
/// status spinners, and mirrors every line into an optional log file.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: Option<MultiProgress>,
    file: Option<Mutex<File>>,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: Option<MultiProgress>, file: Option<File>) -> Self {
        Self {
            inner,
            multi,
            file: file.map(Mutex::new),
        }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }

        let (pre, label, post) = level_style(record.level(), self.multi.is_some());
        let line = format!("[{pre}{label}{post}] {}", record.args());
        match &self.multi {
            Some(multi) => multi.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }

        if let Some(file) = &self.file {
            let (_, label, _) = level_style(record.level(), false);
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{stamp} [{label}] {}", record.args());
            }
        }
    }

    fn flush(&self) {
        self.inner.flush();
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Initialize process-wide logging. Call once, from `main`.
///
/// `default_level` applies unless `RUST_LOG` is set. With `multi`, lines are
/// printed above the progress bars; with `log_file`, they are also appended
/// (uncolored, timestamped) to that file.
pub fn init_logging(
    default_level: &str,
    log_file: Option<&Path>,
    multi: Option<&MultiProgress>,
) -> std::io::Result<()> {
    let env = env_logger::Env::default().default_filter_or(default_level);

    if multi.is_none() && log_file.is_none() {
        // Non-TTY: no ANSI colors, plain labels for log aggregation
        env_logger::Builder::from_env(env)
            .format(|buf, record| {
                let (_, label, _) = level_style(record.level(), false);
                writeln!(buf, "[{label}] {}", record.args())
            })
            .try_init()
            .map_err(std::io::Error::other)?;
        return Ok(());
    }

    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };

    let logger = env_logger::Builder::from_env(env).build();
    let max_level = logger.filter();

    log::set_boxed_logger(Box::new(IndicatifLogger::new(
        logger,
        multi.cloned(),
        file,
    )))
    .map_err(std::io::Error::other)?;
    log::set_max_level(max_level);
    Ok(())
}
