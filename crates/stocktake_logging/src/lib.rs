//! Shared logging utilities for stock-take binaries.
//!
//! Every run appends to `<home>/logs/<app>.log`; what reaches stderr depends
//! on the [`Console`] mode the command asked for.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILTER: &str = "stocktake=info,stocktake_protocol=info";
const VERBOSE_FILTER: &str = "stocktake=debug,stocktake_protocol=debug";
const KEEP_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// What the terminal sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    /// Warnings only. Used when stdout carries JSON.
    Quiet,
    /// `RUST_LOG` if set, otherwise warnings.
    Normal,
    /// Debug events from the stock-take crates.
    Verbose,
}

impl Console {
    /// `--verbose` wins over JSON output.
    pub fn from_flags(verbose: bool, json: bool) -> Self {
        match (verbose, json) {
            (true, _) => Console::Verbose,
            (false, true) => Console::Quiet,
            (false, false) => Console::Normal,
        }
    }

    fn filter(self) -> EnvFilter {
        match self {
            Console::Verbose => EnvFilter::new(VERBOSE_FILTER),
            Console::Quiet => EnvFilter::new("warn"),
            Console::Normal => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
            }
        }
    }
}

pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub console: Console,
    /// File filter used when `RUST_LOG` is unset.
    pub default_filter: Option<&'a str>,
}

/// Install the global subscriber: log file plus stderr.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_dir = ensure_logs_dir()?;
    let log_file = SizeRotatedLog::open(&log_dir, config.app_name, KEEP_LOG_FILES, MAX_LOG_FILE_SIZE)
        .with_context(|| format!("Failed to open log file in {}", log_dir.display()))?;

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.default_filter.unwrap_or(DEFAULT_LOG_FILTER))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(config.console.filter()),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Get the stock-take home directory: ~/.stocktake
///
/// Priority:
/// 1) STOCKTAKE_HOME
/// 2) the user's home directory
/// 3) ./.stocktake
pub fn stocktake_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("STOCKTAKE_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stocktake")
}

/// Get the logs directory: ~/.stocktake/logs
pub fn logs_dir() -> PathBuf {
    stocktake_home().join("logs")
}

pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Append-only log file that rolls over at a size limit.
///
/// Generation 0 is `<name>.log`, generation N is `<name>.log.N`. At most
/// `keep` generations exist; the oldest is dropped on rollover.
struct SizeRotatedLog {
    base: PathBuf,
    keep: usize,
    max_size: u64,
    file: File,
    written: u64,
}

impl SizeRotatedLog {
    fn open(dir: &Path, name: &str, keep: usize, max_size: u64) -> io::Result<Self> {
        let base = dir.join(format!("{}.log", name));
        let (file, written) = open_append(&base)?;
        let mut log = Self {
            base,
            keep: keep.max(1),
            max_size,
            file,
            written,
        };
        if log.written > log.max_size {
            log.roll_over()?;
        }
        Ok(log)
    }

    fn generation(&self, n: usize) -> PathBuf {
        if n == 0 {
            return self.base.clone();
        }
        let mut path = self.base.clone().into_os_string();
        path.push(format!(".{}", n));
        PathBuf::from(path)
    }

    fn roll_over(&mut self) -> io::Result<()> {
        self.file.flush()?;
        for n in (0..self.keep - 1).rev() {
            let from = self.generation(n);
            if from.exists() {
                fs::rename(&from, self.generation(n + 1))?;
            }
        }
        if self.keep == 1 {
            fs::remove_file(&self.base)?;
        }
        let (file, written) = open_append(&self.base)?;
        self.file = file;
        self.written = written;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<(File, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((file, size))
}

impl Write for SizeRotatedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_size {
            self.roll_over()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(dir: &TempDir, name: &str) -> String {
        fs::read_to_string(dir.path().join(name)).unwrap()
    }

    #[test]
    fn console_mode_from_flags() {
        assert_eq!(Console::from_flags(false, false), Console::Normal);
        assert_eq!(Console::from_flags(false, true), Console::Quiet);
        assert_eq!(Console::from_flags(true, true), Console::Verbose);
    }

    #[test]
    fn rolls_over_when_size_exceeded() {
        let dir = TempDir::new().unwrap();
        let mut log = SizeRotatedLog::open(dir.path(), "app", 3, 16).unwrap();

        log.write_all(b"0123456789").unwrap();
        log.write_all(b"abcdefghij").unwrap();
        log.flush().unwrap();

        assert_eq!(read(&dir, "app.log"), "abcdefghij");
        assert_eq!(read(&dir, "app.log.1"), "0123456789");
    }

    #[test]
    fn keeps_bounded_history() {
        let dir = TempDir::new().unwrap();
        let mut log = SizeRotatedLog::open(dir.path(), "app", 2, 4).unwrap();

        for chunk in [b"aaaa", b"bbbb", b"cccc", b"dddd"] {
            log.write_all(chunk).unwrap();
        }
        log.flush().unwrap();

        assert!(!dir.path().join("app.log.2").exists());
        assert_eq!(read(&dir, "app.log"), "dddd");
        assert_eq!(read(&dir, "app.log.1"), "cccc");
    }

    #[test]
    fn reopening_appends_to_current_generation() {
        let dir = TempDir::new().unwrap();
        {
            let mut log = SizeRotatedLog::open(dir.path(), "app", 3, 64).unwrap();
            log.write_all(b"first run\n").unwrap();
        }
        let mut log = SizeRotatedLog::open(dir.path(), "app", 3, 64).unwrap();
        log.write_all(b"second run\n").unwrap();
        log.flush().unwrap();

        assert_eq!(read(&dir, "app.log"), "first run\nsecond run\n");
        assert!(!dir.path().join("app.log.1").exists());
    }
}
