// ============================================================================
// vidbatch-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatcher for Console and Run Log File
//
// Console output carries the styled terminal lines as-is. The optional run
// log file receives the same records with a timestamp and level, and with
// ANSI styling stripped. Encoder chatter under the `ffmpeg_log` target only
// reaches the console in verbose mode.
//
// The run log file is created lazily. Records are held in memory until the
// caller opens it, so a run that fails its preconditions leaves nothing on
// disk.
//
// The level is info by default and debug with --verbose.

use crate::error::CliResult;

use log::LevelFilter;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("vidbatch_run_{}.log", vidbatch_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("vidbatch_run_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the run log inside `log_dir`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("vidbatch_run_{}.log", get_timestamp()))
}

/// Formats a record for the log file: timestamp, level, target, plain text.
fn file_line(level: log::Level, target: &str, message: &str) -> String {
    format!(
        "[{} {:<5} {}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        level,
        target,
        strip_ansi_escapes::strip_str(message)
    )
}

enum RunLogState {
    Pending(Vec<u8>),
    Open(File),
    Disabled,
}

fn lock(state: &Mutex<RunLogState>) -> io::Result<MutexGuard<'_, RunLogState>> {
    state
        .lock()
        .map_err(|_| io::Error::other("run log state poisoned"))
}

/// Run log file that buffers records until [`RunLogFile::open`] is called.
#[derive(Clone)]
pub struct RunLogFile {
    path: PathBuf,
    state: Arc<Mutex<RunLogState>>,
}

impl RunLogFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Arc::new(Mutex::new(RunLogState::Pending(Vec::new()))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writer handed to the logger. Shares state with `self`.
    pub fn writer(&self) -> RunLogWriter {
        RunLogWriter(Arc::clone(&self.state))
    }

    /// Creates the log directory and file, then writes out the buffered
    /// records. Opening an already open file is a no-op.
    ///
    /// On failure the buffer is dropped and later records are discarded.
    pub fn open(&self) -> CliResult<()> {
        let mut state = lock(&self.state)?;
        let RunLogState::Pending(pending) = &mut *state else {
            return Ok(());
        };
        let pending = mem::take(pending);

        match create_log_file(&self.path, &pending) {
            Ok(file) => {
                *state = RunLogState::Open(file);
                Ok(())
            }
            Err(e) => {
                *state = RunLogState::Disabled;
                Err(e.into())
            }
        }
    }
}

fn create_log_file(path: &Path, pending: &[u8]) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(pending)?;
    Ok(file)
}

/// `Write` end of a [`RunLogFile`].
pub struct RunLogWriter(Arc<Mutex<RunLogState>>);

impl Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *lock(&self.0)? {
            RunLogState::Pending(pending) => {
                pending.extend_from_slice(buf);
                Ok(buf.len())
            }
            RunLogState::Open(file) => file.write(buf),
            RunLogState::Disabled => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *lock(&self.0)? {
            RunLogState::Open(file) => file.flush(),
            RunLogState::Pending(_) | RunLogState::Disabled => Ok(()),
        }
    }
}

/// Opens the run log, or disables it with a warning when it cannot be
/// created.
pub fn start_run_log(run_log: &RunLogFile) {
    match run_log.open() {
        Ok(()) => log::debug!("Writing run log to {}", run_log.path().display()),
        Err(e) => log::warn!("Run log file {} disabled: {e}", run_log.path().display()),
    }
}

/// Installs the global logger.
///
/// Records for `run_log` are buffered until it is opened with
/// [`start_run_log`].
pub fn init_logging(verbose: bool, run_log: Option<&RunLogFile>) -> CliResult<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let encoder_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let console = fern::Dispatch::new()
        .format(|out, message, record| match record.level() {
            log::Level::Info => out.finish(format_args!("{message}")),
            level => out.finish(format_args!("{level}: {message}")),
        })
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .level_for("ffmpeg_log", encoder_level)
        .chain(console);

    if let Some(run_log) = run_log {
        let writer: Box<dyn Write + Send> = Box::new(run_log.writer());
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                let text = message.to_string();
                out.finish(format_args!(
                    "{}",
                    file_line(record.level(), record.target(), &text)
                ))
            })
            .chain(writer);
        dispatch = dispatch.chain(file);
    }

    dispatch
        .apply()
        .map_err(|e| io::Error::other(format!("Failed to initialize logging: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_timestamp_format() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_run_log_path() {
        let path = run_log_path(Path::new("/out/logs"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("vidbatch_run_"));
        assert!(name.ends_with(".log"));
        assert_eq!(path.parent(), Some(Path::new("/out/logs")));
    }

    #[test]
    fn test_file_line_strips_ansi() {
        let line = file_line(log::Level::Warn, "vidbatch", "\u{1b}[33mcareful\u{1b}[0m");
        assert!(line.ends_with("] careful"));
        assert!(line.contains("WARN"));
    }

    #[test]
    fn test_run_log_buffers_until_opened() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("run.log");
        let run_log = RunLogFile::new(path.clone());
        let mut writer = run_log.writer();

        writer.write_all(b"before\n").unwrap();
        assert!(!path.exists());

        run_log.open().unwrap();
        writer.write_all(b"after\n").unwrap();
        run_log.open().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "before\nafter\n");
    }

    #[test]
    fn test_unopened_run_log_creates_nothing() {
        let dir = tempdir().unwrap();
        let run_log = RunLogFile::new(dir.path().join("logs").join("run.log"));
        run_log.writer().write_all(b"precondition failed\n").unwrap();
        drop(run_log);

        assert!(!dir.path().join("logs").exists());
    }

    #[test]
    fn test_run_log_open_failure_discards_records() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let run_log = RunLogFile::new(blocker.join("run.log"));
        let mut writer = run_log.writer();

        assert!(run_log.open().is_err());
        writer.write_all(b"dropped\n").unwrap();
        assert!(!blocker.join("run.log").exists());
    }
}
