//! File logging for `--debug` runs. Standard output carries the graph, so
//! nothing is ever logged there.

use anyhow::{Context, Result};
use logroller::{LogRollerBuilder, Rotation, RotationAge, TimeZone};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;

use crate::config::Config;

const LOG_PREFIX: &str = "git-activity";
const KEEP_FOR: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Install the global file subscriber.
///
/// Buffered lines are flushed when the returned guard is dropped, so the
/// caller keeps it alive until the run ends.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_path).with_context(|| {
        format!(
            "Failed to create log directory: {}",
            config.log_path.display()
        )
    })?;
    cleanup_old_logs(&config.log_path)?;

    let (writer, guard) = tracing_appender::non_blocking(file_appender(&config.log_path)?);

    let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);

    // The log parser runs on its own thread; thread ids tell the two apart
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(OffsetTime::new(local_offset, time_format)),
        );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {e}"))?;

    Ok(guard)
}

/// Daily-rotated `git-activity.YYYY-MM-DD` files in local time.
fn file_appender(log_dir: &Path) -> Result<impl std::io::Write + Send + 'static> {
    LogRollerBuilder::new(log_dir, Path::new(LOG_PREFIX))
        .rotation(Rotation::AgeBased(RotationAge::Daily))
        .time_zone(TimeZone::Local)
        .max_keep_files(3)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create log roller: {e}"))
}

/// Remove `git-activity*` log files last modified more than three days ago.
pub fn cleanup_old_logs(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }
    let cutoff = SystemTime::now() - KEEP_FOR;

    for entry in fs::read_dir(log_path)? {
        let entry = entry?;
        let path = entry.path();

        let is_ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_PREFIX));
        if !is_ours || !path.is_file() {
            continue;
        }

        let stale = entry
            .metadata()
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff);
        if stale {
            let _ = fs::remove_file(&path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_file_modified_time(path: &Path, time: SystemTime) -> std::io::Result<()> {
        let since_epoch = time.duration_since(SystemTime::UNIX_EPOCH).unwrap();
        let secs = since_epoch.as_secs();
        let atime = libc::timespec {
            tv_sec: secs as libc::time_t,
            tv_nsec: 0,
        };
        let mtime = libc::timespec {
            tv_sec: secs as libc::time_t,
            tv_nsec: 0,
        };
        let times = [atime, mtime];
        let c_path = std::ffi::CString::new(path.to_str().unwrap()).unwrap();
        let ret = unsafe { libc::utimensat(libc::AT_FDCWD, c_path.as_ptr(), times.as_ptr(), 0) };
        if ret == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }

    #[test]
    fn test_cleanup_removes_old_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_path = dir.path();

        let old_file = log_path.join("git-activity.2020-01-01");
        fs::write(&old_file, "old log").unwrap();
        let four_days_ago = SystemTime::now() - Duration::from_secs(4 * 24 * 60 * 60);
        set_file_modified_time(&old_file, four_days_ago).unwrap();

        let recent_file = log_path.join("git-activity.2026-10-17");
        fs::write(&recent_file, "recent log").unwrap();

        cleanup_old_logs(log_path).unwrap();

        assert!(!old_file.exists(), "Old log file should be deleted");
        assert!(recent_file.exists(), "Recent log file should be kept");
    }

    #[test]
    fn test_cleanup_ignores_non_git_activity_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_path = dir.path();

        let other_file = log_path.join("other-app.log");
        fs::write(&other_file, "other log").unwrap();
        let four_days_ago = SystemTime::now() - Duration::from_secs(4 * 24 * 60 * 60);
        set_file_modified_time(&other_file, four_days_ago).unwrap();

        cleanup_old_logs(log_path).unwrap();

        assert!(other_file.exists(), "Files of other programs should be kept");
    }

    #[test]
    fn test_cleanup_nonexistent_dir() {
        let result = cleanup_old_logs(Path::new("/tmp/nonexistent_git_activity_log_dir"));
        assert!(result.is_ok(), "Should return Ok for nonexistent directory");
    }

    #[test]
    fn test_cleanup_empty_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = cleanup_old_logs(dir.path());
        assert!(result.is_ok(), "Should return Ok for empty directory");
    }

    #[test]
    fn test_cleanup_ignores_subdirectories() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_path = dir.path();

        let subdir = log_path.join("git-activity.subdir");
        fs::create_dir(&subdir).unwrap();

        cleanup_old_logs(log_path).unwrap();

        assert!(subdir.exists(), "Subdirectory should not be deleted");
    }
}
