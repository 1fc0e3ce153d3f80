//! Logging Infrastructure
//!
//! Structured logging for development and production:
//! - console output (pretty or JSON)
//! - daily rotating application logs, deleted after 14 days
//! - daily rotating security logs (target `security`), never deleted

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Clean up old application log files
///
/// Security logs live in their own subdirectory and are left untouched.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // app.YYYY-MM-DD (tracing-appender daily naming)
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(())
}

/// Initialize the logging system with optional daily rotating files
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"), overridden by `RUST_LOG`
/// * `json_format` - JSON console output (production) or pretty (development)
/// * `log_dir` - Optional directory for file logging
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layers = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            let app_log_dir = log_dir.join("app");
            let security_log_dir = log_dir.join("security");
            fs::create_dir_all(&app_log_dir)?;
            fs::create_dir_all(&security_log_dir)?;

            // Application logs: everything except the security target
            let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
            let app_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "security"
                }));

            // Security logs: permanent
            let security_log =
                RollingFileAppender::new(Rotation::DAILY, security_log_dir, "security");
            let security_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(security_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "security"
                }));

            tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

            Some(app_layer.and_then(security_layer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layers)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Security log helper - records security-related events on target `security`
///
/// # Examples
/// ```ignore
/// security_log!(WARN, "auth_failed", reason = "expired");
/// security_log!(WARN, "access_denied", user_id = %user.id, path = %path);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let app_dir = tmp.path().join("app");
        fs::create_dir_all(&app_dir).unwrap();

        let old = chrono::Local::now().date_naive() - chrono::Duration::days(30);
        let today = chrono::Local::now().date_naive();
        let old_file = app_dir.join(format!("app.{}", old.format("%Y-%m-%d")));
        let new_file = app_dir.join(format!("app.{}", today.format("%Y-%m-%d")));
        let other = app_dir.join("notes.txt");
        for f in [&old_file, &new_file, &other] {
            fs::write(f, b"x").unwrap();
        }

        cleanup_old_logs(tmp.path()).unwrap();

        assert!(!old_file.exists());
        assert!(new_file.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_cleanup_without_app_dir_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(cleanup_old_logs(tmp.path()).is_ok());
    }
}
