use crate::config::Config;
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

static LOGGER: Lazy<SmartLogger> = Lazy::new(SmartLogger::new);
static INSTALLED: OnceCell<()> = OnceCell::new();

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

/// Installs the logger, or reconfigures it if it is already installed.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    LOGGER.update_config(config.clone())?;

    INSTALLED.get_or_try_init(|| {
        log::set_logger(&*LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))
    })?;

    log::set_max_level(config.min_level.to_level_filter());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

/// One emitted record, also the JSON line format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub target: String,
    pub file: String,
    pub line: u32,
    pub thread_id: String,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: record.level().into(),
            message: record.args().to_string(),
            target: record.target().to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
            thread_id: format!("{:?}", std::thread::current().id()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_thread_id: bool,
    pub show_file_location: bool,
    pub show_target: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
    /// Restricts output to targets under these prefixes; empty means all.
    pub target_prefixes: Vec<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_thread_id: false,
            show_file_location: false,
            show_target: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
            target_prefixes: vec!["smartmatch".to_string()],
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_file_path = Some(path.to_string());
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    /// Also show records from dependencies (reqwest, hyper, aws-*).
    pub fn with_all_targets(mut self) -> Self {
        self.target_prefixes.clear();
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_emojis: true,
            show_file_location: true,
            ..Default::default()
        }
    }

    fn accepts_target(&self, target: &str) -> bool {
        self.target_prefixes.is_empty()
            || self
                .target_prefixes
                .iter()
                .any(|prefix| target.starts_with(prefix.as_str()))
    }
}

/// `log` backend writing colored lines or JSON to stderr, optionally
/// mirrored to a file.
pub struct SmartLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl SmartLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) -> Result<(), String> {
        let file = match &new_config.log_file_path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| format!("Failed to open log file {}: {}", path, e))?,
            ),
            None => None,
        };

        *relock(&self.log_file) = file;
        *relock(&self.config) = new_config;
        Ok(())
    }

    fn format_line(entry: &LogEntry, config: &LoggerConfig) -> String {
        let mut output = String::new();

        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        if config.show_colors {
            output.push_str(&format!("{} ", timestamp.bright_black()));
        } else {
            output.push_str(&format!("{} ", timestamp));
        }

        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };
        if config.show_colors {
            output.push_str(&format!("[{}] ", level.color(entry.level.color()).bold()));
        } else {
            output.push_str(&format!("[{}] ", level));
        }

        if config.show_target && !entry.target.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}: ", entry.target.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", entry.target));
            }
        }

        output.push_str(&entry.message);

        if config.show_thread_id {
            output.push_str(&format!(" [thread:{}]", entry.thread_id));
        }

        if config.show_file_location {
            let location = format!("({}:{})", entry.file, entry.line);
            if config.show_colors {
                output.push_str(&format!(" {}", location.bright_black()));
            } else {
                output.push_str(&format!(" {}", location));
            }
        }

        output
    }

    fn render(entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            serde_json::to_string(entry).unwrap_or_default()
        } else {
            Self::format_line(entry, config)
        }
    }
}

impl log::Log for SmartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let config = relock(&self.config);
        metadata.level() <= config.min_level.to_level() && config.accepts_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        let config = relock(&self.config).clone();

        eprintln!("{}", Self::render(&entry, &config));

        if let Some(file) = relock(&self.log_file).as_mut() {
            // files never get ANSI colors
            let plain = LoggerConfig {
                show_colors: false,
                ..config
            };
            let _ = writeln!(file, "{}", Self::render(&entry, &plain));
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Some(file) = relock(&self.log_file).as_mut() {
            let _ = file.flush();
        }
    }
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Logs how long a pipeline stage took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  '{}' took {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_startup_info(app_name: &str, version: &str, config: &Config) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("⚙️  Provider: {}", config.provider);
    if let Some(gemini) = &config.gemini {
        log::info!(
            "   Gemini API key: {}",
            if gemini.api_key.is_some() { "✅" } else { "❌" }
        );
    }
    if let Some(bedrock) = &config.bedrock {
        log::info!(
            "   AWS region: {}",
            bedrock.region.as_deref().unwrap_or(crate::bedrock::DEFAULT_REGION)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry {
            id: "id".into(),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            target: "smartmatch::pipeline".into(),
            file: "src/pipeline.rs".into(),
            line: 42,
            thread_id: "ThreadId(1)".into(),
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!(LogLevel::from(Level::Warn), LogLevel::Warn);
    }

    #[test]
    fn test_logger_config_presets() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn test_plain_line_format() {
        let config = LoggerConfig::new().with_colors(false);
        let line = SmartLogger::format_line(&entry(LogLevel::Warn, "slow render"), &config);
        assert!(line.ends_with("[⚠️ WARN] smartmatch::pipeline: slow render"));
    }

    #[test]
    fn test_json_line_format() {
        let config = LoggerConfig::production();
        let line = SmartLogger::render(&entry(LogLevel::Info, "done"), &config);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["message"], "done");
        assert_eq!(value["level"], "Info");
    }

    #[test]
    fn test_target_filter() {
        let config = LoggerConfig::default();
        assert!(config.accepts_target("smartmatch::session"));
        assert!(!config.accepts_target("hyper::proto"));
        assert!(LoggerConfig::default().with_all_targets().accepts_target("hyper::proto"));
    }

    #[test]
    fn test_init_is_repeatable_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartmatch.log");
        let config = LoggerConfig::new()
            .with_colors(false)
            .with_file_output(path.to_str().unwrap());

        assert!(init_with_config(config.clone()).is_ok());
        assert!(init_with_config(config).is_ok());

        log::warn!("written to file");
        LOGGER.flush();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("written to file"));

        init().unwrap();
    }
}
