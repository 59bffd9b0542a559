//! Console Logger
//!
//! `tracing` output for the browser: every event goes to the devtools console
//! with the matching console method, and the last N formatted lines are kept
//! in memory so they can be shown or copied from inside the app.

mod buffer;
mod layer;

pub use buffer::LogBuffer;
pub use layer::{format_line, ConsoleLayer};

use std::sync::{Arc, OnceLock};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

static BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Install the console layer as the global subscriber
pub fn init_logger(app_name: &str, capacity: usize) -> Result<(), LoggerError> {
    init_with_level(app_name, capacity, LevelFilter::DEBUG)
}

pub fn init_with_level(app_name: &str, capacity: usize, max_level: LevelFilter) -> Result<(), LoggerError> {
    let buffer = Arc::new(LogBuffer::new(capacity));
    BUFFER.set(buffer.clone()).map_err(|_| LoggerError::AlreadyInitialized)?;

    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(app_name, max_level, buffer));
    tracing::subscriber::set_global_default(subscriber).map_err(|e| LoggerError::Install(e.to_string()))?;

    tracing::info!(app = app_name, capacity, "logger initialized");
    Ok(())
}

/// Most recent formatted lines, oldest first
pub fn recent_lines() -> Vec<String> {
    BUFFER.get().map(|buffer| buffer.lines()).unwrap_or_default()
}

pub fn info(message: &str) {
    tracing::info!("{}", message);
}

pub fn error(message: &str) {
    tracing::error!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_once_and_capture() {
        init_logger("TaskHubTest", 16).expect("first init");
        assert!(matches!(init_logger("TaskHubTest", 16), Err(LoggerError::AlreadyInitialized)));

        error("socket gave up");
        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.contains("logger initialized")));
        assert!(lines.iter().any(|l| l.contains("ERROR") && l.contains("socket gave up")));
    }
}
