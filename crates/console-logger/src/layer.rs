//! tracing-subscriber layer writing to the console

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::buffer::LogBuffer;

pub struct ConsoleLayer {
    app_name: String,
    max_level: LevelFilter,
    buffer: Arc<LogBuffer>,
}

impl ConsoleLayer {
    pub fn new(app_name: &str, max_level: LevelFilter, buffer: Arc<LogBuffer>) -> Self {
        Self { app_name: app_name.to_string(), max_level, buffer }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.max_level >= *metadata.level()
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        let line = format_line(&time, metadata.level(), metadata.target(), &visitor.message, &visitor.fields);

        write_console(metadata.level(), &format!("[{}] {}", self.app_name, line));
        self.buffer.push(line);
    }
}

/// `HH:MM:SS.mmm LEVEL target: message key=value ...`
pub fn format_line(time: &str, level: &Level, target: &str, message: &str, fields: &[(String, String)]) -> String {
    let mut line = format!("{} {:>5} {}: {}", time, level.as_str(), target, message);
    for (key, value) in fields {
        let _ = write!(line, " {}={}", key, value);
    }
    line
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: &Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match *level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: &Level, line: &str) {
    eprintln!("{}", line);
}
