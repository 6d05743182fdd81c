//! Browser console output for `tracing` events
//!
//! Installs a `tracing-subscriber` registry with a layer that forwards each
//! event to the matching `console` method.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Layer writing events to the browser console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLayer;

#[derive(Default)]
struct ConsoleVisitor {
    message: String,
    fields: String,
}

impl Visit for ConsoleVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Render an event as a single console line.
fn format_line(target: &str, message: &str, fields: &str) -> String {
    format!("[sitemotion] {target}: {message}{fields}")
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = ConsoleVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let line = JsValue::from_str(&format_line(
            metadata.target(),
            &visitor.message,
            &visitor.fields,
        ));
        match *metadata.level() {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            Level::DEBUG => console::debug_1(&line),
            _ => console::log_1(&line),
        }
    }
}

/// Install the console subscriber at `level` (`warn` if unparseable).
///
/// A second call, or a host that installed its own subscriber, is a no-op.
pub fn init(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    if tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer)
        .try_init()
        .is_err()
    {
        console::debug_1(&JsValue::from_str(
            "[sitemotion] tracing subscriber already installed",
        ));
    }
}
