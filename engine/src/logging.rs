use tracing::{Event, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::Context, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "warn,wheel_engine=info,wheel_shared=info,wheel_demo=info";

#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0.push_str(&format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

/// Formats an event as one line with a local timestamp and a level marker. Records
/// bridged from the `log` facade keep their original target.
fn render(event: &Event<'_>) -> Option<String> {
    let normalized = event.normalized_metadata();
    let metadata = normalized.as_ref().unwrap_or_else(|| event.metadata());

    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    if visitor.0.is_empty() {
        return None;
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let target = metadata.target();
    match metadata.level().as_str() {
        "ERROR" => Some(format!("[{}] ❌ Error: {} - {}", timestamp, target, visitor.0)),
        "WARN" => Some(format!("[{}] ⚠️ Warning: {} - {}", timestamp, target, visitor.0)),
        "INFO" => Some(format!("[{}] ℹ️ {} - {}", timestamp, target, visitor.0)),
        "DEBUG" => Some(format!("[{}] 🔄 {} - {}", timestamp, target, visitor.0)),
        _ => None,
    }
}

struct WheelLayer;

impl<S: Subscriber> Layer<S> for WheelLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Some(line) = render(event) {
            eprintln!("{}", line);
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter; records
/// emitted through the `log` facade are routed here as well.
pub fn setup() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    Registry::default().with(env_filter).with(WheelLayer).try_init()
}
