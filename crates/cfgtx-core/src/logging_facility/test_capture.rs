//! In-memory event capture for log assertions
//!
//! The capture is process-global, so tests sharing a binary see each
//! other's events. Narrow with `events_for(op)` plus a distinguishing field
//! such as `chain_id`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use cfgtx_core_types::schema;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, every field rendered to a string
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn from_event(event: &Event<'_>) -> Self {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        let fields = fields.0;

        Self {
            level: *event.metadata().level(),
            op: fields.get(schema::FIELD_OP).cloned(),
            event: fields.get(schema::FIELD_EVENT).cloned(),
            fields,
        }
    }
}

/// Strings pass through verbatim; everything else goes through `Debug`
#[derive(Default)]
struct FieldMap(BTreeMap<String, String>);

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    sink: Sink,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Ok(mut events) = self.sink.lock() {
            events.push(CapturedEvent::from_event(event));
        }
    }
}

/// Read handle on the captured events
#[derive(Clone, Default)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn events_for(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    pub fn count_events(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// If no event with this `op` and `event` was captured.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.events_for(op);
        assert!(
            seen.iter().any(|e| e.event.as_deref() == Some(event)),
            "no `{event}` event for op `{op}`; saw {:?}",
            seen.iter().map(|e| e.event.as_deref()).collect::<Vec<_>>()
        );
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (first call only)
///
/// If a different global subscriber is already installed, the returned
/// handle stays empty.
///
/// ```
/// use cfgtx_core::log_op_start;
/// use cfgtx_core::logging_facility::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            let layer = CaptureLayer {
                sink: Arc::clone(&capture.sink),
            };
            tracing_subscriber::registry().with(layer).try_init().ok();
            capture
        })
        .clone()
}
