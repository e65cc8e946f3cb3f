//! In-memory event capture for logging assertions
//!
//! `init_test_capture()` installs a layer that records every event's fields
//! as strings. Tests in one binary share the buffer, so filter on something
//! unique to the test: a temp path, an op name, or an operation id.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use nodestore_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP, FIELD_OP_ID};

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub op_id: Option<String>,
    /// Every field, including the four promoted above, rendered as text
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: BTreeMap<String, String>) -> Self {
        Self {
            level,
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            op_id: fields.get(FIELD_OP_ID).cloned(),
            fields,
        }
    }

    /// Look up any recorded field by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

/// Renders each field value to text; `str`, integers and bools unquoted
#[derive(Default)]
struct FieldsAsText(BTreeMap<String, String>);

impl FieldsAsText {
    fn put(&mut self, field: &Field, text: String) {
        self.0.insert(field.name().to_string(), text);
    }
}

impl Visit for FieldsAsText {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

type EventBuffer = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer(EventBuffer);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldsAsText::default();
        event.record(&mut fields);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields.0);

        // a poisoned buffer only loses events for the test that panicked
        if let Ok(mut events) = self.0.lock() {
            events.push(captured);
        }
    }
}

/// Shared handle onto the captured events
#[derive(Clone)]
pub struct TestCapture {
    events: EventBuffer,
}

impl TestCapture {
    /// Snapshot of every event captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events emitted under one operation id, in emission order
    pub fn events_for_op_id(&self, op_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op_id.as_deref() == Some(op_id))
            .collect()
    }

    /// # Panics
    ///
    /// Panics if no event has this `op` and `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no event op={} event={} among {} captured",
            op,
            event,
            events.len()
        );
    }

    pub fn count_events(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer (first call only) and return its handle
///
/// # Example
///
/// ```
/// use nodestore_core::logging_facility::test_capture::init_test_capture;
/// use nodestore_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("hydrate_docstore");
/// capture.assert_event_exists("hydrate_docstore", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let events = EventBuffer::default();
            // another global subscriber wins; captured events then stay empty
            let _ = tracing_subscriber::registry()
                .with(CaptureLayer(events.clone()))
                .try_init();
            TestCapture { events }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promoted_fields_come_from_schema_keys() {
        let mut fields = BTreeMap::new();
        fields.insert("op".to_string(), "write_docstore".to_string());
        fields.insert("event".to_string(), "end".to_string());
        fields.insert("rows".to_string(), "3".to_string());

        let event = CapturedEvent::from_fields(Level::INFO, fields);

        assert!(event.is("write_docstore", "end"));
        assert_eq!(event.field("rows"), Some("3"));
        assert_eq!(event.op_id, None);
    }
}
