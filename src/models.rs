use serde_json::Value;

/// Outcome of one poll cycle. Built fresh every cycle, never retained.
#[derive(Debug, Clone)]
pub enum PollResult {
    /// 2xx response carrying a non-empty payload.
    Success { status_code: u16, payload: Payload },
    /// 2xx response whose body was blank or an empty JSON container.
    Empty { status_code: u16, payload: Payload },
    /// Connection failure, timeout, body-read failure, or non-2xx status.
    TransportError { reason: String },
}

/// Response body, parsed as JSON when possible. A body that fails to parse
/// degrades to raw text instead of failing the poll.
#[derive(Debug, Clone)]
pub enum Payload {
    Structured(Value),
    Text(String),
}

impl Payload {
    /// A blank body and an empty JSON array/object all count as "nothing
    /// there". Scalars and non-empty containers do not.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Structured(Value::Array(items)) => items.is_empty(),
            Payload::Structured(Value::Object(map)) => map.is_empty(),
            Payload::Structured(_) => false,
            Payload::Text(text) => text.is_empty(),
        }
    }

    /// Canonical string form for log lines and notification bodies.
    /// Structured payloads serialize to compact JSON; text payloads get a
    /// best-effort JSON re-parse to normalize quoting, falling back to the
    /// raw string.
    pub fn render(&self) -> String {
        match self {
            Payload::Structured(value) => value.to_string(),
            Payload::Text(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => value.to_string(),
                Err(_) => text.clone(),
            },
        }
    }
}

/// Message handed to the mailer on a rising edge.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_containers_and_blank_text_are_empty() {
        assert!(Payload::Structured(json!([])).is_empty());
        assert!(Payload::Structured(json!({})).is_empty());
        assert!(Payload::Text(String::new()).is_empty());
    }

    #[test]
    fn scalars_and_populated_containers_are_not_empty() {
        assert!(!Payload::Structured(json!({"a": 1})).is_empty());
        assert!(!Payload::Structured(json!([1, 2])).is_empty());
        assert!(!Payload::Structured(json!(0)).is_empty());
        assert!(!Payload::Structured(json!(null)).is_empty());
        assert!(!Payload::Text("plain text".into()).is_empty());
    }

    #[test]
    fn render_serializes_structured_payloads_compactly() {
        let payload = Payload::Structured(json!({"a": 1}));
        assert_eq!(payload.render(), r#"{"a":1}"#);
    }

    #[test]
    fn render_normalizes_json_text_and_keeps_raw_text() {
        assert_eq!(Payload::Text("{ \"a\" : 1 }".into()).render(), r#"{"a":1}"#);
        assert_eq!(Payload::Text("not json".into()).render(), "not json");
    }
}
