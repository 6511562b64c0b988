use crate::models::{Payload, PollResult};

/// One GET against the endpoint. Never returns an error to the caller:
/// every transport-level failure collapses into `PollResult::TransportError`
/// and the loop decides what to do with it.
pub async fn fetch(client: &reqwest::Client, url: &str) -> PollResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return PollResult::TransportError { reason: e.to_string() },
    };

    // Non-2xx is a failed poll even when the body is valid JSON.
    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(e) => return PollResult::TransportError { reason: e.to_string() },
    };

    let status_code = response.status().as_u16();
    match response.text().await {
        Ok(body) => classify(status_code, &body),
        Err(e) => PollResult::TransportError { reason: e.to_string() },
    }
}

/// Buckets a response body by its parsed shape. Split out of the request
/// path so classification runs against plain strings.
pub fn classify(status_code: u16, body: &str) -> PollResult {
    let payload = match serde_json::from_str(body) {
        Ok(value) => Payload::Structured(value),
        Err(_) => Payload::Text(body.to_string()),
    };

    if payload.is_empty() {
        PollResult::Empty { status_code, payload }
    } else {
        PollResult::Success { status_code, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_json_classifies_as_success() {
        match classify(200, r#"{"a": 1}"#) {
            PollResult::Success { status_code, payload } => {
                assert_eq!(status_code, 200);
                assert_eq!(payload.render(), r#"{"a":1}"#);
            }
            other => panic!("expected Success, got {:?}", other),
        }
    }

    #[test]
    fn empty_array_and_object_classify_as_empty() {
        assert!(matches!(classify(200, "[]"), PollResult::Empty { .. }));
        assert!(matches!(classify(200, "{}"), PollResult::Empty { .. }));
    }

    #[test]
    fn blank_body_classifies_as_empty() {
        assert!(matches!(classify(200, ""), PollResult::Empty { .. }));
    }

    #[test]
    fn unparsable_body_degrades_to_text_success() {
        match classify(200, "<html>busy</html>") {
            PollResult::Success { payload: Payload::Text(text), .. } => {
                assert_eq!(text, "<html>busy</html>");
            }
            other => panic!("expected text Success, got {:?}", other),
        }
    }

    #[test]
    fn json_scalar_counts_as_non_empty() {
        assert!(matches!(classify(200, "3"), PollResult::Success { .. }));
    }
}
