use chat_widget_protocol::{ExchangeRequest, MessageEntry, iso8601};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    message: String,
    #[serde(with = "iso8601")]
    timestamp: DateTime<Utc>,
    history: Vec<MessageEntry>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ExchangeRequest) -> ChatRequest {
    ChatRequest {
        message: req.message.clone(),
        timestamp: req.timestamp,
        history: req.history.clone(),
    }
}

/// Picks the reply text out of a response body.
///
/// Fields are checked in the given order; a field counts only when it
/// holds a non-empty string.
pub fn extract_reply(body: &Value, fields: &[String]) -> Option<String> {
    let object = body.as_object()?;
    fields
        .iter()
        .filter_map(|field| object.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use chat_widget_protocol::Sender;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::config::DEFAULT_REPLY_FIELDS;

    fn default_fields() -> Vec<String> {
        DEFAULT_REPLY_FIELDS.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_create_request() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let request = ExchangeRequest {
            message: "Where is my order?".to_owned(),
            timestamp: ts,
            history: vec![
                MessageEntry::with_timestamp("Hi there!", Sender::Bot, ts),
                MessageEntry::with_timestamp(
                    "Where is my order?",
                    Sender::User,
                    ts,
                ),
            ],
        };
        assert_eq!(
            serde_json::to_value(create_request(&request)).unwrap(),
            json!({
                "message": "Where is my order?",
                "timestamp": "2024-03-01T12:00:00.000Z",
                "history": [
                    {
                        "message": "Hi there!",
                        "isUser": false,
                        "timestamp": "2024-03-01T12:00:00.000Z"
                    },
                    {
                        "message": "Where is my order?",
                        "isUser": true,
                        "timestamp": "2024-03-01T12:00:00.000Z"
                    }
                ]
            })
        );
    }

    #[test]
    fn test_extract_reply_priority() {
        let fields = default_fields();
        let body = json!({ "reply": "c", "message": "b", "response": "a" });
        assert_eq!(extract_reply(&body, &fields).as_deref(), Some("a"));

        let body = json!({ "reply": "c", "message": "b" });
        assert_eq!(extract_reply(&body, &fields).as_deref(), Some("b"));

        let body = json!({ "reply": "hi" });
        assert_eq!(extract_reply(&body, &fields).as_deref(), Some("hi"));
    }

    #[test]
    fn test_extract_reply_skips_unpopulated() {
        let fields = default_fields();
        let body = json!({ "response": "", "message": null, "reply": "ok" });
        assert_eq!(extract_reply(&body, &fields).as_deref(), Some("ok"));

        let body = json!({ "response": 42, "status": "ok" });
        assert_eq!(extract_reply(&body, &fields), None);

        assert_eq!(extract_reply(&json!(["response"]), &fields), None);
        assert_eq!(extract_reply(&json!("plain"), &fields), None);
    }

    #[test]
    fn test_extract_reply_custom_order() {
        let fields = vec!["answer".to_owned(), "reply".to_owned()];
        let body = json!({ "response": "ignored", "reply": "used" });
        assert_eq!(extract_reply(&body, &fields).as_deref(), Some("used"));
    }
}
