use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields the browser client may send. Everything is optional; missing or
/// malformed values degrade to defaults instead of rejecting the event.
#[derive(Debug, Default, Deserialize)]
pub struct EventBody {
    pub event_name: Option<String>,
    pub event_source_url: Option<String>,
    pub event_id: Option<String>,
    pub custom_data: Option<Value>,
    pub test_event_code: Option<String>,
}

impl EventBody {
    /// Lenient decode of the raw request body. The tracking client fires and
    /// forgets, so bad input is never an error: a JSON object is used as-is, a
    /// JSON-encoded string is unwrapped and parsed again, and anything else
    /// (including malformed JSON) yields all-default fields.
    pub fn parse_lenient(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            Ok(Value::String(inner)) => serde_json::from_str(&inner).unwrap_or_default(),
            _ => EventBody::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub client_ip_address: String,
    pub client_user_agent: String,
}

/// One conversion event in the shape the Graph events endpoint expects.
/// Built per request and discarded after the upstream round trip.
#[derive(Debug, Serialize)]
pub struct ConversionEvent {
    pub event_name: String,
    pub event_time: i64,
    pub action_source: &'static str,
    pub event_source_url: String,
    pub event_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
    pub user_data: UserData,
}

impl ConversionEvent {
    /// `event_time` is always the server clock; a caller-supplied value is
    /// ignored so the upstream platform cannot be fed stale timestamps.
    /// Empty strings count as absent, matching the pixel clients that send
    /// `""` for fields they could not resolve.
    pub fn new(body: &EventBody, client_ip: String, user_agent: String, referer: String) -> Self {
        let now = Utc::now();
        Self {
            event_name: body
                .event_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "PageView".into()),
            event_time: now.timestamp(),
            action_source: "website",
            event_source_url: body
                .event_source_url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or(referer),
            event_id: body
                .event_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("evt_{}", now.timestamp_millis())),
            // passed through unvalidated, but only when it is object-shaped
            custom_data: body.custom_data.clone().filter(|v| v.is_object()),
            user_data: UserData {
                client_ip_address: client_ip,
                client_user_agent: user_agent,
            },
        }
    }
}

/// Outbound envelope: a single-event batch plus the optional sandbox code.
#[derive(Debug, Serialize)]
pub struct CapiPayload {
    pub data: Vec<ConversionEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_event_code: Option<String>,
}
