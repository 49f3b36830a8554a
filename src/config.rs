use std::env;

pub const GRAPH_VERSION: &str = "v21.0";
pub const DEFAULT_PIXEL_ID: &str = "5125940327515351";

const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Relay settings, read from the environment once at startup and handed to the
/// handler as shared app data. The access token is allowed to be missing here:
/// the service still starts, but every relay request is rejected with a 500
/// until it is configured.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub access_token: Option<String>,
    pub pixel_id: String,
    pub test_event_code: Option<String>,
    pub graph_base_url: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self {
            access_token: env::var("META_ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
            pixel_id: env::var("META_PIXEL_ID").unwrap_or_else(|_| DEFAULT_PIXEL_ID.into()),
            test_event_code: env::var("META_TEST_EVENT_CODE").ok().filter(|c| !c.is_empty()),
            graph_base_url: env::var("META_GRAPH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GRAPH_BASE_URL.into()),
        }
    }
}
