//! Shared User-Agent string for outbound fetch requests.
//!
//! Single source for project URL and UA format. The fetcher always identifies
//! itself as a tool and never spoofs a browser (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/imgfetch";

/// Default User-Agent for image fetch requests (identifies the tool).
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("imgfetch/{version} (respectful-image-tool; +{PROJECT_UA_URL})")
}
