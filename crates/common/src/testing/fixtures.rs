//! Canned session data for tests.

use serde_json::{json, Map};
use sitedesk_domain::{CredentialPair, UserProfile};

/// Credential pair with recognizable token values.
#[must_use]
pub fn sample_credentials() -> CredentialPair {
    CredentialPair::new("access-token-1", "refresh-token-1")
}

/// Profile shaped like the backend's login response `user` object.
#[must_use]
pub fn sample_profile() -> UserProfile {
    let mut extra = Map::new();
    extra.insert("projects".to_string(), json!(["north-ran-rollout"]));

    UserProfile {
        id: Some(json!(17)),
        username: Some("site.manager".to_string()),
        email: Some("site.manager@example.com".to_string()),
        role: Some("manager".to_string()),
        extra,
    }
}
