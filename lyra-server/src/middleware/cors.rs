use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::state::AppState;

/// One entry of the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Exact(String),
    /// `https://*.vercel.app` => scheme `https://`, suffix `.vercel.app`.
    Subdomain { scheme: String, suffix: String },
}

impl OriginRule {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim().trim_end_matches('/');
        if entry.is_empty() {
            return None;
        }
        match entry.split_once("://*") {
            Some((scheme, suffix)) if suffix.starts_with('.') => Some(OriginRule::Subdomain {
                scheme: format!("{scheme}://"),
                suffix: suffix.to_owned(),
            }),
            _ => Some(OriginRule::Exact(entry.to_owned())),
        }
    }

    fn matches(&self, origin: &str) -> bool {
        match self {
            OriginRule::Exact(o) => o == origin,
            OriginRule::Subdomain { scheme, suffix } => origin
                .strip_prefix(scheme.as_str())
                .and_then(|host| host.strip_suffix(suffix.as_str()))
                .is_some_and(|sub| !sub.is_empty() && !sub.contains(['/', ':'])),
        }
    }
}

/// Parsed form of the comma-separated `cors_allowed_origins` setting.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    rules: Vec<OriginRule>,
    wildcard: bool,
}

impl OriginPolicy {
    pub fn parse(list: &str) -> Self {
        let mut policy = OriginPolicy::default();
        for entry in list.split(',') {
            if entry.trim() == "*" {
                policy.wildcard = true;
            } else if let Some(rule) = OriginRule::parse(entry) {
                policy.rules.push(rule);
            }
        }
        policy
    }

    /// No usable entries, or an explicit `*`.
    pub fn allows_any(&self) -> bool {
        self.wildcard || self.rules.is_empty()
    }

    pub fn matches(&self, origin: &str) -> bool {
        self.allows_any() || self.rules.iter().any(|r| r.matches(origin))
    }
}

pub fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    let policy = OriginPolicy::parse(&state.config.cors_allowed_origins);
    if policy.allows_any() {
        // Wildcard cannot be combined with credentials.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().is_ok_and(|o| policy.matches(o))
            },
        ))
        .allow_credentials(true)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::DEFAULT_CORS_ORIGINS;

    #[test]
    fn default_list_matches_localhost_and_vercel_subdomains() {
        let policy = OriginPolicy::parse(DEFAULT_CORS_ORIGINS);
        assert!(!policy.allows_any());
        assert!(policy.matches("http://localhost:3000"));
        assert!(policy.matches("https://lyra-ai.vercel.app"));
        assert!(policy.matches("https://lyra-5k7lygtcl-team.vercel.app"));
        assert!(!policy.matches("http://lyra.vercel.app"));
        assert!(!policy.matches("https://vercel.app"));
        assert!(!policy.matches("https://evil.com"));
        assert!(!policy.matches("https://evil.com/.vercel.app"));
        assert!(!policy.matches("http://localhost:4000"));
    }

    #[test]
    fn star_or_empty_list_allows_any() {
        assert!(OriginPolicy::parse("*").allows_any());
        assert!(OriginPolicy::parse(" , ").allows_any());
        assert!(OriginPolicy::parse("http://a.test, *").matches("https://b.test"));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let policy = OriginPolicy::parse("https://app.example.com/");
        assert!(policy.matches("https://app.example.com"));
    }
}
