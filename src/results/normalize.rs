//! URL canonicalization used for deduplication

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Query parameters that only carry tracking data
const TRACKING_PARAMS: &[&str] = &[
    // Google
    "gclid",
    "gclsrc",
    // Facebook
    "fbclid",
    "fb_action_ids",
    "fb_action_types",
    "fb_source",
    "fb_ref",
    // Microsoft
    "msclkid",
    // Twitter
    "twclid",
    // Mailchimp
    "mc_eid",
    "mc_cid",
    // HubSpot
    "_hsenc",
    "_hsmi",
    "__hstc",
    "__hsfp",
    "hsCtaTracking",
    // Adobe
    "s_kwcid",
    // General
    "ref",
    "ref_",
    "click_id",
    "campaign_id",
    "ad_id",
];

static TRACKING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^utm_.*$", r"^_ga.*$"]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

fn is_tracking_param(param: &str) -> bool {
    TRACKING_PARAMS.contains(&param) || TRACKING_PATTERNS.iter().any(|p| p.is_match(param))
}

/// Canonical form of a URL: scheme, host and path, with the fragment and
/// tracking parameters dropped and the remaining query parameters sorted.
///
/// Two URLs pointing at the same page normalize to the same string.
/// Unparseable input falls back to its trimmed, lower-cased text.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => return trimmed.to_lowercase(),
    };

    parsed.set_fragment(None);

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    parsed.set_query(None);
    if !pairs.is_empty() {
        parsed.query_pairs_mut().extend_pairs(pairs);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.to_string()
}
