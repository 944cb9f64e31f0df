//! User agent generation

use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed user agent for page fetches, so sites can identify the crawler
pub const FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 DeepResearchBot/2.0";

/// Desktop platforms paired with the engines that plausibly run on them
const PLATFORMS: &[(&str, &[Browser])] = &[
    ("Windows NT 10.0; Win64; x64", &[Browser::Chrome, Browser::Firefox]),
    ("Macintosh; Intel Mac OS X 14_4", &[Browser::Chrome, Browser::Firefox, Browser::Safari]),
    ("X11; Linux x86_64", &[Browser::Chrome, Browser::Firefox]),
];

#[derive(Clone, Copy)]
enum Browser {
    Chrome,
    Firefox,
    Safari,
}

/// Pick a realistic desktop user agent for search requests
///
/// Search engines are queried with a browser-like identity; page fetches use
/// [`FETCH_USER_AGENT`] instead.
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let (platform, browsers) = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let browser = browsers.choose(&mut rng).copied().unwrap_or(Browser::Chrome);

    match browser {
        Browser::Chrome => format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
            platform,
            rng.gen_range(122..=128)
        ),
        Browser::Firefox => {
            let version = rng.gen_range(124..=130);
            format!(
                "Mozilla/5.0 ({}; rv:{}.0) Gecko/20100101 Firefox/{}.0",
                platform, version, version
            )
        }
        Browser::Safari => format!(
            "Mozilla/5.0 ({}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.{} Safari/605.1.15",
            platform,
            rng.gen_range(2..=5)
        ),
    }
}

/// Standard accept headers for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
}

/// Standard accept-language header
pub fn accept_language(lang: &str) -> String {
    if lang == "all" || lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}
