//! Run configuration.
//!
//! Everything the engines need from the environment is gathered into one
//! [`RunConfig`] built at startup and passed by reference. No component reads
//! ambient process state.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

/// Browser engine driven by the external session/signing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        };
        f.write_str(name)
    }
}

impl FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(format!(
                "unknown browser '{other}', expected chromium, firefox or webkit"
            )),
        }
    }
}

/// Default base URL of the platform's web API.
pub const DEFAULT_API_BASE: &str = "https://www.tiktok.com";

/// Configuration for one run, shared by the client and both engines.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base URL of the platform API. Overridable for testing against a
    /// local mock.
    pub api_base: Url,
    /// The `msToken` auth token captured from a logged-in browser session.
    pub ms_token: String,
    /// The `sid_tt` session cookie value, merged into every request.
    pub sid_tt: String,
    /// Fixed delay between consecutive requests. The primary rate-limiting
    /// mechanism; one request in flight at a time, always.
    pub request_delay: Duration,
    /// Browser engine for the session driver.
    pub browser: Browser,
    /// Ceiling on consecutive retries of a cursor that keeps returning an
    /// empty page while the server claims more data exists.
    pub max_empty_retries: u32,
    /// Endpoint of the external URL-signing service.
    pub sign_server: Url,
}

impl RunConfig {
    /// Defaults matching the original tool: 1s delay, 50 retries, chromium.
    pub fn new(ms_token: impl Into<String>, sid_tt: impl Into<String>, sign_server: Url) -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            ms_token: ms_token.into(),
            sid_tt: sid_tt.into(),
            request_delay: Duration::from_secs(1),
            browser: Browser::default(),
            max_empty_retries: 50,
            sign_server,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_parse_roundtrip() {
        for name in ["chromium", "firefox", "webkit"] {
            let b: Browser = name.parse().unwrap();
            assert_eq!(b.to_string(), name);
        }
        assert!("safari".parse::<Browser>().is_err());
    }

    #[test]
    fn defaults() {
        let cfg = RunConfig::new("tok", "sid", Url::parse("http://localhost:8080").unwrap());
        assert_eq!(cfg.request_delay, Duration::from_secs(1));
        assert_eq!(cfg.max_empty_retries, 50);
        assert_eq!(cfg.browser, Browser::Chromium);
        assert_eq!(cfg.api_base.as_str(), "https://www.tiktok.com/");
    }
}
