//! Session acquisition and request signing.
//!
//! The platform rejects unsigned API calls, and producing a valid signature
//! requires driving a real browser engine. That whole concern lives behind
//! the [`SessionDriver`] trait: the core hands it a fully-built URL and gets
//! back a signed one, plus a one-time [`Session`] carrying the browser's
//! query params and cookie jar. [`SignServer`] is the shipped implementation,
//! talking to a local signing service over HTTP.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Browser;
use crate::error::Error;

/// An authenticated browser session, acquired once per run and reused for
/// every request in that run.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Base query params the browser context established (device ids, region,
    /// app version and so on). Copied into every API call.
    #[serde(default)]
    pub params: HashMap<String, String>,
    /// Cookies from the browser context. The delete endpoint needs the
    /// `odin_tt` value as an explicit query param.
    #[serde(default)]
    pub cookies: HashMap<String, String>,
}

impl Session {
    /// The `odin_tt` cookie, required as the `odinId` param on several calls.
    pub fn odin_id(&self) -> Option<&str> {
        self.cookies.get("odin_tt").map(String::as_str)
    }

    /// Merge an extra cookie into the session jar, overwriting any existing
    /// value (used for the configured `sid_tt` auth cookie).
    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Render the jar as a `Cookie:` header value.
    pub fn cookie_header(&self) -> String {
        let mut pairs: Vec<_> = self.cookies.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// The external signing/session collaborator.
///
/// Implementations own the browser lifecycle and the signature scheme; the
/// core treats both as black boxes.
#[async_trait]
pub trait SessionDriver: Send + Sync {
    /// Acquire an authenticated session using the given browser engine.
    async fn create_session(&self, browser: Browser, ms_token: &str) -> Result<Session, Error>;

    /// Sign a fully-constructed request URL.
    async fn sign_url(&self, url: &str) -> Result<String, Error>;
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    browser: &'a str,
    ms_token: &'a str,
}

#[derive(Debug, Serialize)]
struct SignRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(default)]
    signed_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// A [`SessionDriver`] backed by a local HTTP signing service.
#[derive(Debug, Clone)]
pub struct SignServer {
    endpoint: Url,
    http: reqwest::Client,
}

impl SignServer {
    pub fn new(endpoint: Url) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("unrepost/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");
        Self { endpoint, http }
    }

    fn route(&self, path: &str) -> Result<Url, Error> {
        self.endpoint
            .join(path)
            .map_err(|e| Error::Signing(format!("bad sign server route {path}: {e}")))
    }
}

#[async_trait]
impl SessionDriver for SignServer {
    async fn create_session(&self, browser: Browser, ms_token: &str) -> Result<Session, Error> {
        let url = self.route("session")?;
        debug!(%url, %browser, "creating signing session");

        let browser_name = browser.to_string();
        let request = CreateSessionRequest {
            browser: &browser_name,
            ms_token,
        };
        let response = self.http.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Signing(format!(
                "session creation failed: HTTP {status}: {body}"
            )));
        }

        Ok(response.json::<Session>().await?)
    }

    async fn sign_url(&self, url: &str) -> Result<String, Error> {
        let route = self.route("signature")?;
        let response = self
            .http
            .post(route)
            .json(&SignRequest { url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Signing(format!(
                "signing failed: HTTP {status}: {body}"
            )));
        }

        let body: SignResponse = response.json().await?;
        match body.signed_url {
            Some(signed) => Ok(signed),
            None => Err(Error::Signing(
                body.error.unwrap_or_else(|| "no signed_url in response".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(cookies: &[(&str, &str)]) -> Session {
        Session {
            params: HashMap::new(),
            cookies: cookies
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn odin_id_reads_cookie() {
        let session = session_with(&[("odin_tt", "abc123"), ("other", "x")]);
        assert_eq!(session.odin_id(), Some("abc123"));
        assert_eq!(session_with(&[]).odin_id(), None);
    }

    #[test]
    fn cookie_header_is_joined_and_stable() {
        let mut session = session_with(&[("b", "2"), ("a", "1")]);
        assert_eq!(session.cookie_header(), "a=1; b=2");
        session.set_cookie("sid_tt", "secret");
        assert_eq!(session.cookie_header(), "a=1; b=2; sid_tt=secret");
    }

    #[test]
    fn set_cookie_overwrites() {
        let mut session = session_with(&[("sid_tt", "old")]);
        session.set_cookie("sid_tt", "new");
        assert_eq!(session.cookies.get("sid_tt").unwrap(), "new");
    }
}
