//! Signed request client for the private web API.
//!
//! [`TikTokClient`] owns one HTTP client, one established [`Session`], and
//! the handle to the external signing service. The low-level methods
//! (`list_reposts`, `delete_item`, `resolve_user`) are Result-returning;
//! the [`PageFetcher`] and [`RepostDeleter`] impls at the bottom normalize
//! failures into the contracts the engines expect.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, error, info, instrument, warn};

use crate::collect::{Page, PageFetcher};
use crate::config::RunConfig;
use crate::delete::RepostDeleter;
use crate::error::Error;
use crate::session::{Session, SessionDriver};
use crate::types::{Cursor, SecUid};

use super::endpoints::{
    DeleteResponse, RepostListResponse, UserDetailResponse, PAGE_SIZE, REPOST_DELETE, REPOST_LIST,
    USER_DETAIL,
};

/// Browser fingerprint replicated on every request.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0";

/// Signed HTTP client for the platform's private web API.
pub struct TikTokClient {
    http: reqwest::Client,
    driver: Arc<dyn SessionDriver>,
    session: Session,
    config: RunConfig,
    username: String,
}

impl TikTokClient {
    /// Acquire a session through the driver and build a client for one run.
    ///
    /// The session (and its cookie jar) is established exactly once here and
    /// reused for every request; the configured `sid_tt` auth cookie is
    /// merged into it.
    pub async fn connect(
        config: RunConfig,
        driver: Arc<dyn SessionDriver>,
        username: impl Into<String>,
    ) -> Result<Self, Error> {
        let mut session = driver.create_session(config.browser, &config.ms_token).await?;
        if !config.sid_tt.is_empty() {
            session.set_cookie("sid_tt", &config.sid_tt);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Ok(Self {
            http,
            driver,
            session,
            config,
            username: username.into(),
        })
    }

    /// Resolve a username to its opaque secUid.
    #[instrument(skip(self))]
    pub async fn resolve_user(&self, username: &str) -> Result<SecUid, Error> {
        let url = self.build_url(USER_DETAIL, &[("uniqueId", username.to_string())])?;
        let signed = self.driver.sign_url(&url).await?;

        let response = self
            .http
            .get(&signed)
            .headers(self.common_headers(false))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), &body));
        }

        let body: UserDetailResponse = response.json().await?;
        body.user_info
            .and_then(|info| info.user)
            .and_then(|user| user.sec_uid)
            .map(SecUid::new)
            .ok_or_else(|| Error::UserNotFound {
                username: username.to_string(),
            })
    }

    /// Fetch one page of reposts. Errors propagate; the [`PageFetcher`] impl
    /// below is the layer that folds them into an end-of-data page.
    #[instrument(skip(self), fields(cursor = %cursor))]
    pub async fn list_reposts(
        &self,
        sec_uid: &SecUid,
        cursor: &Cursor,
    ) -> Result<RepostListResponse, Error> {
        let params = [
            ("secUid", sec_uid.as_str().to_string()),
            ("cursor", cursor.as_str().to_string()),
            ("count", PAGE_SIZE.to_string()),
            ("coverFormat", "0".to_string()),
            ("data_collection_enabled", "true".to_string()),
            ("needPinnedItemIds", "true".to_string()),
            (
                "odinId",
                self.session.odin_id().unwrap_or_default().to_string(),
            ),
            ("post_item_list_request_type", "0".to_string()),
            ("user_is_login", "true".to_string()),
        ];
        let url = self.build_url(REPOST_LIST, &params)?;
        let signed = self.driver.sign_url(&url).await?;

        let response = self
            .http
            .get(&signed)
            .headers(self.common_headers(false))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), &body));
        }

        let body: RepostListResponse = response.json().await?;
        if body.status_code != 0 {
            return Err(Error::Api {
                status_code: body.status_code,
                message: body
                    .status_msg
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }

        Ok(body)
    }

    /// Delete a single repost by its video id. A 200 response with a zero
    /// `status_code` body field is the only success shape.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, video_id: &str) -> Result<(), Error> {
        let params = [
            ("item_id", video_id.to_string()),
            (
                "odinId",
                self.session.odin_id().unwrap_or_default().to_string(),
            ),
            ("user_is_login", "true".to_string()),
        ];
        let url = self.build_url(REPOST_DELETE, &params)?;
        let signed = self.driver.sign_url(&url).await?;

        let response = self
            .http
            .post(&signed)
            .headers(self.common_headers(true))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), &body));
        }

        let body: DeleteResponse = response.json().await?;
        if body.status_code != 0 {
            return Err(Error::Api {
                status_code: body.status_code,
                message: body.status_msg.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        Ok(())
    }

    /// Build the unsigned request URL: `WebIdLastTime` first, then the
    /// session's base params, then the call-specific params. The session's
    /// `msToken` wins over the configured one when present.
    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, Error> {
        let mut url = self
            .config
            .api_base
            .join(endpoint)
            .map_err(|e| Error::Signing(format!("bad endpoint path {endpoint}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(
                "WebIdLastTime",
                &Utc::now().timestamp_millis().to_string(),
            );
            for (key, value) in &self.session.params {
                query.append_pair(key, value);
            }
            if !self.session.params.contains_key("msToken") {
                query.append_pair("msToken", &self.config.ms_token);
            }
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    /// Headers replicating the original browser request fingerprint.
    fn common_headers(&self, is_delete: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let insert = |headers: &mut HeaderMap, name: &'static str, value: &str| {
            if let Ok(v) = HeaderValue::from_str(value) {
                headers.insert(name, v);
            }
        };

        insert(&mut headers, "accept", "*/*");
        insert(&mut headers, "accept-language", "en-US,en;q=0.5");
        insert(
            &mut headers,
            "referer",
            &format!("https://www.tiktok.com/@{}", self.username),
        );
        insert(&mut headers, "sec-fetch-dest", "empty");
        insert(&mut headers, "sec-fetch-mode", "cors");
        insert(&mut headers, "sec-fetch-site", "same-origin");
        insert(&mut headers, "pragma", "no-cache");
        insert(&mut headers, "cache-control", "no-cache");
        insert(&mut headers, "cookie", &self.session.cookie_header());

        if is_delete {
            insert(&mut headers, "origin", "https://www.tiktok.com");
            insert(
                &mut headers,
                "content-type",
                "application/x-www-form-urlencoded",
            );
        }

        headers
    }
}

#[async_trait]
impl PageFetcher for TikTokClient {
    /// Normalizing fetch: transport failures, non-200 statuses, and remote
    /// logical failures all become `([], input cursor, no more)`. Retry
    /// responsibility lives in the collector, not here.
    async fn fetch_page(&self, sec_uid: &SecUid, cursor: &Cursor) -> Page {
        match self.list_reposts(sec_uid, cursor).await {
            Ok(body) => {
                let next_cursor = body
                    .cursor
                    .as_ref()
                    .and_then(Cursor::from_json)
                    .unwrap_or_else(|| cursor.clone());
                let page = Page {
                    items: body.item_list,
                    next_cursor,
                    has_more: body.has_more,
                };
                info!(
                    items = page.items.len(),
                    next_cursor = %page.next_cursor,
                    status = if page.has_more { "more available" } else { "complete" },
                    "retrieved repost page"
                );
                if page.items.is_empty() && page.has_more {
                    // Diagnostic only; the collector owns the retry policy.
                    debug!(cursor = %cursor, "empty page while server reports more data");
                }
                page
            }
            Err(e) => {
                error!(cursor = %cursor, error = %e, "repost page fetch failed");
                Page::end(cursor.clone())
            }
        }
    }
}

#[async_trait]
impl RepostDeleter for TikTokClient {
    /// Normalizing delete: any error shape is a warn-logged failure. An
    /// "already deleted" answer is not distinguished from other failures;
    /// the item stays in the local collection.
    async fn delete_repost(&self, video_id: &str) -> bool {
        match self.delete_item(video_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(video_id, error = %e, "delete request failed");
                false
            }
        }
    }
}
