//! Endpoint definitions and response types for the private web API.

use serde::Deserialize;
use serde_json::Value;

use crate::repost::Repost;

// ============================================================================
// Endpoint Paths (joined onto the configured API base)
// ============================================================================

/// List a user's reposts, paginated by cursor.
pub const REPOST_LIST: &str = "/api/repost/item_list/";

/// Delete a single repost by item id.
pub const REPOST_DELETE: &str = "/tiktok/v1/upvote/delete";

/// Resolve a username to its profile, including the opaque secUid.
pub const USER_DETAIL: &str = "/api/user/detail/";

/// Fixed page size for repost listing.
pub const PAGE_SIZE: u32 = 30;

// ============================================================================
// Response Types
// ============================================================================

/// Response from the repost list endpoint.
///
/// Every field is defaulted: the server omits fields freely, and the
/// normalization layer fills in the gaps (cursor falls back to the request
/// cursor, `hasMore` to false).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepostListResponse {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: Option<String>,
    #[serde(default)]
    pub item_list: Vec<Repost>,
    /// String on some responses, integer offset on others.
    #[serde(default)]
    pub cursor: Option<Value>,
    #[serde(default)]
    pub has_more: bool,
}

/// Response from the delete endpoint. Note the snake_case wire format,
/// unlike the camelCase list endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    #[serde(default = "missing_status_code")]
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: Option<String>,
}

/// An absent status code is treated as failure, never as success.
fn missing_status_code() -> i64 {
    -1
}

/// Response from the user detail endpoint. Only the secUid is consumed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub sec_uid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_response_defaults() {
        let resp: RepostListResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.status_code, 0);
        assert!(resp.item_list.is_empty());
        assert!(resp.cursor.is_none());
        assert!(!resp.has_more);
    }

    #[test]
    fn list_response_full() {
        let resp: RepostListResponse = serde_json::from_value(json!({
            "statusCode": 0,
            "itemList": [{"video": {"id": "1"}}, {"video": {"id": "2"}}],
            "cursor": "60",
            "hasMore": true
        }))
        .unwrap();
        assert_eq!(resp.item_list.len(), 2);
        assert_eq!(resp.cursor, Some(json!("60")));
        assert!(resp.has_more);
    }

    #[test]
    fn delete_response_missing_code_is_failure() {
        let resp: DeleteResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.status_code, -1);
    }

    #[test]
    fn user_detail_sec_uid_path() {
        let resp: UserDetailResponse = serde_json::from_value(json!({
            "userInfo": {"user": {"secUid": "MS4wLjABAAAAxyz"}}
        }))
        .unwrap();
        let sec_uid = resp
            .user_info
            .and_then(|i| i.user)
            .and_then(|u| u.sec_uid);
        assert_eq!(sec_uid.as_deref(), Some("MS4wLjABAAAAxyz"));
    }
}
