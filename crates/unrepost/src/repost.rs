//! The repost record type.
//!
//! Reposts arrive from the remote API as large, loosely-schema'd JSON
//! objects. The core only ever inspects one nested field, the reposted
//! video's id; everything else is opaque payload that must survive a
//! save/load round trip byte-for-byte. [`Repost`] wraps the raw value and
//! exposes exactly that one accessor.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One repost item, exactly as delivered by the remote API.
///
/// # Example
///
/// ```
/// use unrepost::Repost;
/// use serde_json::json;
///
/// let repost = Repost::new(json!({
///     "video": { "id": "7301234567890123456" },
///     "desc": "some caption"
/// }));
///
/// assert_eq!(repost.video_id().as_deref(), Some("7301234567890123456"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Repost(Value);

impl Repost {
    /// Wrap a raw API object. No validation: items missing the video id are
    /// representable and are skipped later by the deletion engine.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The id of the reposted video, from the nested `video.id` field.
    ///
    /// The API serves it as a string on some surfaces and as an integer on
    /// others; both are normalized to the string form used in delete
    /// requests. Returns `None` when the field is absent or has another
    /// shape.
    pub fn video_id(&self) -> Option<String> {
        match self.0.get("video")?.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The reposted video's author handle, when present. Display only.
    pub fn author(&self) -> Option<&str> {
        self.0.get("author")?.get("uniqueId")?.as_str()
    }

    /// The repost's caption text, when present. Display only.
    pub fn description(&self) -> Option<&str> {
        self.0.get("desc")?.as_str()
    }

    /// Borrow the raw payload.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume and return the raw payload.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Serialize for Repost {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Repost {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Repost(Value::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_id_from_string() {
        let r = Repost::new(json!({"video": {"id": "123"}}));
        assert_eq!(r.video_id().as_deref(), Some("123"));
    }

    #[test]
    fn video_id_from_number() {
        let r = Repost::new(json!({"video": {"id": 7301234567890123456i64}}));
        assert_eq!(r.video_id().as_deref(), Some("7301234567890123456"));
    }

    #[test]
    fn video_id_missing() {
        assert_eq!(Repost::new(json!({"desc": "no video"})).video_id(), None);
        assert_eq!(Repost::new(json!({"video": {}})).video_id(), None);
        assert_eq!(Repost::new(json!({"video": {"id": null}})).video_id(), None);
    }

    #[test]
    fn display_accessors() {
        let r = Repost::new(json!({
            "author": {"uniqueId": "somecreator"},
            "desc": "캡션 텍스트"
        }));
        assert_eq!(r.author(), Some("somecreator"));
        assert_eq!(r.description(), Some("캡션 텍스트"));
    }

    #[test]
    fn serialize_is_passthrough() {
        let raw = json!({
            "video": {"id": "1", "stats": {"views": 10}},
            "desc": "héllo 世界",
            "extra": [1, 2, 3]
        });
        let repost = Repost::new(raw.clone());
        let serialized = serde_json::to_value(&repost).unwrap();
        assert_eq!(serialized, raw);
        let back: Repost = serde_json::from_value(serialized).unwrap();
        assert_eq!(back, repost);
    }
}
