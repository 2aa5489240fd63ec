// Video identifier extraction from the accepted YouTube URL shapes

use std::borrow::Cow;
use std::fmt;

use regex::Regex;

use super::errors::InputError;

lazy_static::lazy_static! {
    /// Checked in order, first match wins. Every capture stops at `&`, `?` or `#`.
    /// A bare `.` or `..` capture is not an identifier.
    static ref URL_SHAPES: Vec<(&'static str, Regex)> = vec![
        ("watch", Regex::new(r"youtube\.com/watch\?(?:[^#]*&)?v=([^&?#]+)").unwrap()),
        ("short-link", Regex::new(r"youtu\.be/([^&?#]+)").unwrap()),
        ("embed", Regex::new(r"youtube\.com/embed/([^&?#]+)").unwrap()),
        ("v-path", Regex::new(r"youtube\.com/v/([^&?#]+)").unwrap()),
        ("shorts", Regex::new(r"youtube\.com/shorts/([^&?#]+)").unwrap()),
    ];
}

/// Opaque, non-empty YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the identifier from a raw URL string
    pub fn from_url(raw: &str) -> Result<Self, InputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InputError::MissingUrl);
        }

        for (shape, pattern) in URL_SHAPES.iter() {
            if let Some(id) = pattern
                .captures(raw)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .filter(|id| !id.is_empty() && *id != "." && *id != "..")
            {
                tracing::debug!(shape = *shape, video_id = id, "Matched URL shape");
                return Ok(Self(id.to_string()));
            }
        }

        Err(InputError::InvalidUrl(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form, safe as a single path segment or query value
    pub fn url_encoded(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }

    /// Canonical watch URL for this identifier
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.url_encoded())
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> String {
        VideoId::from_url(url).unwrap().as_str().to_string()
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(id("https://youtube.com/watch?v=dQw4w9WgXcQ&t=42s"), "dQw4w9WgXcQ");
        assert_eq!(id("https://m.youtube.com/watch?v=dQw4w9WgXcQ#comments"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_watch_url_with_leading_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&list=PL1"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_link() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?si=abc123"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_legacy_v_path() {
        assert_eq!(id("http://www.youtube.com/v/dQw4w9WgXcQ&fs=1"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(id("https://www.youtube.com/shorts/abcDEF12345#x"), "abcDEF12345");
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(VideoId::from_url("   "), Err(InputError::MissingUrl));
    }

    #[test]
    fn test_unrecognized_url() {
        assert!(matches!(
            VideoId::from_url("https://vimeo.com/12345"),
            Err(InputError::InvalidUrl(_))
        ));
        assert!(matches!(
            VideoId::from_url("https://www.youtube.com/watch?v="),
            Err(InputError::InvalidUrl(_))
        ));
        assert!(matches!(
            VideoId::from_url("https://www.youtube.com/channel/UC123"),
            Err(InputError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_slash_bearing_id_is_encoded() {
        let video_id = VideoId::from_url("https://youtu.be/../../admin/delete").unwrap();
        assert_eq!(video_id.as_str(), "../../admin/delete");
        assert_eq!(video_id.url_encoded(), "..%2F..%2Fadmin%2Fdelete");
        assert_eq!(
            video_id.watch_url(),
            "https://www.youtube.com/watch?v=..%2F..%2Fadmin%2Fdelete"
        );
    }

    #[test]
    fn test_dot_segment_is_not_an_id() {
        assert!(matches!(
            VideoId::from_url("https://youtu.be/.."),
            Err(InputError::InvalidUrl(_))
        ));
        assert!(matches!(
            VideoId::from_url("https://www.youtube.com/embed/.?x=1"),
            Err(InputError::InvalidUrl(_))
        ));
    }
}
