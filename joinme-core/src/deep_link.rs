//! `scheme://event/{id}` links into the app.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::error::{JoinMeError, JoinMeResult};

pub const DEFAULT_SCHEME: &str = "joinme";

const EVENT_HOST: &str = "event";

/// Escaped in an id so it stays one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    Event { id: String },
}

impl DeepLink {
    /// Parse a link for `scheme`. Only the shape is checked; whether the id
    /// names an existing event is up to whoever opens it.
    pub fn parse(uri: &str, scheme: &str) -> JoinMeResult<Self> {
        let invalid = || JoinMeError::InvalidDeepLink(uri.to_string());

        let url = Url::parse(uri).map_err(|_| invalid())?;
        if url.scheme() != scheme || url.host_str() != Some(EVENT_HOST) {
            return Err(invalid());
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid());
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.collect())
            .unwrap_or_default();

        let [raw] = segments.as_slice() else {
            return Err(invalid());
        };
        let id = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| invalid())?;
        if id.is_empty() {
            return Err(invalid());
        }

        Ok(DeepLink::Event { id: id.into_owned() })
    }

    pub fn to_uri(&self, scheme: &str) -> String {
        match self {
            DeepLink::Event { id } => {
                format!("{scheme}://{EVENT_HOST}/{}", utf8_percent_encode(id, SEGMENT))
            }
        }
    }

    pub fn event_id(&self) -> &str {
        match self {
            DeepLink::Event { id } => id,
        }
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri(DEFAULT_SCHEME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_link() {
        let link = DeepLink::parse("joinme://event/Xy12ab", DEFAULT_SCHEME).unwrap();
        assert_eq!(link.event_id(), "Xy12ab");
        assert_eq!(link.to_string(), "joinme://event/Xy12ab");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for uri in [
            "https://event/abc",
            "joinme://group/abc",
            "joinme://event/",
            "joinme://event",
            "joinme://event/a/b",
            "joinme://event/abc?ref=share",
            "joinme://event/abc#top",
            "joinme://event/%FF",
            "not a uri",
        ] {
            let err = DeepLink::parse(uri, DEFAULT_SCHEME).unwrap_err();
            assert!(matches!(err, JoinMeError::InvalidDeepLink(_)), "{uri}");
        }
    }

    #[test]
    fn test_custom_scheme() {
        let link = DeepLink::Event { id: "e1".into() };
        let uri = link.to_uri("joinme-dev");
        assert_eq!(DeepLink::parse(&uri, "joinme-dev").unwrap(), link);
    }

    #[test]
    fn test_ids_with_reserved_characters_roundtrip() {
        for id in ["a b", "x#y", "a/b", "é", "50%", "q?x=1"] {
            let link = DeepLink::Event { id: id.to_string() };
            let uri = link.to_uri(DEFAULT_SCHEME);

            assert_eq!(DeepLink::parse(&uri, DEFAULT_SCHEME).unwrap(), link, "{uri}");
        }
        assert_eq!(
            DeepLink::Event { id: "a b".into() }.to_string(),
            "joinme://event/a%20b"
        );
    }
}
