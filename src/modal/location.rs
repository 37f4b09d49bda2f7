//! Navigable address backing the modal store.
//!
//! A [`Location`] is the console's equivalent of the browser address bar. Modal
//! state is encoded as query parameters, so edits must touch exactly one
//! parameter and leave every other segment byte-for-byte intact. Segments are
//! therefore kept raw and only decoded for key comparison; newly written
//! parameters are form-urlencoded.

use crate::domain::{BackofficeError, Result};
use url::{form_urlencoded, Url};

/// Current address: path plus query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Parses an absolute URL such as `http://localhost:3000/clientes?editCliente=4`.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::Config`] if `input` is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self> {
        Url::parse(input)
            .map(|url| Self { url })
            .map_err(|e| BackofficeError::Config(format!("invalid location `{input}`: {e}")))
    }

    /// Path component, e.g. `/clientes`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Raw query string without the leading `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns `true` if any segment decodes to `key`, even with an empty value.
    #[must_use]
    pub fn has_param(&self, key: &str) -> bool {
        self.segments()
            .filter_map(decode_segment)
            .any(|(k, _)| k == key)
    }

    /// First value stored under `key`.
    ///
    /// Segments that fail to decode are treated as absent.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<String> {
        self.segments()
            .filter_map(decode_segment)
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Returns a copy with `key=value` set.
    ///
    /// The first segment for `key` is replaced in place and any duplicates are
    /// dropped; if the key is absent the pair is appended.
    #[must_use]
    pub fn with_param(&self, key: &str, value: &str) -> Self {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();

        let mut replaced = false;
        let mut segments = Vec::new();
        for segment in self.segments() {
            if segment_key(segment).as_deref() == Some(key) {
                if !replaced {
                    segments.push(encoded.clone());
                    replaced = true;
                }
            } else {
                segments.push(segment.to_string());
            }
        }
        if !replaced {
            segments.push(encoded);
        }

        self.with_segments(&segments)
    }

    /// Returns a copy with every segment for `key` removed.
    #[must_use]
    pub fn without_param(&self, key: &str) -> Self {
        let segments: Vec<String> = self
            .segments()
            .filter(|segment| segment_key(segment).as_deref() != Some(key))
            .map(String::from)
            .collect();
        self.with_segments(&segments)
    }

    /// Returns the address of another page on the same origin, with no query.
    #[must_use]
    pub fn at_path(&self, path: &str) -> Self {
        let mut url = self.url.clone();
        url.set_path(path);
        url.set_query(None);
        Self { url }
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.url
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|segment| !segment.is_empty())
    }

    fn with_segments(&self, segments: &[String]) -> Self {
        let mut url = self.url.clone();
        if segments.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&segments.join("&")));
        }
        Self { url }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl std::str::FromStr for Location {
    type Err = BackofficeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn decode_segment(segment: &str) -> Option<(String, String)> {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
}

fn segment_key(segment: &str) -> Option<String> {
    decode_segment(segment).map(|(k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[test]
    fn set_preserves_foreign_segments_verbatim() {
        let base = loc("http://localhost/clientes?q=a%20b&page=2");
        let next = base.with_param("editCliente", "4");
        assert_eq!(next.query(), Some("q=a%20b&page=2&editCliente=4"));
    }

    #[test]
    fn set_replaces_in_place_and_drops_duplicates() {
        let base = loc("http://localhost/clientes?editCliente=1&x=y&editCliente=2");
        let next = base.with_param("editCliente", "9");
        assert_eq!(next.query(), Some("editCliente=9&x=y"));
        assert_eq!(next.param("editCliente").as_deref(), Some("9"));
    }

    #[test]
    fn removing_last_param_clears_query() {
        let base = loc("http://localhost/cuentas?deleteCuenta=3");
        let next = base.without_param("deleteCuenta");
        assert_eq!(next.query(), None);
        assert!(!next.has_param("deleteCuenta"));
    }

    #[test]
    fn empty_value_still_counts_as_present() {
        let base = loc("http://localhost/cuentas?createCuenta=");
        assert!(base.has_param("createCuenta"));
        assert_eq!(base.param("createCuenta").as_deref(), Some(""));
    }

    #[test]
    fn encoded_keys_are_compared_decoded() {
        let base = loc("http://localhost/x?edit%43liente=5");
        assert_eq!(base.param("editCliente").as_deref(), Some("5"));
    }

    #[test]
    fn at_path_drops_query() {
        let base = loc("http://localhost:3000/clientes?createCliente=new");
        assert_eq!(base.at_path("/reportes").as_str(), "http://localhost:3000/reportes");
    }
}
