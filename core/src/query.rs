//! Immutable query-string builder.
//!
//! Every setter returns a new `Query`; the receiver is never modified.
//! Keys and values are percent-encoded independently, component style, so
//! reserved characters such as `@`, `=`, `&` and space never leak into the
//! query structure.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::params::{MaybeValue, Params};

// Characters left unescaped by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A set of URL query parameters and their string encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Params,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an encoded query string (without the leading `?`). A pair
    /// without `=` gets an empty value; empty pairs are skipped.
    pub fn parse(encoded: &str) -> Self {
        encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect()
    }

    /// Set a single parameter. An absent value removes the parameter.
    #[must_use]
    pub fn param(&self, name: impl Into<String>, value: impl MaybeValue) -> Self {
        self.params([(name, value)])
    }

    /// Set a group of parameters; later entries win, absent values remove.
    #[must_use]
    pub fn params<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: MaybeValue,
    {
        Self {
            params: self.params.merge(params),
        }
    }

    #[must_use]
    pub fn remove(&self, name: impl Into<String>) -> Self {
        self.param(name, None::<String>)
    }

    /// Drop every parameter.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter()
    }

    /// The encoded query string, without a leading `?`. Empty when no
    /// parameter is set.
    pub fn get(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, COMPONENT),
                    utf8_percent_encode(value, COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn decode(component: &str) -> String {
    percent_decode_str(component).decode_utf8_lossy().into_owned()
}

impl<K: Into<String>, V: MaybeValue> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Query::new().params(iter)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_initial_parameters() {
        let query: Query = [("foo", "bar")].into_iter().collect();
        assert_eq!(query.get(), "foo=bar");
    }

    #[test]
    fn sets_single_parameter() {
        assert_eq!(Query::new().param("foo", "bar").get(), "foo=bar");
    }

    #[test]
    fn sets_multiple_parameters() {
        let query = Query::new().params([("foo", "bar"), ("baz", "qux")]);
        assert_eq!(query.get(), "foo=bar&baz=qux");
    }

    #[test]
    fn absent_value_deletes_parameter() {
        let query = Query::new().params([("foo", "bar")]).param("foo", None::<&str>);
        assert_eq!(query.get(), "");
        assert!(query.is_empty());
    }

    #[test]
    fn remove_deletes_parameter() {
        let query = Query::new().param("foo", "bar").param("a", "b").remove("foo");
        assert_eq!(query.get(), "a=b");
    }

    #[test]
    fn tells_if_empty() {
        assert!(!Query::new().params([("foo", "bar")]).is_empty());
        assert!(Query::new().is_empty());
    }

    #[test]
    fn clear_removes_all_entries() {
        let query: Query = [("foo", "bar")].into_iter().collect();
        assert!(query.clear().is_empty());
        assert_eq!(query.get(), "foo=bar");
    }

    #[test]
    fn overriding_a_key_keeps_its_position() {
        let query = Query::new()
            .param("a", "1")
            .param("b", "2")
            .params([("a", "3")]);
        assert_eq!(query.get(), "a=3&b=2");
    }

    #[test]
    fn encodes_reserved_characters() {
        let query = Query::new().param("email", "foo@bar.com").param("a b", "c=d&e");
        assert_eq!(query.get(), "email=foo%40bar.com&a%20b=c%3Dd%26e");
    }

    #[test]
    fn leaves_unreserved_marks_alone() {
        let query = Query::new().param("k", "a-b_c.d!e~f*g'h(i)");
        assert_eq!(query.get(), "k=a-b_c.d!e~f*g'h(i)");
    }

    #[test]
    fn encodes_non_ascii_as_utf8() {
        assert_eq!(Query::new().param("q", "ä").get(), "q=%C3%A4");
    }

    #[test]
    fn encoding_round_trips() {
        let query = Query::new()
            .param("email", "foo@bar.com")
            .param("name", "Jane Doe & co")
            .param("plus", "1+1=2")
            .param("unicode", "日本");
        let encoded = query.get();
        let decoded: Query = url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert_eq!(decoded, query);
    }

    #[test]
    fn parses_encoded_query() {
        let query = Query::parse("email=foo%40bar.com&a%20b=c%3Dd%26e&flag&&x=1");
        assert_eq!(query.value("email"), Some("foo@bar.com"));
        assert_eq!(query.value("a b"), Some("c=d&e"));
        assert_eq!(query.value("flag"), Some(""));
        assert_eq!(query.get(), "email=foo%40bar.com&a%20b=c%3Dd%26e&flag=&x=1");
    }

    #[test]
    fn parse_reads_what_get_writes() {
        let query = Query::new().param("q", "日本 & co").param("n", "1");
        assert_eq!(Query::parse(&query.get()), query);
        assert!(Query::parse("").is_empty());
    }

    #[test]
    fn setting_same_value_is_observably_equal() {
        let query = Query::new().param("foo", "bar");
        assert_eq!(query.param("foo", "bar"), query);
    }

    #[test]
    fn display_matches_get() {
        let query = Query::new().param("foo", "bar");
        assert_eq!(query.to_string(), query.get());
    }
}
