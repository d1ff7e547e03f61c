//! Query parameters.
//!
//! [`QueryParams`] is an ordered map: keys keep the position of their first insertion and
//! re-inserting a key replaces its value in place. When appended to a URL:
//!
//! | Value | Encoding |
//! |-------|----------|
//! | [`ParamValue::Null`] | omitted |
//! | `Single("")` | omitted |
//! | `Single(v)` | `key=v` |
//! | `List([a, b])` | `key=a&key=b` |
//!
//! # Examples
//!
//! ```
//! use invoice_api::{ParamValue, QueryParams};
//! use url::Url;
//!
//! let params = QueryParams::new()
//!     .with("a", ParamValue::Null)
//!     .with("b", vec!["x", "y"])
//!     .with("c", "");
//!
//! let mut url = Url::parse("http://host/api/items").unwrap();
//! params.append_to(&mut url);
//! assert_eq!(url.as_str(), "http://host/api/items?b=x&b=y");
//! ```

use url::Url;

/// A single query parameter value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ParamValue {
    /// Absent; never encoded.
    #[default]
    Null,
    /// One value; dropped when empty.
    Single(String),
    /// Repeated key, one entry per element, in order.
    List(Vec<String>),
}

impl ParamValue {
    fn is_omitted(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::Single(v) => v.is_empty(),
            ParamValue::List(_) => false,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Single(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Single(value.to_string())
    }
}

macro_rules! param_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Single(value.to_string())
                }
            }
        )*
    };
}

param_from_display!(i32, i64, u8, u16, u32, u64, usize, f64);

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for ParamValue {
    fn from(values: &[T]) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Ordered key/value query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an existing value without moving it.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over entries in insertion order, including omitted ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries, including omitted ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append the encodable entries to `url`'s query string.
    ///
    /// The URL is left untouched when nothing is encodable, so no dangling `?` appears.
    pub fn append_to(&self, url: &mut Url) {
        let mut encodable = self.entries.iter().filter(|(_, v)| !v.is_omitted()).peekable();
        if encodable.peek().is_none() {
            return;
        }

        let mut pairs = url.query_pairs_mut();
        for (key, value) in encodable {
            match value {
                ParamValue::Single(v) => {
                    pairs.append_pair(key, v);
                }
                ParamValue::List(values) => {
                    for v in values {
                        pairs.append_pair(key, v);
                    }
                }
                ParamValue::Null => {}
            }
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl From<()> for QueryParams {
    fn from(_: ()) -> Self {
        QueryParams::new()
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> From<Vec<(K, V)>> for QueryParams {
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}
