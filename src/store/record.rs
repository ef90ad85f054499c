use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// Header multimap that keeps names in arrival order and values per name in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `name`. Names compare case-insensitively; the
    /// spelling of the first occurrence is kept.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderList
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HeaderList::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// A request as seen on the wire, before it has been given an identity
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub protocol_version: String,
    pub headers: HeaderList,
    pub body: Vec<u8>,
    pub remote_address: String,
}

/// A captured request held by the store. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub id: u64,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub protocol_version: String,
    pub headers: HeaderList,
    pub body: Vec<u8>,
    pub captured_at: DateTime<Utc>,
    pub remote_address: String,
}

impl RequestRecord {
    pub(crate) fn from_captured(id: u64, request: CapturedRequest, captured_at: DateTime<Utc>) -> Self {
        Self {
            id,
            method: request.method,
            path: request.path,
            query: request.query,
            protocol_version: request.protocol_version,
            headers: request.headers,
            body: request.body,
            captured_at,
            remote_address: request.remote_address,
        }
    }

    /// Path plus query string, as the client sent it
    pub fn target(&self) -> Cow<'_, str> {
        match &self.query {
            Some(query) => Cow::Owned(format!("{}?{}", self.path, query)),
            None => Cow::Borrowed(&self.path),
        }
    }

    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
