//! URL query parameters and the browser location they live in.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};

/// Base used to resolve path-only locations.
const LOCATION_BASE: &str = "http://localhost/";

fn location_base() -> Url {
    Url::parse(LOCATION_BASE).expect("static base URL is valid")
}

/// Value of one query parameter. A repeated key yields `Multi`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// Every value, in query order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(v) => vec![v.as_str()],
            QueryValue::Multi(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Single(v) => Some(v.as_str()),
            QueryValue::Multi(vs) => vs.first().map(String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(existing) => {
                *self = QueryValue::Multi(vec![std::mem::take(existing), value]);
            }
            QueryValue::Multi(vs) => vs.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

/// Query parameters keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryParams(BTreeMap<String, QueryValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut url = location_base();
        url.set_query(Some(query));
        Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    fn from_pairs(pairs: impl Iterator<Item = (String, String)>) -> Self {
        let mut params = Self::new();
        for (key, value) in pairs {
            match params.0.get_mut(&key) {
                Some(existing) => existing.push(value),
                None => {
                    params.0.insert(key, QueryValue::Single(value));
                }
            }
        }
        params
    }

    pub fn get(&self, param: &str) -> Option<&QueryValue> {
        self.0.get(param)
    }

    /// Set a parameter, replacing any previous value.
    pub fn set(&mut self, param: impl Into<String>, value: QueryValue) {
        self.0.insert(param.into(), value);
    }

    pub fn remove(&mut self, param: &str) -> Option<QueryValue> {
        self.0.remove(param)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.0.iter()
    }

    /// Render as a form-urlencoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut url = location_base();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.0 {
                for v in value.values() {
                    pairs.append_pair(key, v);
                }
            }
        }
        url.query().unwrap_or_default().to_string()
    }
}

/// Path plus query parameters, the part of the browser URL the filters use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    path: String,
    pub search: QueryParams,
}

impl Location {
    /// Parse `path?query`. Absolute URLs are accepted; only path and query are kept.
    pub fn parse(location: &str) -> Result<Self> {
        let base = location_base();
        let url = base.join(location).map_err(|e| {
            ClientError::Validation(format!("Invalid location '{}': {}", location, e))
        })?;
        Ok(Self {
            path: url.path().to_string(),
            search: QueryParams::from_pairs(
                url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())),
            ),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Drop every query parameter, keeping the path.
    pub fn reset_to_path(&mut self) {
        self.search.clear();
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.search.to_query_string())
        }
    }
}
