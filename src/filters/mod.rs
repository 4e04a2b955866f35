//! Filter criteria carried in the URL query string.
//!
//! A [`FilterRegistry`] maps each logical filter to the query parameter that
//! stores it and the handler that parses it. Decoding reads every registered
//! filter from the query; encoding writes the non-empty criteria back.

mod menu;
mod options;
mod query;
pub mod ranges;

pub use menu::*;
pub use options::*;
pub use query::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query parameter holding the id of the cohort being viewed.
pub const COHORT_ID_PARAM: &str = "c";

/// A parsed filter value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Query form of this value; `None` for an empty list.
    pub fn to_query_value(&self) -> Option<QueryValue> {
        match self {
            FilterValue::Text(text) => Some(QueryValue::Single(text.clone())),
            FilterValue::Number(number) => Some(QueryValue::Single(number.to_string())),
            FilterValue::List(values) if values.is_empty() => None,
            FilterValue::List(values) => Some(QueryValue::Multi(values.clone())),
        }
    }
}

/// Filter name to parsed value. `None` means the filter is not applied.
pub type FilterCriteria = BTreeMap<String, Option<FilterValue>>;

/// Parses the raw query value of one filter; receives `None` when absent.
pub type FilterHandler = fn(Option<&QueryValue>) -> Option<FilterValue>;

/// Every value of the parameter, as a list.
pub fn as_list(value: Option<&QueryValue>) -> Option<FilterValue> {
    value.map(|v| FilterValue::List(v.values().into_iter().map(str::to_string).collect()))
}

/// First value of the parameter.
pub fn as_text(value: Option<&QueryValue>) -> Option<FilterValue> {
    value
        .and_then(QueryValue::first)
        .map(|v| FilterValue::Text(v.to_string()))
}

/// First value of the parameter parsed as a number.
pub fn as_number(value: Option<&QueryValue>) -> Option<FilterValue> {
    value
        .and_then(QueryValue::first)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(FilterValue::Number)
}

/// One filter: where it lives in the URL and which menu populates it.
#[derive(Debug, Clone, Serialize)]
pub struct FilterDefinition {
    pub filter: String,
    pub param: String,
    #[serde(skip)]
    pub handler: FilterHandler,
    pub key: String,
    pub options: MenuOptions,
}

impl FilterDefinition {
    pub fn new(filter: &str, param: &str, key: &str, handler: FilterHandler) -> Self {
        Self {
            filter: filter.to_string(),
            param: param.to_string(),
            handler,
            key: key.to_string(),
            options: Vec::new(),
        }
    }
}

/// Ordered set of filter definitions.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    definitions: Vec<FilterDefinition>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(vec![
            FilterDefinition::new("advisorLdapUids", "a", "advisorLdapUid", as_list),
            FilterDefinition::new("gpaRanges", "g", "gpaRanges", as_list),
            FilterDefinition::new("groupCodes", "t", "groupCodes", as_list),
            FilterDefinition::new("levels", "l", "levels", as_list),
            FilterDefinition::new("majors", "m", "majors", as_list),
            FilterDefinition::new("unitRanges", "u", "unitRanges", as_list),
            FilterDefinition::new("intensive", "i", "intensive", as_text),
            FilterDefinition::new("inactive", "v", "inactive", as_text),
            FilterDefinition::new("page", "p", "page", as_number),
        ])
    }
}

impl FilterRegistry {
    pub fn new(definitions: Vec<FilterDefinition>) -> Self {
        Self { definitions }
    }

    /// A copy of every definition, for menus to populate.
    pub fn definitions(&self) -> Vec<FilterDefinition> {
        self.definitions.clone()
    }

    pub fn by_filter(&self, filter: &str) -> Option<&FilterDefinition> {
        self.definitions.iter().find(|d| d.filter == filter)
    }

    pub fn by_key(&self, key: &str) -> Option<&FilterDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    /// Read every registered filter from `params`.
    pub fn decode(&self, params: &QueryParams) -> FilterCriteria {
        self.definitions
            .iter()
            .map(|d| (d.filter.clone(), (d.handler)(params.get(&d.param))))
            .collect()
    }

    pub fn decode_location(&self, location: &Location) -> FilterCriteria {
        self.decode(&location.search)
    }

    /// Write the applied criteria as query parameters.
    ///
    /// Unknown filter names, `None` values and empty lists are dropped. When
    /// two filters share a parameter the later entry wins.
    pub fn encode(&self, criteria: &FilterCriteria) -> QueryParams {
        let mut params = QueryParams::new();
        for (filter, value) in criteria {
            let Some(value) = value else {
                continue;
            };
            match self.by_filter(filter) {
                Some(definition) => {
                    if let Some(query_value) = value.to_query_value() {
                        params.set(definition.param.clone(), query_value);
                    }
                }
                None => tracing::debug!("Dropping unregistered filter '{}'", filter),
            }
        }
        params
    }

    /// Replace the location's query with the encoded criteria.
    pub fn update_location(&self, location: &mut Location, criteria: &FilterCriteria) {
        location.reset_to_path();
        location.search = self.encode(criteria);
    }
}

/// Id of the cohort named by the `c` parameter.
pub fn cohort_id_from_location(location: &Location) -> Option<i64> {
    location
        .search
        .get(COHORT_ID_PARAM)
        .and_then(QueryValue::first)
        .and_then(|id| id.trim().parse().ok())
}
