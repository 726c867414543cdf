//! Query-string construction for filtered list endpoints.

use url::form_urlencoded;

/// Builds `path?key=value&...`, skipping filters that are not set.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    path: String,
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    /// Start a query on the given endpoint path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pairs: Vec::new(),
        }
    }

    /// Append `key=value` if `value` is present and non-empty.
    pub fn param<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.pairs.push((key, value));
            }
        }
        self
    }

    /// Render the endpoint path with its encoded query.
    pub fn build(self) -> String {
        if self.pairs.is_empty() {
            return self.path;
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();

        format!("{}?{}", self.path, query)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A filter appears in the query exactly when it has a non-empty value.
        #[test]
        fn only_present_filters_appear(
            route_id in proptest::option::of(0i64..10_000),
            day in proptest::option::of("[A-Za-z]{0,9}"),
        ) {
            let path = QueryBuilder::new("/schedules")
                .param("route_id", route_id)
                .param("day_of_week", day.as_deref())
                .build();

            prop_assert_eq!(path.contains("route_id="), route_id.is_some());
            let day_sent = day.as_deref().is_some_and(|d| !d.is_empty());
            prop_assert_eq!(path.contains("day_of_week="), day_sent);
            prop_assert!(!path.contains("=&"));
            prop_assert!(!path.ends_with('='));
            prop_assert_eq!(path.contains('?'), route_id.is_some() || day_sent);
        }
    }
}
