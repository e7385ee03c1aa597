//! Lenient query-string access.
//!
//! Pages read their parameters as raw pairs so that repeated or unexpected
//! keys never turn into a 400. The first occurrence of a key wins.

/// Query pairs in request order, as extracted by `Query<QueryPairs>`.
pub type QueryPairs = Vec<(String, String)>;

/// The first value given for `key`, if any.
pub fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
