//! Search-term × location query expansion.
//!
//! Expansion is a pure function: given a set of search terms and an ordered
//! collection of `(location, country)` pairs, it emits the full cross
//! product sorted by `(search_term, location)`. Duplicate location names
//! keep the country of their first occurrence, so re-running with the same
//! input file always yields the same plan.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("no search terms provided")]
    EmptyTerms,

    #[error("no locations provided")]
    EmptyLocations,
}

/// One planned search. Identity is the `(search_term, location)` pair;
/// `rendered_text` is derived and never used as a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub search_term: String,
    pub location: String,
    pub country_code: String,
    pub rendered_text: String,
}

/// Expands `terms` × `locations` into the sorted list of queries to run.
///
/// `locations` is taken in input order for first-occurrence-wins
/// deduplication by location name; the output itself is sorted and thus
/// independent of input ordering apart from that rule. Empty term strings
/// and empty location names are ignored.
///
/// # Errors
///
/// Returns [`ExpandError`] if either side of the product is empty after
/// filtering — an empty plan is a caller mistake, not a valid run.
pub fn expand_queries(
    terms: &[String],
    locations: &[(String, String)],
) -> Result<Vec<Query>, ExpandError> {
    let term_set: BTreeSet<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if term_set.is_empty() {
        return Err(ExpandError::EmptyTerms);
    }

    // First occurrence of a location name wins; later countries are dropped.
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut location_pairs: Vec<(&str, &str)> = Vec::new();
    for (location, country) in locations {
        let location = location.trim();
        if location.is_empty() || !seen.insert(location) {
            continue;
        }
        location_pairs.push((location, country.trim()));
    }
    if location_pairs.is_empty() {
        return Err(ExpandError::EmptyLocations);
    }
    location_pairs.sort_unstable_by_key(|(location, _)| *location);

    let mut queries = Vec::with_capacity(term_set.len() * location_pairs.len());
    for term in &term_set {
        for (location, country) in &location_pairs {
            queries.push(Query {
                search_term: (*term).to_owned(),
                location: (*location).to_owned(),
                country_code: (*country).to_owned(),
                rendered_text: format!("{term} {location}"),
            });
        }
    }

    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn locations(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(l, c)| ((*l).to_owned(), (*c).to_owned()))
            .collect()
    }

    #[test]
    fn expands_full_cross_product_sorted() {
        let queries = expand_queries(
            &terms(&["b", "a"]),
            &locations(&[("y", "c2"), ("x", "c1")]),
        )
        .unwrap();

        let rendered: Vec<&str> = queries.iter().map(|q| q.rendered_text.as_str()).collect();
        assert_eq!(rendered, ["a x", "a y", "b x", "b y"]);
        assert_eq!(queries[0].country_code, "c1");
        assert_eq!(queries[1].country_code, "c2");
        assert_eq!(queries[2].country_code, "c1");
        assert_eq!(queries[3].country_code, "c2");
    }

    #[test]
    fn output_is_independent_of_input_ordering() {
        let forward = expand_queries(
            &terms(&["clinic", "dentist"]),
            &locations(&[("kyiv", "ua"), ("lviv", "ua")]),
        )
        .unwrap();
        let reversed = expand_queries(
            &terms(&["dentist", "clinic"]),
            &locations(&[("lviv", "ua"), ("kyiv", "ua")]),
        )
        .unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn first_occurrence_country_wins_for_duplicate_locations() {
        let queries = expand_queries(
            &terms(&["spa"]),
            &locations(&[("odesa", "ua"), ("odesa", "pl")]),
        )
        .unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].country_code, "ua");
    }

    #[test]
    fn duplicate_terms_are_collapsed() {
        let queries =
            expand_queries(&terms(&["spa", "spa"]), &locations(&[("kyiv", "ua")])).unwrap();
        assert_eq!(queries.len(), 1);
    }

    #[test]
    fn empty_terms_fail() {
        let result = expand_queries(&[], &locations(&[("x", "c1")]));
        assert_eq!(result.unwrap_err(), ExpandError::EmptyTerms);
    }

    #[test]
    fn whitespace_only_terms_fail() {
        let result = expand_queries(&terms(&["  "]), &locations(&[("x", "c1")]));
        assert_eq!(result.unwrap_err(), ExpandError::EmptyTerms);
    }

    #[test]
    fn empty_locations_fail() {
        let result = expand_queries(&terms(&["a"]), &[]);
        assert_eq!(result.unwrap_err(), ExpandError::EmptyLocations);
    }

    #[test]
    fn empty_country_code_is_allowed() {
        let queries = expand_queries(&terms(&["a"]), &locations(&[("x", "")])).unwrap();
        assert_eq!(queries[0].country_code, "");
        assert_eq!(queries[0].rendered_text, "a x");
    }
}
