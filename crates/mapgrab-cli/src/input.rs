//! Operator input file: one CSV of search terms and locations.
//!
//! Expected header is `search,location,country` (`city` is accepted as a
//! legacy alias for `location`). A row may carry any subset of the columns;
//! terms and locations are pooled independently and crossed later by the
//! query expander, which also owns deduplication and the
//! first-occurrence-wins country rule.

use std::io;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(default)]
    search: String,
    #[serde(default, alias = "city")]
    location: String,
    #[serde(default)]
    country: String,
}

/// Raw pools read from the input file, in file order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryInputs {
    pub terms: Vec<String>,
    pub locations: Vec<(String, String)>,
}

/// Reads the input CSV at `path`.
///
/// # Errors
///
/// Fails when the file is missing or a row cannot be parsed against the
/// header.
pub fn read_query_inputs(path: &Path) -> anyhow::Result<QueryInputs> {
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open input file {}: {e}", path.display()))?;
    read_from(file).map_err(|e| anyhow::anyhow!("cannot parse input file {}: {e}", path.display()))
}

fn read_from<R: io::Read>(reader: R) -> Result<QueryInputs, csv::Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut inputs = QueryInputs::default();

    for row in csv_reader.deserialize::<InputRow>() {
        let row = row?;
        let search = row.search.trim();
        let location = row.location.trim();
        let country = row.country.trim();

        if !search.is_empty() {
            inputs.terms.push(search.to_owned());
        }
        if !location.is_empty() {
            inputs
                .locations
                .push((location.to_owned(), country.to_owned()));
        }
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_terms_and_locations_independently() {
        let csv = "search,location,country\n\
                   clinic,kyiv,ua\n\
                   dentist,,\n\
                   ,kharkiv,ua\n";
        let inputs = read_from(csv.as_bytes()).unwrap();
        assert_eq!(inputs.terms, ["clinic", "dentist"]);
        assert_eq!(
            inputs.locations,
            [
                ("kyiv".to_owned(), "ua".to_owned()),
                ("kharkiv".to_owned(), "ua".to_owned())
            ]
        );
    }

    #[test]
    fn accepts_city_as_location_alias() {
        let csv = "search,city,country\nspa,odesa,ua\n";
        let inputs = read_from(csv.as_bytes()).unwrap();
        assert_eq!(inputs.locations, [("odesa".to_owned(), "ua".to_owned())]);
    }

    #[test]
    fn missing_country_column_defaults_to_empty() {
        let csv = "search,location\nspa,lviv\n";
        let inputs = read_from(csv.as_bytes()).unwrap();
        assert_eq!(inputs.locations, [("lviv".to_owned(), String::new())]);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let csv = "search,location,country\n  spa ,  lviv , ua \n";
        let inputs = read_from(csv.as_bytes()).unwrap();
        assert_eq!(inputs.terms, ["spa"]);
        assert_eq!(inputs.locations, [("lviv".to_owned(), "ua".to_owned())]);
    }

    #[test]
    fn empty_file_yields_empty_pools() {
        let inputs = read_from("search,location,country\n".as_bytes()).unwrap();
        assert_eq!(inputs, QueryInputs::default());
    }

    #[test]
    fn preserves_duplicate_locations_for_first_wins_expansion() {
        // Dedup is the expander's job; the reader must not reorder or drop.
        let csv = "search,location,country\nspa,odesa,ua\nspa,odesa,pl\n";
        let inputs = read_from(csv.as_bytes()).unwrap();
        assert_eq!(inputs.locations.len(), 2);
        assert_eq!(inputs.locations[0].1, "ua");
    }
}
