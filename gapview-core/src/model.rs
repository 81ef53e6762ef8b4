//! Domain data structures for the country/year panel and its derived tables.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column-schema contract every source must normalize to.
pub mod columns {
    /// Country name column.
    pub const COUNTRY: &str = "country";
    /// Continent column (low-cardinality categorical).
    pub const CONTINENT: &str = "continent";
    /// Observation year column.
    pub const YEAR: &str = "year";
    /// Population measure column.
    pub const POPULATION: &str = "population";
    /// GDP per capita measure column.
    pub const GDP_PER_CAPITA: &str = "gdp_per_capita";
    /// Life expectancy measure column (years).
    pub const LIFE_EXPECTANCY: &str = "life_expectancy";

    /// Every column a source must provide, canonical spelling.
    pub const REQUIRED: [&str; 6] = [
        COUNTRY,
        CONTINENT,
        YEAR,
        POPULATION,
        GDP_PER_CAPITA,
        LIFE_EXPECTANCY,
    ];

    /// Map a raw header onto its canonical column name.
    ///
    /// Accepts both the canonical spellings and the abbreviated headers the
    /// raw reference data ships with (`pop`, `gdpPercap`, `lifeExp`).
    #[must_use]
    pub fn canonical(header: &str) -> Option<&'static str> {
        match header.trim() {
            "country" => Some(COUNTRY),
            "continent" => Some(CONTINENT),
            "year" => Some(YEAR),
            "population" | "pop" => Some(POPULATION),
            "gdp_per_capita" | "gdpPercap" => Some(GDP_PER_CAPITA),
            "life_expectancy" | "lifeExp" => Some(LIFE_EXPECTANCY),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One (country, year) observation of the panel.
pub struct Record {
    /// Country name.
    pub country: String,
    /// Continent the country belongs to.
    pub continent: String,
    /// Observation year.
    pub year: i32,
    /// Population count (non-negative).
    pub population: f64,
    /// GDP per capita (non-negative).
    pub gdp_per_capita: f64,
    /// Life expectancy in years (non-negative).
    pub life_expectancy: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Ordered sequence of records sharing the normalized schema.
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    /// Wrap already-normalized rows into a table.
    #[must_use]
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// All rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct years present in the table, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.rows
            .iter()
            .map(|row| row.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct continents present in the table, sorted by name.
    #[must_use]
    pub fn continents(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.continent.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl From<Vec<Record>> for Table {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Per-continent summary for a single selected year.
pub struct ContinentAggregate {
    /// Continent the group covers.
    pub continent: String,
    /// Sum of the group's population.
    pub total_population: f64,
    /// Mean of the group's GDP per capita.
    pub avg_gdp_per_capita: f64,
    /// Mean of the group's life expectancy, in years.
    pub avg_life_expectancy: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// How to reduce population within a (year, continent) trend group.
///
/// The two upstream dashboard variants disagreed here (one summed, one
/// averaged), so the reduction is an explicit parameter rather than a
/// hard-coded choice. `Sum` is the default.
pub enum TrendReduction {
    /// Total population of the continent for the year.
    #[default]
    Sum,
    /// Mean population across the continent's countries for the year.
    Mean,
}

impl fmt::Display for TrendReduction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendReduction::Sum => "sum",
            TrendReduction::Mean => "mean",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One point of the per-continent population trend series.
pub struct ContinentTrendPoint {
    /// Observation year.
    pub year: i32,
    /// Continent the point covers.
    pub continent: String,
    /// Population reduced by the requested [`TrendReduction`].
    pub population: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Extremal measure value together with the country that owns it.
pub struct MaxEntry {
    /// Country holding the maximum.
    pub country: String,
    /// The maximum value itself.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Key-insight metrics derived from the raw rows of one year.
pub struct YearSummary {
    /// Year the summary covers.
    pub year: i32,
    /// Highest life expectancy and its country.
    pub max_life_expectancy: MaxEntry,
    /// Highest GDP per capita and its country.
    pub max_gdp_per_capita: MaxEntry,
    /// Sum of population over the year's rows.
    pub total_population: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, continent: &str, year: i32) -> Record {
        Record {
            country: country.to_owned(),
            continent: continent.to_owned(),
            year,
            population: 1.0,
            gdp_per_capita: 1.0,
            life_expectancy: 1.0,
        }
    }

    #[test]
    fn years_are_distinct_and_ascending() {
        let table = Table::new(vec![
            row("A", "X", 2007),
            row("B", "X", 1952),
            row("C", "Y", 2007),
        ]);
        assert_eq!(table.years(), vec![1952, 2007]);
    }

    #[test]
    fn continents_are_distinct_and_sorted() {
        let table = Table::new(vec![
            row("A", "Oceania", 2000),
            row("B", "Africa", 2000),
            row("C", "Oceania", 2005),
        ]);
        assert_eq!(table.continents(), vec!["Africa", "Oceania"]);
    }

    #[test]
    fn canonical_accepts_raw_and_normalized_headers() {
        assert_eq!(columns::canonical("pop"), Some(columns::POPULATION));
        assert_eq!(columns::canonical("population"), Some(columns::POPULATION));
        assert_eq!(columns::canonical("gdpPercap"), Some(columns::GDP_PER_CAPITA));
        assert_eq!(columns::canonical("lifeExp"), Some(columns::LIFE_EXPECTANCY));
        assert_eq!(columns::canonical(" year "), Some(columns::YEAR));
        assert_eq!(columns::canonical("iso_code"), None);
    }

    #[test]
    fn required_columns_are_their_own_canonical_names() {
        for name in columns::REQUIRED {
            assert_eq!(columns::canonical(name), Some(name));
        }
    }
}
