//! Built-in reference dataset: a bundled country/year panel in the raw
//! Gapminder column layout, normalized to the canonical schema at load time.

use gapview_core::model::{Record, Table};
use gapview_core::ports::{DatasetSource, SourceError};
use serde::Deserialize;

/// 28 countries across five continents, 1952–2007 in 5-year steps.
const RAW_CSV: &str = include_str!("../data/gapminder.csv");

const LABEL: &str = "built-in reference dataset";

/// Row as it appears in the bundled CSV, abbreviated headers and all.
#[derive(Debug, Deserialize)]
struct RawRow {
    country: String,
    continent: String,
    year: i32,
    #[serde(rename = "lifeExp")]
    life_expectancy: f64,
    #[serde(rename = "pop")]
    population: f64,
    #[serde(rename = "gdpPercap")]
    gdp_per_capita: f64,
}

impl From<RawRow> for Record {
    fn from(raw: RawRow) -> Self {
        Record {
            country: raw.country,
            continent: raw.continent,
            year: raw.year,
            population: raw.population,
            gdp_per_capita: raw.gdp_per_capita,
            life_expectancy: raw.life_expectancy,
        }
    }
}

/// Dataset source backed by the bundled reference panel.
pub struct GapminderSource;

impl DatasetSource for GapminderSource {
    fn describe(&self) -> &str {
        LABEL
    }

    fn load(&self) -> Result<Table, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(RAW_CSV.as_bytes());

        let mut rows = Vec::new();
        for raw in reader.deserialize::<RawRow>() {
            rows.push(raw?.into());
        }

        Ok(Table::new(rows))
    }
}

/// Build the built-in reference source.
#[must_use]
pub fn source() -> GapminderSource {
    GapminderSource
}
