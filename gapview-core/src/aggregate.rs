//! Pure grouping and reduction over a normalized table.
//!
//! Every function here is total over a well-formed [`Table`]: a year with no
//! matching rows yields an empty result, never an error, and the input table
//! is never mutated.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{
    ContinentAggregate, ContinentTrendPoint, MaxEntry, Record, Table, TrendReduction, YearSummary,
};

/// Running sums for one group of rows.
#[derive(Debug, Default)]
struct GroupSums {
    population: f64,
    gdp_per_capita: f64,
    life_expectancy: f64,
    count: usize,
}

impl GroupSums {
    fn push(&mut self, row: &Record) {
        self.population += row.population;
        self.gdp_per_capita += row.gdp_per_capita;
        self.life_expectancy += row.life_expectancy;
        self.count += 1;
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "group sizes are far below 2^52"
    )]
    fn mean_divisor(&self) -> f64 {
        self.count as f64
    }
}

/// Rows of the table observed in the given year, in source order.
pub fn year_slice(table: &Table, year: i32) -> impl Iterator<Item = &Record> {
    table.rows().iter().filter(move |row| row.year == year)
}

/// Per-continent aggregates for a single selected year.
///
/// Rows are filtered to `year` (no partial-year fallback), grouped by
/// continent, and reduced: population summed, GDP per capita and life
/// expectancy averaged. Output is sorted by continent name; a year with no
/// rows yields an empty vector.
#[must_use]
pub fn aggregate_by_continent(table: &Table, year: i32) -> Vec<ContinentAggregate> {
    let mut groups: BTreeMap<&str, GroupSums> = BTreeMap::new();
    for row in year_slice(table, year) {
        groups.entry(row.continent.as_str()).or_default().push(row);
    }

    debug!(year, continents = groups.len(), "aggregated year slice");

    groups
        .into_iter()
        .map(|(continent, sums)| {
            let divisor = sums.mean_divisor();
            ContinentAggregate {
                continent: continent.to_owned(),
                total_population: sums.population,
                avg_gdp_per_capita: sums.gdp_per_capita / divisor,
                avg_life_expectancy: sums.life_expectancy / divisor,
            }
        })
        .collect()
}

/// Per-continent population series across all years of the table.
///
/// Rows are grouped by `(year, continent)` and population is reduced by the
/// requested [`TrendReduction`]. Output is ordered by year ascending, then
/// continent name. A continent absent in some year contributes no point for
/// that year rather than a zero-valued one.
#[must_use]
pub fn trend_by_continent(table: &Table, reduction: TrendReduction) -> Vec<ContinentTrendPoint> {
    let mut groups: BTreeMap<(i32, &str), GroupSums> = BTreeMap::new();
    for row in table.rows() {
        groups
            .entry((row.year, row.continent.as_str()))
            .or_default()
            .push(row);
    }

    debug!(%reduction, points = groups.len(), "computed trend series");

    groups
        .into_iter()
        .map(|((year, continent), sums)| {
            let population = match reduction {
                TrendReduction::Sum => sums.population,
                TrendReduction::Mean => sums.population / sums.mean_divisor(),
            };
            ContinentTrendPoint {
                year,
                continent: continent.to_owned(),
                population,
            }
        })
        .collect()
}

/// Key-insight metrics for the raw rows of one year.
///
/// Derived from the year slice itself, not from the continent aggregate.
/// Returns `None` when the year has no rows. Ties on a maximum go to the
/// lexicographically lowest country name.
#[must_use]
pub fn summarize_year(table: &Table, year: i32) -> Option<YearSummary> {
    let mut rows = year_slice(table, year);
    let first = rows.next()?;

    let mut max_life = MaxEntry {
        country: first.country.clone(),
        value: first.life_expectancy,
    };
    let mut max_gdp = MaxEntry {
        country: first.country.clone(),
        value: first.gdp_per_capita,
    };
    let mut total_population = first.population;

    for row in rows {
        replace_if_greater(&mut max_life, &row.country, row.life_expectancy);
        replace_if_greater(&mut max_gdp, &row.country, row.gdp_per_capita);
        total_population += row.population;
    }

    Some(YearSummary {
        year,
        max_life_expectancy: max_life,
        max_gdp_per_capita: max_gdp,
        total_population,
    })
}

fn replace_if_greater(best: &mut MaxEntry, country: &str, value: f64) {
    let replace = match value.partial_cmp(&best.value) {
        Some(Ordering::Greater) => true,
        Some(Ordering::Equal) => country < best.country.as_str(),
        _ => false,
    };
    if replace {
        best.country = country.to_owned();
        best.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        country: &str,
        continent: &str,
        year: i32,
        population: f64,
        gdp_per_capita: f64,
        life_expectancy: f64,
    ) -> Record {
        Record {
            country: country.to_owned(),
            continent: continent.to_owned(),
            year,
            population,
            gdp_per_capita,
            life_expectancy,
        }
    }

    fn sample() -> Table {
        Table::new(vec![
            row("A", "X", 2000, 10.0, 100.0, 50.0),
            row("B", "X", 2000, 20.0, 300.0, 70.0),
            row("C", "Y", 2000, 5.0, 900.0, 80.0),
            row("A", "X", 2005, 12.0, 120.0, 52.0),
            row("B", "X", 2005, 22.0, 320.0, 72.0),
        ])
    }

    #[test]
    fn aggregates_match_worked_scenario() {
        let table = Table::new(vec![
            row("A", "X", 2000, 10.0, 100.0, 50.0),
            row("B", "X", 2000, 20.0, 300.0, 70.0),
        ]);

        let aggregates = aggregate_by_continent(&table, 2000);
        assert_eq!(
            aggregates,
            vec![ContinentAggregate {
                continent: "X".to_owned(),
                total_population: 30.0,
                avg_gdp_per_capita: 200.0,
                avg_life_expectancy: 60.0,
            }]
        );
    }

    #[test]
    fn one_entry_per_continent_in_the_slice() {
        let aggregates = aggregate_by_continent(&sample(), 2000);
        let continents: Vec<&str> = aggregates
            .iter()
            .map(|aggregate| aggregate.continent.as_str())
            .collect();
        assert_eq!(continents, vec!["X", "Y"]);
    }

    #[test]
    fn total_population_is_conserved() {
        let table = sample();
        let aggregates = aggregate_by_continent(&table, 2000);

        let aggregated: f64 = aggregates
            .iter()
            .map(|aggregate| aggregate.total_population)
            .sum();
        let raw: f64 = year_slice(&table, 2000).map(|row| row.population).sum();

        assert!((aggregated - raw).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_gdp_stays_within_group_bounds() {
        let table = sample();
        for aggregate in aggregate_by_continent(&table, 2000) {
            let values: Vec<f64> = year_slice(&table, 2000)
                .filter(|row| row.continent == aggregate.continent)
                .map(|row| row.gdp_per_capita)
                .collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(aggregate.avg_gdp_per_capita >= min);
            assert!(aggregate.avg_gdp_per_capita <= max);
        }
    }

    #[test]
    fn empty_year_yields_empty_sequence() {
        assert!(aggregate_by_continent(&sample(), 1900).is_empty());
        assert!(summarize_year(&sample(), 1900).is_none());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let table = sample();
        assert_eq!(
            aggregate_by_continent(&table, 2000),
            aggregate_by_continent(&table, 2000)
        );
        assert_eq!(
            trend_by_continent(&table, TrendReduction::Sum),
            trend_by_continent(&table, TrendReduction::Sum)
        );
    }

    #[test]
    fn trend_has_one_point_per_present_pair() {
        // Continent Y only exists in 2000, so it contributes no 2005 point.
        let trend = trend_by_continent(&sample(), TrendReduction::Sum);
        let keys: Vec<(i32, &str)> = trend
            .iter()
            .map(|point| (point.year, point.continent.as_str()))
            .collect();
        assert_eq!(keys, vec![(2000, "X"), (2000, "Y"), (2005, "X")]);
    }

    #[test]
    fn trend_reductions_differ_as_documented() {
        let table = sample();

        let sum = trend_by_continent(&table, TrendReduction::Sum);
        let mean = trend_by_continent(&table, TrendReduction::Mean);

        assert!((sum[0].population - 30.0).abs() < f64::EPSILON);
        assert!((mean[0].population - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_uses_raw_rows_and_breaks_ties_low() {
        let table = Table::new(vec![
            row("B", "X", 2000, 10.0, 500.0, 70.0),
            row("A", "X", 2000, 20.0, 100.0, 70.0),
            row("C", "Y", 2000, 5.0, 500.0, 60.0),
        ]);

        let summary = summarize_year(&table, 2000).unwrap();
        assert_eq!(summary.max_life_expectancy.country, "A");
        assert!((summary.max_life_expectancy.value - 70.0).abs() < f64::EPSILON);
        assert_eq!(summary.max_gdp_per_capita.country, "B");
        assert!((summary.total_population - 35.0).abs() < f64::EPSILON);
    }
}
