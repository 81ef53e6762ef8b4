//! High-level facade that owns the active dataset and serves derived tables.

use tracing::debug;

use crate::aggregate;
use crate::model::{ContinentAggregate, ContinentTrendPoint, Table, TrendReduction, YearSummary};
use crate::ports::{DatasetSource, SourceError};

/// Public entry point for loading data and querying derived tables.
///
/// The service parses a source exactly once and keeps the resulting table
/// for the life of the source; interactions query the cached table. A new
/// load replaces the table wholesale, there is no incremental update.
pub struct DashboardService {
    source: Box<dyn DatasetSource>,
    table: Table,
}

impl DashboardService {
    /// Load the given source and make its table the active dataset.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the source fails to parse.
    pub fn open(source: Box<dyn DatasetSource>) -> Result<Self, SourceError> {
        let table = source.load()?;
        debug!(source = source.describe(), rows = table.len(), "dataset loaded");
        Ok(Self { source, table })
    }

    /// Swap in a new source, replacing the active table wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the new source fails to parse; the
    /// previously loaded table stays active in that case.
    pub fn replace(&mut self, source: Box<dyn DatasetSource>) -> Result<(), SourceError> {
        let table = source.load()?;
        debug!(source = source.describe(), rows = table.len(), "dataset replaced");
        self.source = source;
        self.table = table;
        Ok(())
    }

    /// Label describing the active source.
    #[must_use]
    pub fn describe(&self) -> &str {
        self.source.describe()
    }

    /// The currently loaded table.
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Per-continent aggregates for the given year.
    #[must_use]
    pub fn aggregates(&self, year: i32) -> Vec<ContinentAggregate> {
        aggregate::aggregate_by_continent(&self.table, year)
    }

    /// Per-continent population trend across all years.
    #[must_use]
    pub fn trend(&self, reduction: TrendReduction) -> Vec<ContinentTrendPoint> {
        aggregate::trend_by_continent(&self.table, reduction)
    }

    /// Key-insight metrics for the given year, `None` when it has no rows.
    #[must_use]
    pub fn summary(&self, year: i32) -> Option<YearSummary> {
        aggregate::summarize_year(&self.table, year)
    }
}
