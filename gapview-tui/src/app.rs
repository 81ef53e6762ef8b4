use gapview_core::{
    aggregate::year_slice,
    model::{ContinentAggregate, ContinentTrendPoint, Record, TrendReduction, YearSummary},
    service::DashboardService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Comparison,
    Scatter,
    Trend,
}

impl View {
    pub(crate) const TITLES: [&'static str; 3] = ["Comparison", "Scatter", "Trend"];

    pub(crate) fn index(self) -> usize {
        match self {
            View::Comparison => 0,
            View::Scatter => 1,
            View::Trend => 2,
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            View::Comparison => View::Scatter,
            View::Scatter => View::Trend,
            View::Trend => View::Comparison,
        }
    }
}

/// Measure shown by the comparison bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Metric {
    Population,
    GdpPerCapita,
    LifeExpectancy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Dashboard,
    FilePrompt,
}

pub(crate) struct App {
    pub service: DashboardService,

    pub mode: Mode,
    pub view: View,
    pub metric: Metric,
    pub reduction: TrendReduction,

    pub years: Vec<i32>,
    pub year_index: usize,

    pub path_input: String,
    pub error_message: Option<String>,

    // Derived tables for the current (table, year) state. Recomputed via
    // `recompute` on every state change, never updated in place.
    pub aggregates: Vec<ContinentAggregate>,
    pub slice: Vec<Record>,
    pub trend: Vec<ContinentTrendPoint>,
    pub summary: Option<YearSummary>,
}

impl App {
    pub(crate) fn new(service: DashboardService) -> Self {
        let mut app = Self {
            service,
            mode: Mode::Dashboard,
            view: View::Comparison,
            metric: Metric::Population,
            reduction: TrendReduction::default(),
            years: Vec::new(),
            year_index: 0,
            path_input: String::new(),
            error_message: None,
            aggregates: Vec::new(),
            slice: Vec::new(),
            trend: Vec::new(),
            summary: None,
        };
        app.reset_years();
        app.recompute();
        app
    }

    pub(crate) fn selected_year(&self) -> Option<i32> {
        self.years.get(self.year_index).copied()
    }

    /// Move the year slider left or right, clamped to the table's range.
    pub(crate) fn step_year(&mut self, forward: bool) {
        let changed = if forward {
            if self.year_index + 1 < self.years.len() {
                self.year_index += 1;
                true
            } else {
                false
            }
        } else if self.year_index > 0 {
            self.year_index -= 1;
            true
        } else {
            false
        };

        if changed {
            self.recompute();
        }
    }

    pub(crate) fn select_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    pub(crate) fn toggle_reduction(&mut self) {
        self.reduction = match self.reduction {
            TrendReduction::Sum => TrendReduction::Mean,
            TrendReduction::Mean => TrendReduction::Sum,
        };
        self.recompute();
    }

    /// Reset the slider to the dataset's years, defaulting to the newest.
    pub(crate) fn reset_years(&mut self) {
        self.years = self.service.table().years();
        self.year_index = self.years.len().saturating_sub(1);
    }

    /// Recompute every derived table from the current dataset and filter
    /// state. The transforms are pure; this is the only place the UI asks
    /// for them.
    pub(crate) fn recompute(&mut self) {
        match self.selected_year() {
            Some(year) => {
                self.aggregates = self.service.aggregates(year);
                self.slice = year_slice(self.service.table(), year).cloned().collect();
                self.summary = self.service.summary(year);
            }
            None => {
                self.aggregates.clear();
                self.slice.clear();
                self.summary = None;
            }
        }
        self.trend = self.service.trend(self.reduction);
    }
}
