use gapview_core::model::ContinentAggregate;
use ratatui::{
    prelude::*,
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType,
        Paragraph, Tabs, Wrap,
    },
};

use crate::app::{App, Metric, Mode, View};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, insights strip, controls, view content, status
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, insights_area, controls_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header_text = format!(
        "gapview – {} · {} rows",
        app.service.describe(),
        app.service.table().len()
    );
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("Gapview"));
    frame.render_widget(header, *header_area);

    draw_insights(frame, app, *insights_area);
    draw_controls(frame, app, *controls_area);

    // Main content: either the active view or the file prompt
    match app.mode {
        Mode::FilePrompt => draw_file_prompt(frame, app, *content_area),
        Mode::Dashboard => match app.view {
            View::Comparison => draw_comparison(frame, app, *content_area),
            View::Scatter => draw_scatter(frame, app, *content_area),
            View::Trend => draw_trend(frame, app, *content_area),
        },
    }

    // Status bar
    let nav_hint = match app.mode {
        Mode::Dashboard => {
            "←/→ year · Tab view · 1/2/3 metric · r trend sum/mean · o open file · q/Ctrl-C quit"
        }
        Mode::FilePrompt => "Type a path (.csv or .xlsx) · Enter load · Esc cancel · Ctrl-C quit",
    };

    let status_text = if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_insights(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [life_area, gdp_area, pop_area] = chunks else {
        return;
    };

    let (life_text, gdp_text, pop_text) = match &app.summary {
        Some(summary) => (
            format!(
                "{:.1} years\n{}",
                summary.max_life_expectancy.value, summary.max_life_expectancy.country
            ),
            format!(
                "{}\n{}",
                format_money(summary.max_gdp_per_capita.value),
                summary.max_gdp_per_capita.country
            ),
            format!(
                "{}\nYear {}",
                format_population(summary.total_population),
                summary.year
            ),
        ),
        None => {
            let empty = "–\nno data".to_owned();
            (empty.clone(), empty.clone(), empty)
        }
    };

    let cells = [
        ("Highest life expectancy", life_text, *life_area),
        ("Highest GDP per capita", gdp_text, *gdp_area),
        ("Total population", pop_text, *pop_area),
    ];

    for (title, text, cell_area) in cells {
        let cell = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(cell, cell_area);
    }
}

fn draw_controls(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [tabs_area, year_area] = chunks else {
        return;
    };

    let tabs = Tabs::new(View::TITLES.to_vec())
        .block(Block::default().borders(Borders::ALL).title("View (Tab)"))
        .select(app.view.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, *tabs_area);

    let (ratio, label) = match app.selected_year() {
        Some(year) => (
            slider_ratio(app.year_index, app.years.len().saturating_sub(1)),
            format!("{year}"),
        ),
        None => (0.0, "no years".to_owned()),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Year (←/→)"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, *year_area);
}

fn draw_file_prompt(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let input = Paragraph::new(app.path_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Open dataset (.csv or .xlsx path, Enter to load)"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(input, area);
}

fn draw_comparison(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "{} by continent – {} (1 population · 2 GDP · 3 life exp)",
        metric_title(app.metric),
        year_label(app)
    );

    if app.aggregates.is_empty() {
        draw_placeholder(frame, area, &title);
        return;
    }

    let bars: Vec<Bar<'_>> = app
        .aggregates
        .iter()
        .map(|aggregate| {
            let value = metric_value(app.metric, aggregate);
            Bar::default()
                .label(Line::from(aggregate.continent.clone()))
                .value(to_bar_value(value))
                .text_value(metric_text(app.metric, value))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(14)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(chart, area);
}

fn draw_scatter(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!("GDP per capita vs life expectancy – {}", year_label(app));

    if app.slice.is_empty() {
        draw_placeholder(frame, area, &title);
        return;
    }

    // One series per continent, sorted for stable colors
    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for row in &app.slice {
        let point = (row.gdp_per_capita, row.life_expectancy);
        match series.iter_mut().find(|(name, _)| *name == row.continent) {
            Some((_, points)) => points.push(point),
            None => series.push((row.continent.clone(), vec![point])),
        }
    }
    series.sort_by(|left, right| left.0.cmp(&right.0));

    let x_max = fold_max(app.slice.iter().map(|row| row.gdp_per_capita));
    let y_min = fold_min(app.slice.iter().map(|row| row.life_expectancy));
    let y_max = fold_max(app.slice.iter().map(|row| row.life_expectancy));

    let x_bounds = [0.0, x_max * 1.05];
    let y_bounds = [(y_min - 5.0).max(0.0), y_max + 5.0];

    let datasets: Vec<Dataset<'_>> = series
        .iter()
        .enumerate()
        .map(|(idx, (name, points))| {
            Dataset::default()
                .name(name.as_str())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(continent_color(idx)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("GDP per capita")
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, format_money)),
        )
        .y_axis(
            Axis::default()
                .title("Life expectancy")
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, |value| format!("{value:.0}"))),
        );

    frame.render_widget(chart, area);
}

fn draw_trend(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!("Population trend by continent ({} · r toggles)", app.reduction);

    if app.trend.is_empty() {
        draw_placeholder(frame, area, &title);
        return;
    }

    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for point in &app.trend {
        let coord = (f64::from(point.year), point.population);
        match series.iter_mut().find(|(name, _)| *name == point.continent) {
            Some((_, points)) => points.push(coord),
            None => series.push((point.continent.clone(), vec![coord])),
        }
    }
    series.sort_by(|left, right| left.0.cmp(&right.0));

    let x_min = fold_min(app.trend.iter().map(|point| f64::from(point.year)));
    let x_max = fold_max(app.trend.iter().map(|point| f64::from(point.year)));
    let y_max = fold_max(app.trend.iter().map(|point| point.population));

    let x_bounds = [x_min, x_max];
    let y_bounds = [0.0, y_max * 1.1];

    let datasets: Vec<Dataset<'_>> = series
        .iter()
        .enumerate()
        .map(|(idx, (name, points))| {
            Dataset::default()
                .name(name.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(continent_color(idx)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Year")
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds, |value| format!("{value:.0}"))),
        )
        .y_axis(
            Axis::default()
                .title("Population")
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds, format_population)),
        );

    frame.render_widget(chart, area);
}

fn draw_placeholder(frame: &mut Frame<'_>, area: Rect, title: &str) {
    let paragraph = Paragraph::new("No data for this selection.")
        .block(Block::default().borders(Borders::ALL).title(title.to_owned()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn year_label(app: &App) -> String {
    app.selected_year()
        .map_or_else(|| "no year".to_owned(), |year| year.to_string())
}

fn metric_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Population => "Total population",
        Metric::GdpPerCapita => "Avg GDP per capita",
        Metric::LifeExpectancy => "Avg life expectancy",
    }
}

fn metric_value(metric: Metric, aggregate: &ContinentAggregate) -> f64 {
    match metric {
        Metric::Population => aggregate.total_population,
        Metric::GdpPerCapita => aggregate.avg_gdp_per_capita,
        Metric::LifeExpectancy => aggregate.avg_life_expectancy,
    }
}

fn metric_text(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Population => format_population(value),
        Metric::GdpPerCapita => format_money(value),
        Metric::LifeExpectancy => format!("{value:.1}y"),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "bar heights are non-negative measures"
)]
fn to_bar_value(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

#[allow(clippy::cast_precision_loss, reason = "year counts are tiny")]
fn slider_ratio(index: usize, span: usize) -> f64 {
    if span == 0 {
        1.0
    } else {
        index as f64 / span as f64
    }
}

fn continent_color(index: usize) -> Color {
    const PALETTE: [Color; 6] = [
        Color::Cyan,
        Color::Yellow,
        Color::Green,
        Color::Magenta,
        Color::Blue,
        Color::Red,
    ];
    PALETTE[index % PALETTE.len()]
}

fn axis_labels(bounds: [f64; 2], format: impl Fn(f64) -> String) -> Vec<String> {
    let [min, max] = bounds;
    let mid = f64::midpoint(min, max);
    vec![format(min), format(mid), format(max)]
}

fn fold_min(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

fn fold_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

fn format_population(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

fn format_money(value: f64) -> String {
    format!("${value:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_formats_into_display_units() {
        assert_eq!(format_population(6_510_000_000.0), "6.51B");
        assert_eq!(format_population(44_500_000.0), "44.5M");
        assert_eq!(format_population(2_500.0), "2.5K");
        assert_eq!(format_population(42.0), "42");
    }

    #[test]
    fn bar_values_never_go_negative() {
        assert_eq!(to_bar_value(-3.0), 0);
        assert_eq!(to_bar_value(2.6), 3);
    }
}
