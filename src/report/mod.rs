//! Review Analysis report orchestration
//!
//! `initialize` loads the store and drives the rendering collaborators in a
//! fixed order. Collaborators are optional: a renderer that does not
//! provide charts (or legends, or counters) turns those steps into no-ops,
//! so a missing collaborator never affects aggregation.

pub mod json;

pub use json::{JsonReport, LineChart, ReportDocument};

use serde::Serialize;

use crate::services::dates::DEFAULT_DATE_PATTERN;
use crate::services::providers;
use crate::services::{Aggregator, GroupOptions, ReviewStore, TimeSeriesBuilder};
use crate::types::{Premise, PremiseTotals, PublisherTotal, ReviewRecord};

/// Render targets, one per report element
pub mod targets {
    pub const LOCATIONS_COUNT: &str = "locations-count";
    pub const PUBLISHERS_COUNT: &str = "publishers-count";
    pub const PUBLISHER_DOUGHNUT: &str = "total-review-doughnut-publisher-chart";
    pub const PUBLISHER_LEGEND: &str = "total-review-doughnut-legend";
    pub const PUBLISHER_TREND: &str = "rating-trends-over-time-line-chart-publisher";
    pub const PROVIDERS: &str = "providers";
    pub const PREMISE_LEGEND: &str = "total-review-doughnut-premise-legend";
    pub const PREMISE_DOUGHNUT: &str = "total-review-doughnut-premise-chart";
    pub const PREMISE_TREND: &str = "rating-trends-over-time-line-chart-premise";
}

/// Line color for publishers missing from the registry
pub const FALLBACK_LINE_COLOR: &str = "#3b82f6";

/// Dataset label used by both totals doughnuts
pub const TOTALS_DATASET_LABEL: &str = "Reviews";

/// One line in a rating-trend chart.
///
/// `data` is aligned to the chart labels; `None` is a gap the renderer
/// skips (or encodes with its own sentinel).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub color: String,
}

/// Totals doughnut input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoughnutChart {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub colors: Vec<Option<String>>,
    pub dataset_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: Option<String>,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderBadge {
    pub label: String,
    pub color: Option<String>,
    pub on_premises: Option<bool>,
    /// Normalized label key for icon lookup
    pub icon: Option<String>,
}

/// Chart drawing collaborator
pub trait ChartRenderer {
    fn render_doughnut(&mut self, target: &str, chart: &DoughnutChart);
    fn render_line(&mut self, target: &str, labels: &[String], datasets: &[LineDataset]);
}

/// Legend and badge collaborator
pub trait LegendRenderer {
    fn render_legend(&mut self, target: &str, items: &[LegendItem]);
    fn render_providers(&mut self, target: &str, badges: &[ProviderBadge]);
}

/// Plain integer counters for display
pub trait CounterSink {
    fn set_counter(&mut self, target: &str, value: usize);
}

/// Gives access to whichever collaborators a renderer provides
pub trait ReportRenderer {
    fn charts(&mut self) -> Option<&mut dyn ChartRenderer> {
        None
    }

    fn legends(&mut self) -> Option<&mut dyn LegendRenderer> {
        None
    }

    fn counters(&mut self) -> Option<&mut dyn CounterSink> {
        None
    }
}

/// Report-level options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Pattern for axis day labels
    pub date_pattern: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

/// Counters and totals without charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub locations: usize,
    pub publishers: usize,
    pub reviews: usize,
    pub publisher_totals: Vec<PublisherTotal>,
    pub premise_totals: PremiseTotals,
}

impl Summary {
    pub fn from_store(store: &ReviewStore) -> Self {
        let views = store.publisher_views(&GroupOptions::default());
        Self {
            locations: store.distinct_location_count(),
            publishers: views.len(),
            reviews: store.current().len(),
            publisher_totals: Aggregator::publisher_totals(&views),
            premise_totals: Aggregator::premise_totals(&views),
        }
    }
}

/// Load the snapshot and render every report element in order:
/// counters, publisher totals chart + legend, publisher rating trend,
/// provider badges, premise totals legend + chart, premise rating trend.
pub fn initialize(
    store: &mut ReviewStore,
    snapshot: Vec<ReviewRecord>,
    renderer: &mut dyn ReportRenderer,
    options: &ReportOptions,
) {
    store.load(snapshot);
    let store = &*store;

    render_counters(store, renderer);
    render_publisher_totals(store, renderer);
    render_publisher_trend(store, renderer, options);
    render_provider_badges(store, renderer);
    render_premise_totals(store, renderer);
    render_premise_trend(store, renderer, options);
}

/// Distinct locations and publishers
pub fn render_counters(store: &ReviewStore, renderer: &mut dyn ReportRenderer) {
    let Some(counters) = renderer.counters() else {
        tracing::warn!("no counter collaborator, skipping counters");
        return;
    };
    counters.set_counter(targets::LOCATIONS_COUNT, store.distinct_location_count());
    counters.set_counter(targets::PUBLISHERS_COUNT, store.publisher_count());
}

/// Reviews per publisher as a doughnut plus a legend with counts
pub fn render_publisher_totals(store: &ReviewStore, renderer: &mut dyn ReportRenderer) {
    if !store.is_loaded() {
        return;
    }

    let views = store.publisher_views(&GroupOptions::default());
    let totals = Aggregator::publisher_totals(&views);

    match renderer.charts() {
        Some(charts) => {
            let chart = DoughnutChart {
                labels: totals.iter().map(|t| t.publisher.clone()).collect(),
                values: totals.iter().map(|t| t.count).collect(),
                colors: totals.iter().map(|t| t.color.map(String::from)).collect(),
                dataset_label: TOTALS_DATASET_LABEL.to_string(),
            };
            charts.render_doughnut(targets::PUBLISHER_DOUGHNUT, &chart);
        }
        None => tracing::warn!(target_id = targets::PUBLISHER_DOUGHNUT, "no chart collaborator"),
    }

    match renderer.legends() {
        Some(legends) => {
            let items: Vec<LegendItem> = totals
                .iter()
                .map(|t| LegendItem {
                    label: t.publisher.clone(),
                    color: t.color.map(String::from),
                    value: t.count,
                })
                .collect();
            legends.render_legend(targets::PUBLISHER_LEGEND, &items);
        }
        None => tracing::warn!(target_id = targets::PUBLISHER_LEGEND, "no legend collaborator"),
    }
}

/// Average rating per publisher over time
pub fn render_publisher_trend(
    store: &ReviewStore,
    renderer: &mut dyn ReportRenderer,
    options: &ReportOptions,
) {
    if !store.is_loaded() {
        return;
    }
    let Some(charts) = renderer.charts() else {
        tracing::warn!(target_id = targets::PUBLISHER_TREND, "no chart collaborator");
        return;
    };

    let groups = Aggregator::group_by_publisher(store.current(), &GroupOptions::raw());
    let axis = TimeSeriesBuilder::build_axis(&groups);
    let views = store.publisher_views(&GroupOptions::default());

    let datasets: Vec<LineDataset> = TimeSeriesBuilder::publisher_series(&groups, &axis, &views)
        .into_iter()
        .map(|s| LineDataset {
            label: s.publisher,
            data: s.values,
            color: s.color.unwrap_or(FALLBACK_LINE_COLOR).to_string(),
        })
        .collect();

    charts.render_line(
        targets::PUBLISHER_TREND,
        &axis.labels(&options.date_pattern),
        &datasets,
    );
}

/// Row of provider badges with premise classification
pub fn render_provider_badges(store: &ReviewStore, renderer: &mut dyn ReportRenderer) {
    if !store.is_loaded() {
        return;
    }
    let Some(legends) = renderer.legends() else {
        tracing::warn!(target_id = targets::PROVIDERS, "no legend collaborator");
        return;
    };

    let badges: Vec<ProviderBadge> = store
        .publisher_views(&GroupOptions::default())
        .into_iter()
        .map(|v| ProviderBadge {
            icon: providers::icon_key(&v.publisher),
            label: v.publisher,
            color: v.color.map(String::from),
            on_premises: v.on_premises,
        })
        .collect();
    legends.render_providers(targets::PROVIDERS, &badges);
}

/// Reviews split by on/off premises; empty buckets are left out
pub fn render_premise_totals(store: &ReviewStore, renderer: &mut dyn ReportRenderer) {
    if !store.is_loaded() {
        return;
    }

    let totals = Aggregator::premise_totals(&store.publisher_views(&GroupOptions::default()));
    let items: Vec<LegendItem> = [(Premise::On, totals.on), (Premise::Off, totals.off)]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(premise, count)| LegendItem {
            label: premise.label().to_string(),
            color: Some(premise.color().to_string()),
            value: count,
        })
        .collect();

    match renderer.legends() {
        Some(legends) => legends.render_legend(targets::PREMISE_LEGEND, &items),
        None => tracing::warn!(target_id = targets::PREMISE_LEGEND, "no legend collaborator"),
    }

    match renderer.charts() {
        Some(charts) => {
            let chart = DoughnutChart {
                labels: items.iter().map(|i| i.label.clone()).collect(),
                values: items.iter().map(|i| i.value).collect(),
                colors: items.iter().map(|i| i.color.clone()).collect(),
                dataset_label: TOTALS_DATASET_LABEL.to_string(),
            };
            charts.render_doughnut(targets::PREMISE_DOUGHNUT, &chart);
        }
        None => tracing::warn!(target_id = targets::PREMISE_DOUGHNUT, "no chart collaborator"),
    }
}

/// Average rating over time for on, off and any premises
pub fn render_premise_trend(
    store: &ReviewStore,
    renderer: &mut dyn ReportRenderer,
    options: &ReportOptions,
) {
    if !store.is_loaded() {
        return;
    }
    let Some(charts) = renderer.charts() else {
        tracing::warn!(target_id = targets::PREMISE_TREND, "no chart collaborator");
        return;
    };

    let groups = Aggregator::group_by_publisher(store.current(), &GroupOptions::raw());
    let axis = TimeSeriesBuilder::build_axis(&groups);
    let views = store.publisher_views(&GroupOptions::default());
    let series = TimeSeriesBuilder::premise_series(&groups, &axis, &views);

    let datasets: Vec<LineDataset> = Premise::ALL
        .into_iter()
        .map(|premise| LineDataset {
            label: premise.label().to_string(),
            data: series.get(premise).to_vec(),
            color: premise.color().to_string(),
        })
        .collect();

    charts.render_line(
        targets::PREMISE_TREND,
        &axis.labels(&options.date_pattern),
        &datasets,
    );
}
