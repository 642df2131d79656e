//! JSON collaborator: collects every rendered element into one document

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    ChartRenderer, CounterSink, DoughnutChart, LegendItem, LegendRenderer, LineDataset,
    ProviderBadge, ReportRenderer,
};
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
}

/// Everything a report run rendered, keyed by target id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportDocument {
    pub counters: BTreeMap<String, usize>,
    pub doughnuts: BTreeMap<String, DoughnutChart>,
    pub legends: BTreeMap<String, Vec<LegendItem>>,
    pub lines: BTreeMap<String, LineChart>,
    pub providers: BTreeMap<String, Vec<ProviderBadge>>,
}

/// Renderer that provides all collaborators and records their output.
///
/// Re-rendering a target overwrites the previous value.
#[derive(Debug, Default)]
pub struct JsonReport {
    document: ReportDocument,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &ReportDocument {
        &self.document
    }

    pub fn into_document(self) -> ReportDocument {
        self.document
    }

    /// Pretty-printed document; gaps in line data serialize as `null`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }
}

impl ChartRenderer for JsonReport {
    fn render_doughnut(&mut self, target: &str, chart: &DoughnutChart) {
        self.document
            .doughnuts
            .insert(target.to_string(), chart.clone());
    }

    fn render_line(&mut self, target: &str, labels: &[String], datasets: &[LineDataset]) {
        self.document.lines.insert(
            target.to_string(),
            LineChart {
                labels: labels.to_vec(),
                datasets: datasets.to_vec(),
            },
        );
    }
}

impl LegendRenderer for JsonReport {
    fn render_legend(&mut self, target: &str, items: &[LegendItem]) {
        self.document
            .legends
            .insert(target.to_string(), items.to_vec());
    }

    fn render_providers(&mut self, target: &str, badges: &[ProviderBadge]) {
        self.document
            .providers
            .insert(target.to_string(), badges.to_vec());
    }
}

impl CounterSink for JsonReport {
    fn set_counter(&mut self, target: &str, value: usize) {
        self.document.counters.insert(target.to_string(), value);
    }
}

impl ReportRenderer for JsonReport {
    fn charts(&mut self) -> Option<&mut dyn ChartRenderer> {
        Some(self)
    }

    fn legends(&mut self) -> Option<&mut dyn LegendRenderer> {
        Some(self)
    }

    fn counters(&mut self) -> Option<&mut dyn CounterSink> {
        Some(self)
    }
}
