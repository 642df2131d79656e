//! Aggregator service: groups reviews by publisher and derives totals

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::services::dates::{self, DEFAULT_DATE_PATTERN};
use crate::services::providers;
use crate::types::{
    LocationId, PremiseTotals, PublisherTotal, PublisherView, ReviewRecord, SimplifiedReview,
};

/// Publisher label → reviews in chronological order.
///
/// Keys iterate in sorted order, so repeated grouping of the same
/// snapshot yields identical output.
pub type PublisherGroups = BTreeMap<String, Vec<SimplifiedReview>>;

/// Options for publisher grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOptions {
    /// Format dates as day labels (otherwise the raw string is kept)
    pub format_date: bool,
    /// date-fns style label pattern
    pub date_pattern: String,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            format_date: true,
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

impl GroupOptions {
    /// Keep raw date strings (what the time-series builder needs)
    pub fn raw() -> Self {
        Self {
            format_date: false,
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }
}

/// Aggregator for publisher groupings and totals
pub struct Aggregator;

impl Aggregator {
    /// Group reviews by publisher, each group in chronological order.
    ///
    /// The whole input is sorted by parsed date before grouping and before
    /// formatting, since formatted labels do not sort chronologically.
    /// Unparseable dates sort last; ties keep input order.
    pub fn group_by_publisher(records: &[ReviewRecord], options: &GroupOptions) -> PublisherGroups {
        let mut sorted: Vec<(Option<DateTime<Utc>>, &ReviewRecord)> = records
            .iter()
            .map(|r| (r.date.as_deref().and_then(|d| dates::parse(d)), r))
            .collect();
        // stable: equal keys keep input order
        sorted.sort_by_key(|(instant, _)| (instant.is_none(), *instant));

        let mut groups = PublisherGroups::new();
        let mut skipped = 0usize;

        for (_, record) in sorted {
            let Some(publisher) = record.publisher.as_deref() else {
                skipped += 1;
                continue;
            };
            groups
                .entry(publisher.to_string())
                .or_default()
                .push(Self::simplify(record, options));
        }

        if skipped > 0 {
            tracing::debug!(skipped, "records without publisher left out of grouping");
        }

        groups
    }

    fn simplify(record: &ReviewRecord, options: &GroupOptions) -> SimplifiedReview {
        let date = if options.format_date {
            record.date.as_deref().map(|raw| {
                dates::format_utc_day(raw, &options.date_pattern)
                    .unwrap_or_else(|| raw.to_string())
            })
        } else {
            record.date.clone()
        };

        SimplifiedReview {
            date,
            location_id: record.location_id.clone(),
            rating: record.rating,
        }
    }

    /// Group by publisher and attach registry metadata.
    ///
    /// Unknown publishers are kept with `None` color/classification.
    pub fn to_publisher_views(records: &[ReviewRecord], options: &GroupOptions) -> Vec<PublisherView> {
        Self::group_by_publisher(records, options)
            .into_iter()
            .map(|(publisher, data)| {
                let meta = providers::lookup(&publisher);
                if meta.is_none() {
                    tracing::debug!(publisher = %publisher, "publisher not in provider registry");
                }
                PublisherView {
                    color: meta.map(|m| m.color),
                    on_premises: meta.map(|m| m.on_premises),
                    publisher,
                    data,
                }
            })
            .collect()
    }

    /// Count distinct non-null location ids
    pub fn distinct_location_count(records: &[ReviewRecord]) -> usize {
        records
            .iter()
            .filter_map(|r| r.location_id.as_ref())
            .collect::<HashSet<&LocationId>>()
            .len()
    }

    /// Review count per publisher (every review counts, dated or not)
    pub fn publisher_totals(views: &[PublisherView]) -> Vec<PublisherTotal> {
        views
            .iter()
            .map(|v| PublisherTotal {
                publisher: v.publisher.clone(),
                color: v.color,
                count: v.data.len(),
            })
            .collect()
    }

    /// Review counts for on- and off-premises publishers
    pub fn premise_totals(views: &[PublisherView]) -> PremiseTotals {
        views
            .iter()
            .fold(PremiseTotals::default(), |mut totals, v| {
                match v.on_premises {
                    Some(true) => totals.on += v.data.len(),
                    Some(false) => totals.off += v.data.len(),
                    None => {}
                }
                totals
            })
    }
}
