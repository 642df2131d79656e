//! Time-series builder: unified date axis and average-rating series
//!
//! Works on the raw (unformatted) publisher grouping so that axis keys and
//! review dates share one representation. Every series is index-aligned
//! with the axis; dates without ratings are `None`, never zero.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::aggregator::PublisherGroups;
use crate::services::dates;
use crate::types::{PremiseSeries, PublisherSeries, PublisherView, SimplifiedReview};

/// Chronological axis of raw ISO date strings.
///
/// One point per distinct instant. Raw strings that parse to the same
/// instant ("...T00:00:00Z" and "...T00:00:00.000Z") share a point; the
/// first one seen is kept as the point's key.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeAxis {
    dates: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl TimeAxis {
    /// Raw date keys, ascending
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Axis index for a raw date string
    pub fn position(&self, raw: &str) -> Option<usize> {
        self.positions.get(raw).copied()
    }

    /// Human-facing day labels, one per point
    pub fn labels(&self, pattern: &str) -> Vec<String> {
        self.dates.iter().map(|d| dates::day_label(d, pattern)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RatingStats {
    sum: f64,
    count: u32,
}

impl RatingStats {
    fn add(&mut self, rating: f64) {
        self.sum += rating;
        self.count += 1;
    }

    fn average(self) -> Option<f64> {
        (self.count > 0).then(|| round2(self.sum / f64::from(self.count)))
    }
}

/// Round to 2 decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builder for the date axis and rating series
pub struct TimeSeriesBuilder;

impl TimeSeriesBuilder {
    /// Union of all review dates, sorted by instant.
    ///
    /// Dates that fail to parse cannot be ordered and are left off the
    /// axis; those reviews still count in the totals views.
    pub fn build_axis(groups: &PublisherGroups) -> TimeAxis {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut parsed: Vec<(DateTime<Utc>, &str)> = Vec::new();
        let mut excluded = 0usize;

        for raw in groups
            .values()
            .flatten()
            .filter_map(|item| item.date.as_deref())
        {
            if !seen.insert(raw) {
                continue;
            }
            match dates::parse(raw) {
                Some(instant) => parsed.push((instant, raw)),
                None => excluded += 1,
            }
        }

        if excluded > 0 {
            tracing::debug!(excluded, "unparseable dates left off the time axis");
        }

        // stable: first-seen raw string leads each instant
        parsed.sort_by_key(|(instant, _)| *instant);

        let mut axis = TimeAxis::default();
        let mut last: Option<DateTime<Utc>> = None;
        for (instant, raw) in parsed {
            if last != Some(instant) {
                axis.dates.push(raw.to_string());
                last = Some(instant);
            }
            axis.positions.insert(raw.to_string(), axis.dates.len() - 1);
        }

        axis
    }

    fn accumulate(items: &[SimplifiedReview], axis: &TimeAxis, stats: &mut [RatingStats]) {
        for item in items {
            let (Some(raw), Some(rating)) = (item.date.as_deref(), item.rating) else {
                continue;
            };
            if !rating.is_finite() {
                continue;
            }
            if let Some(idx) = axis.position(raw) {
                stats[idx].add(rating);
            }
        }
    }

    fn averages(stats: &[RatingStats]) -> Vec<Option<f64>> {
        stats.iter().map(|s| s.average()).collect()
    }

    /// One average-rating series per publisher view.
    ///
    /// A view without a matching group still gets an all-`None` series.
    pub fn publisher_series(
        groups: &PublisherGroups,
        axis: &TimeAxis,
        views: &[PublisherView],
    ) -> Vec<PublisherSeries> {
        views
            .iter()
            .map(|view| {
                let mut stats = vec![RatingStats::default(); axis.len()];
                if let Some(items) = groups.get(&view.publisher) {
                    Self::accumulate(items, axis, &mut stats);
                }
                PublisherSeries {
                    publisher: view.publisher.clone(),
                    color: view.color,
                    values: Self::averages(&stats),
                }
            })
            .collect()
    }

    /// Average-rating series per premise bucket.
    ///
    /// Publishers classified on-premises feed "on"; all others, including
    /// publishers missing from the registry, feed "off". Every rating also
    /// feeds "any".
    pub fn premise_series(
        groups: &PublisherGroups,
        axis: &TimeAxis,
        views: &[PublisherView],
    ) -> PremiseSeries {
        let on_premises: HashMap<&str, bool> = views
            .iter()
            .map(|v| (v.publisher.as_str(), v.on_premises == Some(true)))
            .collect();

        let mut on = vec![RatingStats::default(); axis.len()];
        let mut off = vec![RatingStats::default(); axis.len()];
        let mut any = vec![RatingStats::default(); axis.len()];

        for (publisher, items) in groups {
            let bucket = if on_premises.get(publisher.as_str()).copied().unwrap_or(false) {
                &mut on
            } else {
                &mut off
            };
            Self::accumulate(items, axis, bucket);
            Self::accumulate(items, axis, &mut any);
        }

        PremiseSeries {
            on: Self::averages(&on),
            off: Self::averages(&off),
            any: Self::averages(&any),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aggregator::{Aggregator, GroupOptions};
    use crate::types::{LocationId, ReviewRecord};

    fn make_record(publisher: &str, date: &str, rating: Option<f64>) -> ReviewRecord {
        let mut record = ReviewRecord::new(publisher, date);
        record.rating = rating;
        record
    }

    fn scenario() -> Vec<ReviewRecord> {
        vec![
            make_record("Google", "2025-07-01T00:00:00.000Z", Some(4.0)).with_location(1_i64),
            make_record("Google", "2025-07-01T00:00:00.000Z", Some(5.0)).with_location(2_i64),
            make_record("Yelp", "2025-07-02T00:00:00.000Z", Some(3.0))
                .with_location(LocationId::from(1_i64)),
        ]
    }

    fn build(records: &[ReviewRecord]) -> (PublisherGroups, TimeAxis, Vec<PublisherView>) {
        let groups = Aggregator::group_by_publisher(records, &GroupOptions::raw());
        let axis = TimeSeriesBuilder::build_axis(&groups);
        let views = Aggregator::to_publisher_views(records, &GroupOptions::default());
        (groups, axis, views)
    }

    fn series_for<'a>(series: &'a [PublisherSeries], publisher: &str) -> &'a [Option<f64>] {
        &series
            .iter()
            .find(|s| s.publisher == publisher)
            .unwrap()
            .values
    }

    // ========== round2() ==========

    #[test]
    fn test_round2() {
        assert_eq!(round2(4.5), 4.5);
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(4.125), 4.13);
        assert_eq!(round2(5.0), 5.0);
    }

    // ========== build_axis() ==========

    #[test]
    fn test_axis_scenario() {
        let (_, axis, _) = build(&scenario());
        assert_eq!(
            axis.dates(),
            ["2025-07-01T00:00:00.000Z", "2025-07-02T00:00:00.000Z"]
        );
    }

    #[test]
    fn test_axis_empty() {
        let axis = TimeSeriesBuilder::build_axis(&PublisherGroups::new());
        assert!(axis.is_empty());
        assert_eq!(axis.len(), 0);
    }

    #[test]
    fn test_axis_sorted_across_publishers() {
        let records = vec![
            make_record("Yelp", "2025-07-03T00:00:00Z", Some(3.0)),
            make_record("Google", "2025-07-05T00:00:00Z", Some(3.0)),
            make_record("Facebook", "2025-07-01T00:00:00Z", Some(3.0)),
            make_record("Google", "2025-07-02T00:00:00Z", Some(3.0)),
        ];
        let (_, axis, _) = build(&records);
        assert_eq!(
            axis.dates(),
            [
                "2025-07-01T00:00:00Z",
                "2025-07-02T00:00:00Z",
                "2025-07-03T00:00:00Z",
                "2025-07-05T00:00:00Z"
            ]
        );
    }

    #[test]
    fn test_axis_excludes_unparseable() {
        let records = vec![
            make_record("Google", "not-a-date", Some(4.0)),
            make_record("Google", "2025-07-01T00:00:00Z", Some(4.0)),
        ];
        let (_, axis, _) = build(&records);
        assert_eq!(axis.dates(), ["2025-07-01T00:00:00Z"]);
        assert!(axis.position("not-a-date").is_none());
    }

    #[test]
    fn test_axis_strictly_ascending_without_duplicate_instants() {
        let records = vec![
            make_record("Google", "2025-07-01T00:00:00Z", Some(4.0)),
            make_record("Yelp", "2025-07-01T00:00:00.000Z", Some(2.0)),
            make_record("Yelp", "2025-07-01T02:00:00+02:00", Some(3.0)),
            make_record("Yelp", "2025-06-30T00:00:00Z", Some(3.0)),
        ];
        let (_, axis, _) = build(&records);

        let instants: Vec<DateTime<Utc>> = axis
            .dates()
            .iter()
            .map(|d| dates::parse(d).unwrap())
            .collect();
        assert_eq!(instants.len(), 2);
        assert!(instants.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_axis_same_instant_variants_share_a_point() {
        let records = vec![
            make_record("Google", "2025-07-01T00:00:00Z", Some(4.0)),
            make_record("Google", "2025-07-01T00:00:00.000Z", Some(5.0)),
        ];
        let (groups, axis, views) = build(&records);

        assert_eq!(axis.len(), 1);
        assert_eq!(axis.position("2025-07-01T00:00:00Z"), Some(0));
        assert_eq!(axis.position("2025-07-01T00:00:00.000Z"), Some(0));

        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series_for(&series, "Google"), [Some(4.5)]);
    }

    #[test]
    fn test_axis_includes_basic_offset_dates() {
        let records = vec![
            make_record("Google", "2025-07-01T00:00:00.000+0000", Some(4.0)),
            make_record("Google", "2025-07-01T00:00:00Z", Some(5.0)),
            make_record("Yelp", "2025-07-02T00:00:00.000+0000", Some(3.0)),
        ];
        let (groups, axis, views) = build(&records);

        assert_eq!(axis.len(), 2);
        assert_eq!(axis.position("2025-07-01T00:00:00.000+0000"), Some(0));
        assert_eq!(axis.position("2025-07-02T00:00:00.000+0000"), Some(1));

        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series_for(&series, "Google"), [Some(4.5), None]);
        assert_eq!(series_for(&series, "Yelp"), [None, Some(3.0)]);
    }

    #[test]
    fn test_axis_labels() {
        let (_, axis, _) = build(&scenario());
        assert_eq!(
            axis.labels(dates::DEFAULT_DATE_PATTERN),
            vec!["07-01-2025", "07-02-2025"]
        );
        assert_eq!(axis.labels("MMM d"), vec!["Jul 1", "Jul 2"]);
    }

    // ========== publisher_series() ==========

    #[test]
    fn test_publisher_series_scenario() {
        let (groups, axis, views) = build(&scenario());
        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);

        assert_eq!(series.len(), 2);
        assert_eq!(series_for(&series, "Google"), [Some(4.5), None]);
        assert_eq!(series_for(&series, "Yelp"), [None, Some(3.0)]);
    }

    #[test]
    fn test_publisher_series_single_rating() {
        let records = vec![make_record("Google", "2025-07-01T00:00:00Z", Some(5.0))];
        let (groups, axis, views) = build(&records);
        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series[0].values, vec![Some(5.0)]);
    }

    #[test]
    fn test_publisher_series_excludes_missing_ratings() {
        let records = vec![
            make_record("Google", "2025-07-01T00:00:00Z", None),
            make_record("Google", "2025-07-01T00:00:00Z", Some(2.0)),
            make_record("Google", "2025-07-02T00:00:00Z", None),
        ];
        let (groups, axis, views) = build(&records);
        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series[0].values, vec![Some(2.0), None]);
    }

    #[test]
    fn test_publisher_series_rounds_to_two_decimals() {
        let records = vec![
            make_record("Google", "2025-07-01T00:00:00Z", Some(4.0)),
            make_record("Google", "2025-07-01T00:00:00Z", Some(4.0)),
            make_record("Google", "2025-07-01T00:00:00Z", Some(5.0)),
        ];
        let (groups, axis, views) = build(&records);
        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series[0].values, vec![Some(4.33)]);
    }

    #[test]
    fn test_publisher_series_view_without_group() {
        let (groups, axis, mut views) = build(&scenario());
        views.push(PublisherView {
            publisher: "Facebook".into(),
            color: Some("#91B1D5"),
            on_premises: Some(true),
            data: Vec::new(),
        });
        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series_for(&series, "Facebook"), [None, None]);
    }

    #[test]
    fn test_series_length_matches_axis() {
        for n in [0usize, 1, 5] {
            let records: Vec<ReviewRecord> = (0..n)
                .map(|i| make_record("Google", &format!("2025-07-{:02}T00:00:00Z", i + 1), Some(4.0)))
                .collect();
            let (groups, axis, views) = build(&records);
            assert_eq!(axis.len(), n);

            for s in TimeSeriesBuilder::publisher_series(&groups, &axis, &views) {
                assert_eq!(s.values.len(), n);
            }
            let premise = TimeSeriesBuilder::premise_series(&groups, &axis, &views);
            assert_eq!(premise.on.len(), n);
            assert_eq!(premise.off.len(), n);
            assert_eq!(premise.any.len(), n);
        }
    }

    #[test]
    fn test_series_idempotent() {
        let (groups, axis, views) = build(&scenario());
        let a = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        let b = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(a, b);
        assert_eq!(axis, TimeSeriesBuilder::build_axis(&groups));
    }

    // ========== premise_series() ==========

    #[test]
    fn test_premise_series_scenario() {
        let (groups, axis, views) = build(&scenario());
        let premise = TimeSeriesBuilder::premise_series(&groups, &axis, &views);

        assert_eq!(premise.on, vec![Some(4.5), Some(3.0)]);
        assert_eq!(premise.off, vec![None, None]);
        assert_eq!(premise.any, vec![Some(4.5), Some(3.0)]);
    }

    #[test]
    fn test_premise_series_mixed() {
        let records = vec![
            make_record("Google", "2025-07-01T00:00:00Z", Some(5.0)),
            make_record("DoorDash", "2025-07-01T00:00:00Z", Some(2.0)),
            make_record("UberEats", "2025-07-02T00:00:00Z", Some(3.0)),
        ];
        let (groups, axis, views) = build(&records);
        let premise = TimeSeriesBuilder::premise_series(&groups, &axis, &views);

        assert_eq!(premise.on, vec![Some(5.0), None]);
        assert_eq!(premise.off, vec![Some(2.0), Some(3.0)]);
        assert_eq!(premise.any, vec![Some(3.5), Some(3.0)]);
    }

    #[test]
    fn test_premise_series_unknown_publisher_counts_as_off() {
        let records = vec![make_record("Foursquare", "2025-07-01T00:00:00Z", Some(4.0))];
        let (groups, axis, views) = build(&records);
        let premise = TimeSeriesBuilder::premise_series(&groups, &axis, &views);

        assert_eq!(premise.on, vec![None]);
        assert_eq!(premise.off, vec![Some(4.0)]);
        assert_eq!(premise.any, vec![Some(4.0)]);
    }

    #[test]
    fn test_unparseable_dates_invisible_in_series() {
        let records = vec![
            make_record("Google", "not-a-date", Some(1.0)),
            make_record("Google", "2025-07-01T00:00:00Z", Some(5.0)),
        ];
        let (groups, axis, views) = build(&records);
        let series = TimeSeriesBuilder::publisher_series(&groups, &axis, &views);
        assert_eq!(series[0].values, vec![Some(5.0)]);
        // still counted in the totals view
        assert_eq!(views[0].data.len(), 2);
    }
}
