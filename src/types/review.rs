//! Review types: raw snapshot records and the structures derived from them

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::hash::{Hash, Hasher};

/// Location identifier as it appears in the snapshot.
///
/// Numbers and strings are distinct ids: `1` and `"1"` are two locations.
/// Numbers compare by value: `1` and `1.0` are one location.
#[derive(Debug, Clone)]
pub enum LocationId {
    Number(Number),
    Text(String),
}

impl LocationId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    fn key(&self) -> (u8, String) {
        match self {
            Self::Number(n) => (0, number_key(n)),
            Self::Text(s) => (1, s.clone()),
        }
    }
}

/// Numeric ids compare by value, so `1` and `1.0` are the same id
fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl PartialEq for LocationId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for LocationId {}

impl Hash for LocationId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Serialize for LocationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        Self::Number(Number::from(id))
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// Coerce a raw rating value to a finite number.
///
/// Finite JSON numbers pass through, numeric strings are parsed after
/// trimming. Empty strings, booleans, non-finite values and containers
/// yield `None`.
pub fn coerce_rating(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// A single review as loaded from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    /// Publisher label; `None` when missing or falsy (record is kept but never grouped)
    pub publisher: Option<String>,
    pub location_id: Option<LocationId>,
    /// Raw date string, kept verbatim as the grouping key
    pub date: Option<String>,
    /// Coerced rating (`None` when absent or not numeric)
    pub rating: Option<f64>,
}

impl ReviewRecord {
    pub fn new(publisher: impl Into<String>, date: impl Into<String>) -> Self {
        let publisher = publisher.into();
        let date = date.into();
        Self {
            publisher: (!publisher.is_empty()).then_some(publisher),
            location_id: None,
            date: (!date.is_empty()).then_some(date),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating.is_finite().then_some(rating);
        self
    }

    pub fn with_location(mut self, location_id: impl Into<LocationId>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// Build a record from one snapshot entry.
    ///
    /// Accepts the upstream PascalCase keys (`Publisher`, `LocationId`,
    /// `Date`, `Rating`) as well as camelCase. Returns `None` for non-object
    /// entries.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let publisher = field(obj, "Publisher", "publisher").and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        });

        let date = field(obj, "Date", "date").and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Some(Self {
            publisher,
            location_id: field(obj, "LocationId", "locationId").and_then(LocationId::from_value),
            date,
            rating: field(obj, "Rating", "rating").and_then(coerce_rating),
        })
    }
}

fn field<'a>(obj: &'a Map<String, Value>, pascal: &str, camel: &str) -> Option<&'a Value> {
    obj.get(pascal)
        .or_else(|| obj.get(camel))
        .filter(|v| !v.is_null())
}

/// Per-publisher projection of a review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedReview {
    /// Formatted day label or the raw date, depending on grouping options
    pub date: Option<String>,
    pub location_id: Option<LocationId>,
    pub rating: Option<f64>,
}

/// A publisher's reviews with registry metadata attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherView {
    pub publisher: String,
    /// `None` when the publisher is not in the registry
    pub color: Option<&'static str>,
    pub on_premises: Option<bool>,
    pub data: Vec<SimplifiedReview>,
}

/// Review count for one publisher (totals doughnut/legend)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherTotal {
    pub publisher: String,
    pub color: Option<&'static str>,
    pub count: usize,
}

/// Review counts split by premise classification.
///
/// Publishers with unknown classification count toward neither bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PremiseTotals {
    pub on: usize,
    pub off: usize,
}

/// Premise bucket for rating trends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Premise {
    On,
    Off,
    Any,
}

impl Premise {
    pub const ALL: [Premise; 3] = [Premise::On, Premise::Off, Premise::Any];

    pub fn label(self) -> &'static str {
        match self {
            Self::On => "On Premise",
            Self::Off => "Off Premise",
            Self::Any => "Any Premise",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::On => "#4A35A3",
            Self::Off => "#F6BA79",
            Self::Any => "#F4737E",
        }
    }
}

/// Average-rating series for one publisher, aligned to the time axis.
///
/// `None` marks an axis date without ratings for this publisher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherSeries {
    pub publisher: String,
    pub color: Option<&'static str>,
    pub values: Vec<Option<f64>>,
}

/// Average-rating series per premise bucket, aligned to the time axis
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PremiseSeries {
    pub on: Vec<Option<f64>>,
    pub off: Vec<Option<f64>>,
    pub any: Vec<Option<f64>>,
}

impl PremiseSeries {
    pub fn get(&self, premise: Premise) -> &[Option<f64>] {
        match premise {
            Premise::On => &self.on,
            Premise::Off => &self.off,
            Premise::Any => &self.any,
        }
    }
}
