//! Unnesting of `stats.get` payloads into flat rows.
//!
//! A period payload nests up to three levels deep:
//! period → {`reach`, `visitors`} → {`age`, `cities`, `countries`, `sex`}.
//! Every breakdown entry becomes one row carrying the period's shared
//! scalars. Rows keep input order; nothing is sorted or deduplicated.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::StreamError;

/// Breakdown dimension of a statistics row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Age,
    City,
    Country,
    Sex,
}

impl Dimension {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Age => "age",
            Dimension::City => "city",
            Dimension::Country => "country",
            Dimension::Sex => "sex",
        }
    }
}

/// Which half of the period payload a row was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Reach,
    Visitors,
}

impl Source {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Reach => "reach",
            Source::Visitors => "visitors",
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// One period of `stats.get` output with `extended=1`.
///
/// `reach` and `visitors` are mandatory: a period without them means the
/// API contract changed, and deserialization fails.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodStats {
    pub period_from: i64,
    pub period_to: i64,
    #[serde(default, deserialize_with = "activity")]
    pub activity: Option<serde_json::Map<String, Value>>,
    pub reach: ReachStats,
    pub visitors: VisitorStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReachStats {
    pub reach: i64,
    pub reach_subscribers: i64,
    pub mobile_reach: i64,
    #[serde(flatten)]
    pub breakdowns: Breakdowns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitorStats {
    pub views: i64,
    pub visitors: i64,
    pub mobile_views: i64,
    #[serde(flatten)]
    pub breakdowns: Breakdowns,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Breakdowns {
    #[serde(default)]
    pub age: Vec<ValueBucket>,
    #[serde(default)]
    pub cities: Vec<NamedBucket>,
    #[serde(default)]
    pub countries: Vec<NamedBucket>,
    #[serde(default)]
    pub sex: Vec<ValueBucket>,
}

/// Age and sex buckets are labelled by `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueBucket {
    #[serde(deserialize_with = "label")]
    pub value: String,
    pub count: i64,
}

/// City and country buckets are labelled by `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedBucket {
    #[serde(deserialize_with = "label")]
    pub name: String,
    pub count: i64,
}

fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric label, got {other}"
        ))),
    }
}

/// An empty `activity` arrives as `[]`, `{}` or `null`; all mean absent.
fn activity<'de, D>(deserializer: D) -> Result<Option<serde_json::Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) if !map.is_empty() => Ok(Some(map)),
        Value::Object(_) | Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected an activity object, got {other}"
        ))),
    }
}

impl Breakdowns {
    /// Entries in emission order: age, cities, countries, sex.
    fn entries(&self) -> impl Iterator<Item = (Dimension, &str, i64)> + '_ {
        by_value(Dimension::Age, &self.age)
            .chain(by_name(Dimension::City, &self.cities))
            .chain(by_name(Dimension::Country, &self.countries))
            .chain(by_value(Dimension::Sex, &self.sex))
    }
}

fn by_value(
    dimension: Dimension,
    buckets: &[ValueBucket],
) -> impl Iterator<Item = (Dimension, &str, i64)> + '_ {
    buckets
        .iter()
        .map(move |b| (dimension, b.value.as_str(), b.count))
}

fn by_name(
    dimension: Dimension,
    buckets: &[NamedBucket],
) -> impl Iterator<Item = (Dimension, &str, i64)> + '_ {
    buckets
        .iter()
        .map(move |b| (dimension, b.name.as_str(), b.count))
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Scalars shared by every row of one period.
///
/// `activity` holds the already-prefixed `activity_<key>` fields; it is empty
/// when the period carried no `activity` object, so those fields are simply
/// absent from the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBase {
    pub period_from: i64,
    pub period_to: i64,
    #[serde(flatten)]
    pub activity: BTreeMap<String, Value>,
    pub mobile_reach: i64,
    pub total_reach: i64,
    pub reach_subscribers: i64,
    pub mobile_views: i64,
    pub total_views: i64,
    pub total_visitors: i64,
}

impl StatBase {
    #[must_use]
    pub fn from_period(period: &PeriodStats) -> Self {
        let activity = period
            .activity
            .iter()
            .flatten()
            .map(|(key, value)| (format!("activity_{key}"), value.clone()))
            .collect();

        Self {
            period_from: period.period_from,
            period_to: period.period_to,
            activity,
            mobile_reach: period.reach.mobile_reach,
            total_reach: period.reach.reach,
            reach_subscribers: period.reach.reach_subscribers,
            mobile_views: period.visitors.mobile_views,
            total_views: period.visitors.views,
            total_visitors: period.visitors.visitors,
        }
    }

    /// A new row: a copy of this base plus one breakdown observation.
    #[must_use]
    pub fn with_breakdown(
        &self,
        dimension: Dimension,
        value: &str,
        count: i64,
        source: Source,
    ) -> StatRow {
        StatRow {
            id: None,
            base: self.clone(),
            dimension,
            dimension_value: value.to_string(),
            count,
            source,
        }
    }
}

/// One (period × source × dimension × value) observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    /// Community id, stamped by the routine after flattening.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub base: StatBase,
    pub dimension: Dimension,
    pub dimension_value: String,
    pub count: i64,
    pub source: Source,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Decode a raw `stats.get` response into periods.
///
/// # Errors
///
/// Returns [`StreamError::Structural`] if the payload is not an array or any
/// period lacks a required field (`reach`, `visitors`, their scalars, or a
/// breakdown entry's label or count).
pub fn parse_periods(raw: Value) -> Result<Vec<PeriodStats>, StreamError> {
    let Value::Array(items) = raw else {
        return Err(StreamError::Structural {
            context: "stats.get".to_string(),
            reason: "expected an array of periods".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| StreamError::Structural {
                context: format!("stats.get period {index}"),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Flatten periods into rows, preserving input order.
#[must_use]
pub fn flatten_periods(periods: &[PeriodStats]) -> Vec<StatRow> {
    let mut rows = Vec::new();
    for period in periods {
        let base = StatBase::from_period(period);
        let sources = [
            (Source::Reach, &period.reach.breakdowns),
            (Source::Visitors, &period.visitors.breakdowns),
        ];
        for (source, breakdowns) in sources {
            rows.extend(
                breakdowns
                    .entries()
                    .map(|(dimension, value, count)| {
                        base.with_breakdown(dimension, value, count, source)
                    }),
            );
        }
    }
    rows
}

/// [`parse_periods`] followed by [`flatten_periods`].
///
/// # Errors
///
/// Propagates the structural errors of [`parse_periods`].
pub fn flatten_stats(raw: Value) -> Result<Vec<StatRow>, StreamError> {
    let periods = parse_periods(raw)?;
    Ok(flatten_periods(&periods))
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod tests;
