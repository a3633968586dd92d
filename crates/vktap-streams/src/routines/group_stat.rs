//! Daily community statistics, flattened per breakdown entry.

use chrono::{DateTime, Duration, TimeZone};
use vktap_api::{StatsQuery, VkGateway};
use vktap_core::TapConfig;

use crate::error::StreamError;
use crate::flatten::{flatten_stats, StatRow};
use crate::schema::{Property, Schema};

pub const NAME: &str = "groupStat";
pub const PRIMARY_KEYS: &[&str] = &["id", "period_from", "dimension", "source"];
pub const REPLICATION_KEY: &str = "period_from";

const INTERVAL: &str = "day";

/// Unix seconds of midnight, in `now`'s time zone, `days` days before `now`.
///
/// Falls back to the unshifted instant when that midnight does not exist
/// locally (a DST gap at 00:00).
#[must_use]
pub fn lookback_start<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> i64 {
    let start = now.clone() - Duration::days(i64::from(days));
    start
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
        .map_or_else(|| start.timestamp(), |dt| dt.timestamp())
}

#[must_use]
pub fn schema() -> Schema {
    Schema::new(vec![
        Property::integer("id").describe("The group's system ID"),
        Property::integer("period_from"),
        Property::integer("period_to"),
        Property::integer("activity_comments"),
        Property::integer("activity_copies"),
        Property::integer("activity_hidden"),
        Property::integer("activity_likes"),
        Property::integer("activity_subscribed"),
        Property::integer("activity_unsubscribed"),
        Property::integer("mobile_reach"),
        Property::integer("total_reach"),
        Property::integer("reach_subscribers"),
        Property::integer("mobile_views"),
        Property::integer("total_views"),
        Property::integer("total_visitors"),
        Property::string("dimension").describe("One of age, city, country, sex"),
        Property::string("dimension_value"),
        Property::integer("count"),
        Property::string("source").describe("One of reach, visitors"),
    ])
}

/// Fetch daily statistics from `timestamp_from` onwards and flatten them,
/// stamping every row with the configured community id.
///
/// # Errors
///
/// Gateway failures and malformed periods are fatal.
pub async fn extract<G: VkGateway>(
    gateway: &G,
    config: &TapConfig,
    timestamp_from: i64,
) -> Result<Vec<StatRow>, StreamError> {
    let query = StatsQuery {
        group_id: config.group_id,
        app_id: config.app_id,
        timestamp_from,
        interval: INTERVAL,
        extended: true,
    };
    let raw = gateway.stats_get(&query).await?;

    let mut rows = flatten_stats(raw)?;
    for row in &mut rows {
        row.id = Some(config.group_id);
    }

    tracing::info!(
        stream = NAME,
        group_id = config.group_id,
        timestamp_from,
        rows = rows.len(),
        "extraction complete"
    );
    Ok(rows)
}
