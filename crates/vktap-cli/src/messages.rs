//! Singer wire messages written to stdout, one JSON object per line.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use vktap_streams::{Record, StreamKind};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub(crate) enum Message<'a> {
    Schema {
        stream: &'a str,
        schema: Value,
        key_properties: &'a [&'a str],
        bookmark_properties: Vec<&'a str>,
    },
    Record {
        stream: &'a str,
        record: &'a Record,
        time_extracted: DateTime<Utc>,
    },
    State {
        value: Value,
    },
}

impl<'a> Message<'a> {
    pub(crate) fn schema(kind: StreamKind) -> Self {
        Message::Schema {
            stream: kind.name(),
            schema: kind.schema().to_json(),
            key_properties: kind.primary_keys(),
            bookmark_properties: kind.replication_key().into_iter().collect(),
        }
    }

    pub(crate) fn record(
        kind: StreamKind,
        record: &'a Record,
        time_extracted: DateTime<Utc>,
    ) -> Self {
        Message::Record {
            stream: kind.name(),
            record,
            time_extracted,
        }
    }

    /// Serialize as a single line.
    pub(crate) fn write_to<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Highest replication-key value seen per stream.
#[derive(Debug, Default)]
pub(crate) struct Bookmarks {
    by_stream: BTreeMap<&'static str, (&'static str, i64)>,
}

impl Bookmarks {
    /// Fold `record` into its stream's bookmark. Streams without a
    /// replication key and records lacking an integer value are ignored.
    pub(crate) fn observe(&mut self, kind: StreamKind, record: &Record) {
        let Some(key) = kind.replication_key() else {
            return;
        };
        let Some(value) = record.get(key).and_then(Value::as_i64) else {
            return;
        };
        self.by_stream
            .entry(kind.name())
            .and_modify(|(_, max)| *max = (*max).max(value))
            .or_insert((key, value));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_stream.is_empty()
    }

    /// `{"bookmarks": {stream: {replication_key: max}}}`
    pub(crate) fn to_state(&self) -> Value {
        let bookmarks: serde_json::Map<String, Value> = self
            .by_stream
            .iter()
            .map(|(stream, (key, max))| {
                let mut bookmark = serde_json::Map::new();
                bookmark.insert((*key).to_string(), json!(max));
                ((*stream).to_string(), Value::Object(bookmark))
            })
            .collect();
        json!({ "bookmarks": bookmarks })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn line(message: &Message<'_>) -> Value {
        let mut buf = Vec::new();
        message.write_to(&mut buf).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn schema_message_carries_keys_and_bookmarks() {
        let parsed = line(&Message::schema(StreamKind::GroupStat));
        assert_eq!(parsed["type"], "SCHEMA");
        assert_eq!(parsed["stream"], "groupStat");
        assert_eq!(
            parsed["key_properties"],
            json!(["id", "period_from", "dimension", "source"])
        );
        assert_eq!(parsed["bookmark_properties"], json!(["period_from"]));

        let posts = line(&Message::schema(StreamKind::GroupPosts));
        assert_eq!(posts["bookmark_properties"], json!([]));
    }

    #[test]
    fn record_message_stamps_extraction_time() {
        let rec = record(json!({ "id": 42 }));
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let parsed = line(&Message::record(StreamKind::Groups, &rec, at));
        assert_eq!(parsed["type"], "RECORD");
        assert_eq!(parsed["stream"], "group");
        assert_eq!(parsed["record"]["id"], 42);
        assert_eq!(parsed["time_extracted"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn bookmarks_keep_the_maximum() {
        let mut bookmarks = Bookmarks::default();
        for from in [200, 300, 100] {
            bookmarks.observe(StreamKind::GroupStat, &record(json!({ "period_from": from })));
        }
        bookmarks.observe(StreamKind::GroupPosts, &record(json!({ "post_id": 1 })));

        assert_eq!(
            bookmarks.to_state(),
            json!({ "bookmarks": { "groupStat": { "period_from": 300 } } })
        );
        let parsed = line(&Message::State { value: bookmarks.to_state() });
        assert_eq!(parsed["type"], "STATE");
    }

    #[test]
    fn no_replicated_records_means_no_bookmarks() {
        let mut bookmarks = Bookmarks::default();
        bookmarks.observe(StreamKind::Groups, &record(json!({ "id": 1 })));
        assert!(bookmarks.is_empty());
    }
}
