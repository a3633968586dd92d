//! `discover` and `sync` command handlers.
//!
//! Streams run one after another in catalog order. The first stream error
//! aborts the whole run; isolated per-item failures never reach this layer.

use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use vktap_core::TapConfig;
use vktap_streams::{run_stream, Catalog};

use crate::messages::{Bookmarks, Message};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SyncSummary {
    pub(crate) streams: usize,
    pub(crate) records: usize,
}

/// Write the discovery document for `config`.
pub(crate) fn run_discover<W: Write>(config: &TapConfig, out: &mut W) -> anyhow::Result<()> {
    let catalog = Catalog::discover(config);
    serde_json::to_writer_pretty(&mut *out, &catalog.to_json())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Run the selected streams (all discovered ones when `selected` is empty)
/// and write their messages to `out`, followed by one STATE message when any
/// stream produced a bookmark.
pub(crate) async fn run_sync<W: Write>(
    config: &TapConfig,
    selected: &[String],
    out: &mut W,
) -> anyhow::Result<SyncSummary> {
    let kinds = Catalog::discover(config).select(selected)?;
    let mut bookmarks = Bookmarks::default();
    let mut summary = SyncSummary::default();

    for kind in kinds {
        Message::schema(kind).write_to(out)?;

        let records = run_stream(kind, config)
            .await
            .with_context(|| format!("stream {} failed", kind.name()))?;

        let time_extracted = Utc::now();
        for record in &records {
            bookmarks.observe(kind, record);
            Message::record(kind, record, time_extracted).write_to(out)?;
        }

        summary.streams += 1;
        summary.records += records.len();
    }

    if !bookmarks.is_empty() {
        Message::State {
            value: bookmarks.to_state(),
        }
        .write_to(out)?;
    }

    Ok(summary)
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
