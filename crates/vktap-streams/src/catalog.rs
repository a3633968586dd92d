//! The set of streams a run exposes.
//!
//! Registration keeps insertion order, which is also the order `sync` runs
//! streams in.

use serde_json::{json, Value};
use vktap_core::TapConfig;

use crate::definition::StreamKind;
use crate::error::StreamError;

/// Streams registered regardless of config, in discovery order.
const DEFAULT_STREAMS: [StreamKind; 4] = [
    StreamKind::GroupStat,
    StreamKind::Groups,
    StreamKind::GroupPosts,
    StreamKind::GroupPostsComments,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    streams: Vec<StreamKind>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default streams plus whatever the config's toggles enable.
    #[must_use]
    pub fn discover(config: &TapConfig) -> Self {
        let mut catalog = Self::new();
        for kind in DEFAULT_STREAMS {
            catalog.register(kind);
        }
        if config.include_story {
            catalog.register(StreamKind::Story);
        }
        if config.include_admin_groups {
            catalog.register(StreamKind::AdminGroups);
        }
        catalog
    }

    /// Register a stream. Registering the same kind twice is a no-op.
    pub fn register(&mut self, kind: StreamKind) {
        if !self.streams.contains(&kind) {
            self.streams.push(kind);
        }
    }

    #[must_use]
    pub fn streams(&self) -> &[StreamKind] {
        &self.streams
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<StreamKind> {
        self.streams.iter().copied().find(|k| k.name() == name)
    }

    /// Resolve a user selection against the catalog. An empty selection
    /// means every registered stream. Selected streams keep catalog order.
    ///
    /// # Errors
    ///
    /// [`StreamError::UnknownStream`] for the first name not registered.
    pub fn select(&self, names: &[String]) -> Result<Vec<StreamKind>, StreamError> {
        if names.is_empty() {
            return Ok(self.streams.clone());
        }
        if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(StreamError::UnknownStream(unknown.clone()));
        }
        Ok(self
            .streams
            .iter()
            .copied()
            .filter(|k| names.iter().any(|n| n == k.name()))
            .collect())
    }

    /// Discovery document: `{"streams": [...]}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let streams: Vec<Value> = self
            .streams
            .iter()
            .map(|kind| {
                json!({
                    "tap_stream_id": kind.name(),
                    "stream": kind.name(),
                    "schema": kind.schema().to_json(),
                    "key_properties": kind.primary_keys(),
                    "replication_key": kind.replication_key(),
                })
            })
            .collect();
        json!({ "streams": streams })
    }
}
