//! Static stream declarations and their binding to routines.

use serde::Serialize;
use serde_json::Value;
use vktap_api::VkGateway;
use vktap_core::{ConfigError, TapConfig};

use crate::error::StreamError;
use crate::isolation::IsolationPolicy;
use crate::projector::project_rows;
use crate::routines::{admin_groups, comments, group_stat, groups, posts, story};
use crate::schema::Schema;

/// One output record: a flat JSON object.
pub type Record = serde_json::Map<String, Value>;

/// Every stream the tap knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Groups,
    GroupPosts,
    GroupPostsComments,
    GroupStat,
    Story,
    AdminGroups,
}

impl StreamKind {
    pub const ALL: [StreamKind; 6] = [
        StreamKind::GroupStat,
        StreamKind::Groups,
        StreamKind::GroupPosts,
        StreamKind::GroupPostsComments,
        StreamKind::Story,
        StreamKind::AdminGroups,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StreamKind::Groups => groups::NAME,
            StreamKind::GroupPosts => posts::NAME,
            StreamKind::GroupPostsComments => comments::NAME,
            StreamKind::GroupStat => group_stat::NAME,
            StreamKind::Story => story::NAME,
            StreamKind::AdminGroups => admin_groups::NAME,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    #[must_use]
    pub fn primary_keys(self) -> &'static [&'static str] {
        match self {
            StreamKind::Groups => groups::PRIMARY_KEYS,
            StreamKind::GroupPosts => posts::PRIMARY_KEYS,
            StreamKind::GroupPostsComments => comments::PRIMARY_KEYS,
            StreamKind::GroupStat => group_stat::PRIMARY_KEYS,
            StreamKind::Story => story::PRIMARY_KEYS,
            StreamKind::AdminGroups => admin_groups::PRIMARY_KEYS,
        }
    }

    #[must_use]
    pub fn replication_key(self) -> Option<&'static str> {
        match self {
            StreamKind::GroupStat => Some(group_stat::REPLICATION_KEY),
            _ => None,
        }
    }

    /// How per-item failures are confined, for streams that fan out.
    ///
    /// A failed reach call keeps the post with zeroed counters; a failed
    /// comment listing or story-stats call drops that item.
    #[must_use]
    pub fn isolation_policy(self) -> Option<IsolationPolicy> {
        match self {
            StreamKind::GroupPosts => Some(IsolationPolicy::ZeroFill),
            StreamKind::GroupPostsComments | StreamKind::Story => Some(IsolationPolicy::Skip),
            StreamKind::Groups | StreamKind::GroupStat | StreamKind::AdminGroups => None,
        }
    }

    #[must_use]
    pub fn schema(self) -> Schema {
        match self {
            StreamKind::Groups => groups::schema(),
            StreamKind::GroupPosts => posts::schema(),
            StreamKind::GroupPostsComments => comments::schema(),
            StreamKind::GroupStat => group_stat::schema(),
            StreamKind::Story => story::schema(),
            StreamKind::AdminGroups => admin_groups::schema(),
        }
    }

    /// The access token this stream's session authenticates with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] when the admin-groups stream runs
    /// without `params`.
    pub fn token(self, config: &TapConfig) -> Result<&str, ConfigError> {
        match self {
            StreamKind::AdminGroups => config
                .params
                .as_ref()
                .map(|p| p.token.as_str())
                .ok_or_else(|| ConfigError::MissingField("params.token".to_string())),
            _ => Ok(config.token.as_str()),
        }
    }

    /// Run the stream's routine and turn its rows into schema-conformant
    /// records.
    ///
    /// # Errors
    ///
    /// Propagates routine failures; fails with [`StreamError::Serialize`] if
    /// rows cannot be encoded.
    pub async fn produce_records<G: VkGateway>(
        self,
        gateway: &G,
        config: &TapConfig,
    ) -> Result<Vec<Record>, StreamError> {
        let assembled = match self {
            StreamKind::Groups => self.assemble(&groups::extract(gateway, config).await?)?,
            StreamKind::GroupPosts => self.assemble(&posts::extract(gateway, config).await?)?,
            StreamKind::GroupPostsComments => {
                self.assemble(&comments::extract(gateway, config).await?)?
            }
            StreamKind::GroupStat => {
                let timestamp_from =
                    group_stat::lookback_start(&chrono::Local::now(), config.lookback_days);
                self.assemble(&group_stat::extract(gateway, config, timestamp_from).await?)?
            }
            StreamKind::Story => self.assemble(&story::extract(gateway, config).await?)?,
            StreamKind::AdminGroups => {
                self.assemble(&admin_groups::extract(gateway, config).await?)?
            }
        };

        let mut records = project_rows(self.name(), assembled)?;
        let schema = self.schema();
        for record in &mut records {
            let dropped = schema.conform(record);
            if !dropped.is_empty() {
                tracing::debug!(stream = self.name(), ?dropped, "dropped undeclared fields");
            }
            let mismatched = schema.type_mismatches(record);
            if !mismatched.is_empty() {
                tracing::warn!(stream = self.name(), ?mismatched, "fields do not match schema types");
            }
        }
        Ok(records)
    }

    fn assemble<T: Serialize>(self, rows: &[T]) -> Result<Value, StreamError> {
        serde_json::to_value(rows).map_err(|source| StreamError::Serialize {
            stream: self.name().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in StreamKind::ALL {
            assert_eq!(StreamKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(StreamKind::from_name("groupstat"), None);
    }

    #[test]
    fn primary_keys_are_declared_properties() {
        for kind in StreamKind::ALL {
            let schema = kind.schema();
            for key in kind.primary_keys() {
                assert!(schema.get(key).is_some(), "{} lacks {key}", kind.name());
            }
        }
    }

    #[test]
    fn only_group_stat_replicates() {
        let replicated: Vec<StreamKind> = StreamKind::ALL
            .into_iter()
            .filter(|k| k.replication_key().is_some())
            .collect();
        assert_eq!(replicated, vec![StreamKind::GroupStat]);
    }

    #[test]
    fn fan_out_policies() {
        assert_eq!(
            StreamKind::GroupPosts.isolation_policy(),
            Some(IsolationPolicy::ZeroFill)
        );
        assert_eq!(
            StreamKind::GroupPostsComments.isolation_policy(),
            Some(IsolationPolicy::Skip)
        );
        assert_eq!(StreamKind::Story.isolation_policy(), Some(IsolationPolicy::Skip));
        assert_eq!(StreamKind::Groups.isolation_policy(), None);
    }
}
