//! Per-item failure isolation for fan-out loops.
//!
//! Routines that make one sub-call per item (reach per post, comments per
//! post, stats per story) classify each result as an [`ItemOutcome`] and
//! settle it with the stream's [`IsolationPolicy`]. Errors that are not
//! isolatable (see [`VkError::is_isolatable`]) abort the run.

use vktap_api::VkError;

use crate::definition::StreamKind;

/// What to do with an item whose sub-call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationPolicy {
    /// Keep the item, substituting a zero value for the failed sub-record.
    ZeroFill,
    /// Drop the item entirely.
    Skip,
}

/// Result of one per-item sub-call once fatal errors are split off.
#[derive(Debug)]
pub enum ItemOutcome<T> {
    Fetched(T),
    Isolated(VkError),
}

impl<T> ItemOutcome<T> {
    /// Split a gateway result into an outcome, or the error that must abort.
    ///
    /// # Errors
    ///
    /// Returns the original error when it is not isolatable.
    pub fn classify(result: Result<T, VkError>) -> Result<Self, VkError> {
        match result {
            Ok(value) => Ok(ItemOutcome::Fetched(value)),
            Err(err) if err.is_isolatable() => Ok(ItemOutcome::Isolated(err)),
            Err(err) => Err(err),
        }
    }

    /// Resolve the outcome under `policy`. `zero` is only called for
    /// [`IsolationPolicy::ZeroFill`].
    pub fn settle(self, policy: IsolationPolicy, zero: impl FnOnce() -> T) -> Option<T> {
        match (self, policy) {
            (ItemOutcome::Fetched(value), _) => Some(value),
            (ItemOutcome::Isolated(_), IsolationPolicy::ZeroFill) => Some(zero()),
            (ItemOutcome::Isolated(_), IsolationPolicy::Skip) => None,
        }
    }
}

/// Applies one stream's policy across a fan-out loop and keeps a tally for
/// the completion log.
#[derive(Debug)]
pub(crate) struct Isolator {
    stream: &'static str,
    policy: IsolationPolicy,
    fetched: usize,
    isolated: usize,
}

impl Isolator {
    pub(crate) fn new(stream: &'static str, policy: IsolationPolicy) -> Self {
        Self {
            stream,
            policy,
            fetched: 0,
            isolated: 0,
        }
    }

    /// Settle one item's sub-call result.
    ///
    /// Returns `Ok(None)` when the item is skipped.
    pub(crate) fn settle<T>(
        &mut self,
        item_id: i64,
        result: Result<T, VkError>,
        zero: impl FnOnce() -> T,
    ) -> Result<Option<T>, VkError> {
        match ItemOutcome::classify(result)? {
            ItemOutcome::Fetched(value) => {
                self.fetched += 1;
                Ok(Some(value))
            }
            ItemOutcome::Isolated(err) => {
                tracing::warn!(
                    stream = self.stream,
                    item_id,
                    policy = ?self.policy,
                    error = %err,
                    "isolated item failure"
                );
                self.isolated += 1;
                Ok(ItemOutcome::Isolated(err).settle(self.policy, zero))
            }
        }
    }

    /// Isolator for `kind`, using the policy from
    /// [`StreamKind::isolation_policy`]. Only fan-out streams build one;
    /// any other kind falls back to [`IsolationPolicy::Skip`].
    pub(crate) fn for_stream(kind: StreamKind) -> Self {
        Self::new(
            kind.name(),
            kind.isolation_policy().unwrap_or(IsolationPolicy::Skip),
        )
    }

    pub(crate) fn isolated(&self) -> usize {
        self.isolated
    }

    pub(crate) fn fetched(&self) -> usize {
        self.fetched
    }
}
