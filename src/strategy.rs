//! The shared unlock-strategy contract.

use async_trait::async_trait;

use crate::actor::ResolvedActor;
use crate::config::ConfigProvider;
use crate::types::MethodSet;

/// A pluggable rule that may remove methods from the locked set for a
/// given actor.
///
/// Strategies are registered into the [`LockManager`] in a fixed order
/// and run as a pipeline: each receives the set of methods still locked
/// after the previous strategy and returns the subset that remains
/// locked after its own grants are subtracted. Strategies hold no state
/// across calls; given unchanged store contents, `apply` is idempotent.
///
/// The manager intersects every return value with the input, so a
/// strategy cannot re-lock a method an earlier strategy unlocked.
///
/// [`LockManager`]: crate::LockManager
#[async_trait]
pub trait UnlockStrategy: Send + Sync {
    /// Stable slug identifying this strategy in configuration and logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy should run for the current evaluation.
    ///
    /// The default reads the config toggle for [`name`](Self::name);
    /// a failed read counts as disabled, which keeps methods locked.
    /// Integration-backed strategies also check their backing system
    /// here.
    async fn is_enabled(&self, config: &dyn ConfigProvider) -> bool {
        config
            .is_strategy_enabled(self.name())
            .await
            .unwrap_or(false)
    }

    /// Return the subset of `locked` that remains locked for `actor`.
    ///
    /// Store failures must be handled inside the strategy (a failed
    /// grant read means "not granted"); `apply` never surfaces errors
    /// to the checkout call site.
    async fn apply(&self, locked: MethodSet, actor: &ResolvedActor) -> MethodSet;
}
