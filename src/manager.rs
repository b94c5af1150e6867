//! The lock manager: the single decision entrypoint.

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::actor::{ActorContext, ResolvedActor};
use crate::config::{ConfigProvider, FailureMode};
use crate::storage::{GrantStore, MembershipProvider, OrderProvider, RoleProvider};
use crate::strategies::{
    MembershipUnlockStrategy, OrderGrantUnlockStrategy, RoleUnlockStrategy,
    UserGrantUnlockStrategy,
};
use crate::strategy::UnlockStrategy;
use crate::types::MethodSet;

/// Orchestrates the unlock-strategy pipeline over the configured locked
/// set.
///
/// The manager owns no persisted state; every call re-reads the
/// configuration and runs the registered strategies in order, each one
/// receiving the set of methods still locked after the previous. The
/// checkout flow calls [`filter_available_methods`] with the full list
/// of gateway-enabled methods and discards everything not in the
/// returned set.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use tollgate::{ActorContext, GatingConfig, LockManager, MethodSet, StaticConfig};
///
/// let config = Arc::new(StaticConfig::new(GatingConfig::with_locked_methods([
///     "paypal",
///     "bank_transfer",
/// ])));
///
/// let manager = LockManager::builder(config.clone())
///     .order_provider(orders)
///     .default_strategies(roles, user_grants, order_grants, memberships)
///     .build();
///
/// let candidates = MethodSet::from(["paypal", "bank_transfer", "cod"]);
/// let allowed = manager
///     .filter_available_methods(&candidates, &ActorContext::user(42))
///     .await;
/// ```
///
/// [`filter_available_methods`]: LockManager::filter_available_methods
pub struct LockManager {
    config: Arc<dyn ConfigProvider>,
    orders: Option<Arc<dyn OrderProvider>>,
    strategies: Vec<Arc<dyn UnlockStrategy>>,
    failure_mode: FailureMode,
}

impl LockManager {
    /// Start building a manager over a configuration provider.
    #[must_use]
    pub fn builder(config: Arc<dyn ConfigProvider>) -> LockManagerBuilder {
        LockManagerBuilder {
            config,
            orders: None,
            strategies: Vec::new(),
            failure_mode: FailureMode::default(),
        }
    }

    /// Names of the registered strategies, in pipeline order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    /// Compute the methods `actor` is allowed to use out of
    /// `candidates`.
    ///
    /// `candidates` is the full set of methods currently enabled at the
    /// gateway level. Methods not in the configured locked set pass
    /// through untouched; the locked subset is narrowed by each
    /// enabled strategy in registration order, and whatever remains
    /// locked at the end is subtracted from the result. The returned
    /// set preserves `candidates`' order and is always a subset of it.
    ///
    /// This never returns an error: configuration and store failures
    /// are absorbed according to the failure policy (see
    /// [`FailureMode`] and the strategy docs).
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn filter_available_methods(
        &self,
        candidates: &MethodSet,
        actor: &ActorContext,
    ) -> MethodSet {
        let configured = match self.config.locked_method_ids().await {
            Ok(ids) => ids,
            Err(err) => match self.failure_mode {
                FailureMode::Open => {
                    error!(%err, "configuration unavailable, failing open: all candidates pass");
                    return candidates.clone();
                }
                FailureMode::Closed => {
                    error!(%err, "configuration unavailable, failing closed: treating all candidates as locked");
                    candidates.clone()
                }
            },
        };

        let mut locked = candidates.intersect(&configured);
        if locked.is_empty() {
            return candidates.clone();
        }

        let resolved = self.resolve_actor(actor).await;

        for strategy in &self.strategies {
            if locked.is_empty() {
                break;
            }
            if !strategy.is_enabled(self.config.as_ref()).await {
                debug!(strategy = strategy.name(), "strategy disabled, skipping");
                continue;
            }

            let input = locked.clone();
            let output = strategy.apply(locked, &resolved).await;
            // Strategies may only shrink the locked set.
            locked = input.intersect(&output);
            debug!(
                strategy = strategy.name(),
                unlocked = input.len() - locked.len(),
                still_locked = locked.len(),
            );
        }

        candidates.difference(&locked)
    }

    /// Validate the order context and fill in the order's customer.
    ///
    /// An order that cannot be resolved (missing order, store failure,
    /// or no order provider registered) drops the order context so the
    /// order-grant strategy becomes a no-op; the evaluation itself
    /// continues.
    async fn resolve_actor(&self, actor: &ActorContext) -> ResolvedActor {
        let mut resolved = ResolvedActor {
            user_id: actor.user_id,
            order_id: None,
        };

        let Some(order_id) = actor.order_id else {
            return resolved;
        };

        match &self.orders {
            Some(orders) => match orders.resolve_customer(order_id).await {
                Ok(customer) => {
                    resolved.order_id = Some(order_id);
                    if resolved.user_id.is_none() {
                        resolved.user_id = customer;
                    }
                }
                Err(err) => {
                    warn!(order_id, %err, "order could not be resolved, dropping order context");
                }
            },
            None => {
                warn!(order_id, "no order provider registered, dropping order context");
            }
        }

        resolved
    }
}

/// Builder for [`LockManager`].
///
/// Strategies run in the order they are registered; registration
/// happens once at startup and the resulting pipeline is fixed.
pub struct LockManagerBuilder {
    config: Arc<dyn ConfigProvider>,
    orders: Option<Arc<dyn OrderProvider>>,
    strategies: Vec<Arc<dyn UnlockStrategy>>,
    failure_mode: FailureMode,
}

impl LockManagerBuilder {
    /// Register the order provider used to validate order contexts.
    ///
    /// Without one, order ids in the actor context are dropped and the
    /// order-grant strategy never applies.
    #[must_use]
    pub fn order_provider(mut self, orders: Arc<dyn OrderProvider>) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Append a strategy to the pipeline.
    #[must_use]
    pub fn strategy(mut self, strategy: Arc<dyn UnlockStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Register the four built-in strategies in their standard order:
    /// role, user-grant, order-grant, membership.
    #[must_use]
    pub fn default_strategies(
        self,
        roles: Arc<dyn RoleProvider>,
        user_grants: Arc<dyn GrantStore>,
        order_grants: Arc<dyn GrantStore>,
        memberships: Arc<dyn MembershipProvider>,
    ) -> Self {
        let config = self.config.clone();
        self.strategy(Arc::new(RoleUnlockStrategy::new(config, roles)))
            .strategy(Arc::new(UserGrantUnlockStrategy::new(user_grants)))
            .strategy(Arc::new(OrderGrantUnlockStrategy::new(order_grants)))
            .strategy(Arc::new(MembershipUnlockStrategy::new(memberships)))
    }

    /// Override the behavior on configuration read failure.
    ///
    /// Defaults to [`FailureMode::Closed`].
    #[must_use]
    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Finish building the manager.
    #[must_use]
    pub fn build(self) -> LockManager {
        LockManager {
            config: self.config,
            orders: self.orders,
            strategies: self.strategies,
            failure_mode: self.failure_mode,
        }
    }
}
