//! Per-order grant records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::actor::ResolvedActor;
use crate::storage::GrantStore;
use crate::strategy::UnlockStrategy;
use crate::types::MethodSet;

/// Unlocks individual methods granted on the order being paid.
///
/// Only applies in an order-payment context: the resolved actor must
/// carry a validated order id, otherwise the strategy is a no-op. The
/// manager clears the order id when the order could not be resolved, so
/// an invalid pay-for-order link degrades to a no-op here rather than
/// failing the evaluation.
pub struct OrderGrantUnlockStrategy {
    grants: Arc<dyn GrantStore>,
}

impl OrderGrantUnlockStrategy {
    /// Create the strategy over an order-keyed grant store.
    #[must_use]
    pub fn new(grants: Arc<dyn GrantStore>) -> Self {
        Self { grants }
    }
}

#[async_trait]
impl UnlockStrategy for OrderGrantUnlockStrategy {
    fn name(&self) -> &'static str {
        super::ORDER_GRANT
    }

    async fn apply(&self, locked: MethodSet, actor: &ResolvedActor) -> MethodSet {
        let Some(order_id) = actor.order_id else {
            return locked;
        };

        let mut still_locked = MethodSet::new();
        for method_id in locked.iter() {
            match self.grants.get_grant(order_id, method_id).await {
                Ok(true) => {
                    debug!(strategy = self.name(), order_id, method_id, "grant found, unlocking");
                }
                Ok(false) => still_locked.insert(method_id),
                Err(err) => {
                    warn!(
                        strategy = self.name(),
                        order_id, method_id, %err,
                        "grant lookup failed, keeping method locked"
                    );
                    still_locked.insert(method_id);
                }
            }
        }

        still_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test::InMemoryGrantStore;

    #[tokio::test]
    async fn removes_granted_methods_in_order_context() {
        let store = InMemoryGrantStore::new();
        store.set_grant(1001, "cheque", true);
        let strategy = OrderGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["paypal", "cheque"]);
        let actor = ResolvedActor {
            user_id: Some(42),
            order_id: Some(1001),
        };

        assert_eq!(strategy.apply(locked, &actor).await, MethodSet::from(["paypal"]));
    }

    #[tokio::test]
    async fn no_order_context_is_a_noop() {
        let store = InMemoryGrantStore::new();
        store.set_grant(1001, "cheque", true);
        let strategy = OrderGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["cheque"]);
        let actor = ResolvedActor {
            user_id: Some(42),
            order_id: None,
        };

        assert_eq!(strategy.apply(locked.clone(), &actor).await, locked);
    }

    #[tokio::test]
    async fn failed_read_keeps_that_method_locked() {
        let store = InMemoryGrantStore::new();
        store.fail_for("cheque");
        let strategy = OrderGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["cheque"]);
        let actor = ResolvedActor {
            user_id: None,
            order_id: Some(1001),
        };

        assert_eq!(strategy.apply(locked.clone(), &actor).await, locked);
    }
}
