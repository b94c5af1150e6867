//! Per-user grant records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::actor::ResolvedActor;
use crate::storage::GrantStore;
use crate::strategy::UnlockStrategy;
use crate::types::MethodSet;

/// Unlocks individual methods for which the user holds a grant record.
///
/// Administrators (or the user's own profile form, host-side) toggle a
/// grant per `(user, method)` pair; this strategy subtracts exactly the
/// granted methods. Without a resolvable user id it is a no-op, and a
/// failed grant read keeps that one method locked.
pub struct UserGrantUnlockStrategy {
    grants: Arc<dyn GrantStore>,
}

impl UserGrantUnlockStrategy {
    /// Create the strategy over a user-keyed grant store.
    #[must_use]
    pub fn new(grants: Arc<dyn GrantStore>) -> Self {
        Self { grants }
    }
}

#[async_trait]
impl UnlockStrategy for UserGrantUnlockStrategy {
    fn name(&self) -> &'static str {
        super::USER_GRANT
    }

    async fn apply(&self, locked: MethodSet, actor: &ResolvedActor) -> MethodSet {
        let Some(user_id) = actor.user_id else {
            return locked;
        };

        let mut still_locked = MethodSet::new();
        for method_id in locked.iter() {
            match self.grants.get_grant(user_id, method_id).await {
                Ok(true) => {
                    debug!(strategy = self.name(), user_id, method_id, "grant found, unlocking");
                }
                Ok(false) => still_locked.insert(method_id),
                Err(err) => {
                    warn!(
                        strategy = self.name(),
                        user_id, method_id, %err,
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

    fn actor(user_id: u64) -> ResolvedActor {
        ResolvedActor {
            user_id: Some(user_id),
            order_id: None,
        }
    }

    #[tokio::test]
    async fn removes_only_granted_methods() {
        let store = InMemoryGrantStore::new();
        store.set_grant(42, "bank_transfer", true);
        let strategy = UserGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["paypal", "bank_transfer"]);
        let result = strategy.apply(locked, &actor(42)).await;

        assert_eq!(result, MethodSet::from(["paypal"]));
    }

    #[tokio::test]
    async fn other_users_grants_do_not_apply() {
        let store = InMemoryGrantStore::new();
        store.set_grant(42, "bank_transfer", true);
        let strategy = UserGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["bank_transfer"]);
        let result = strategy.apply(locked.clone(), &actor(7)).await;

        assert_eq!(result, locked);
    }

    #[tokio::test]
    async fn missing_user_is_a_noop() {
        let store = InMemoryGrantStore::new();
        store.set_grant(42, "bank_transfer", true);
        let strategy = UserGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["bank_transfer"]);
        let result = strategy.apply(locked.clone(), &ResolvedActor::default()).await;

        assert_eq!(result, locked);
    }

    #[tokio::test]
    async fn failed_read_keeps_that_method_locked() {
        let store = InMemoryGrantStore::new();
        store.set_grant(42, "paypal", true);
        store.fail_for("bank_transfer");
        let strategy = UserGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["paypal", "bank_transfer", "cheque"]);
        let result = strategy.apply(locked, &actor(42)).await;

        // paypal unlocked by its grant; bank_transfer stays locked on
        // read failure; cheque stays locked with no grant.
        assert_eq!(result, MethodSet::from(["bank_transfer", "cheque"]));
    }

    #[tokio::test]
    async fn explicit_false_grant_stays_locked() {
        let store = InMemoryGrantStore::new();
        store.set_grant(42, "paypal", false);
        let strategy = UserGrantUnlockStrategy::new(Arc::new(store));

        let locked = MethodSet::from(["paypal"]);
        assert_eq!(strategy.apply(locked.clone(), &actor(42)).await, locked);
    }
}
