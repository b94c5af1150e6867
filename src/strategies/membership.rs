//! Membership-plan unlocks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::actor::ResolvedActor;
use crate::config::ConfigProvider;
use crate::storage::MembershipProvider;
use crate::strategy::UnlockStrategy;
use crate::types::MethodSet;

/// Unlocks methods listed by any of the user's active membership plans.
///
/// Each plan carries a list of method ids it unlocks (maintained by the
/// plan admin UI, host-side); a method is removed from the locked set
/// when any active plan lists it. The strategy reports itself disabled
/// when the backing membership integration is absent or below its
/// minimum supported version, in addition to the regular config toggle.
pub struct MembershipUnlockStrategy {
    memberships: Arc<dyn MembershipProvider>,
}

impl MembershipUnlockStrategy {
    /// Create the strategy over a membership provider.
    #[must_use]
    pub fn new(memberships: Arc<dyn MembershipProvider>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl UnlockStrategy for MembershipUnlockStrategy {
    fn name(&self) -> &'static str {
        super::MEMBERSHIP
    }

    async fn is_enabled(&self, config: &dyn ConfigProvider) -> bool {
        if !self.memberships.is_available().await {
            debug!(strategy = self.name(), "membership integration unavailable, strategy disabled");
            return false;
        }
        config
            .is_strategy_enabled(self.name())
            .await
            .unwrap_or(false)
    }

    async fn apply(&self, locked: MethodSet, actor: &ResolvedActor) -> MethodSet {
        let Some(user_id) = actor.user_id else {
            return locked;
        };

        let plan_ids = match self.memberships.active_plan_ids(user_id).await {
            Ok(plan_ids) => plan_ids,
            Err(err) => {
                warn!(strategy = self.name(), user_id, %err, "failed to enumerate memberships, keeping methods locked");
                return locked;
            }
        };

        let mut still_locked = locked;
        for plan_id in plan_ids {
            if still_locked.is_empty() {
                break;
            }
            match self.memberships.unlocked_method_ids(plan_id).await {
                Ok(method_ids) => {
                    for method_id in &method_ids {
                        if still_locked.remove(method_id) {
                            debug!(
                                strategy = self.name(),
                                user_id, plan_id, method_id, "plan unlock, removing method"
                            );
                        }
                    }
                }
                Err(err) => {
                    warn!(strategy = self.name(), plan_id, %err, "failed to read plan unlock list, skipping plan");
                }
            }
        }

        still_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatingConfig, StaticConfig};
    use crate::storage::test::InMemoryMembershipProvider;

    fn actor(user_id: u64) -> ResolvedActor {
        ResolvedActor {
            user_id: Some(user_id),
            order_id: None,
        }
    }

    #[tokio::test]
    async fn active_plan_unlocks_listed_methods() {
        let memberships = InMemoryMembershipProvider::new();
        memberships.set_active_plans(42, [7, 8]);
        memberships.set_plan_methods(7, ["bank_transfer"]);
        memberships.set_plan_methods(8, ["cheque", "not_locked_anyway"]);
        let strategy = MembershipUnlockStrategy::new(Arc::new(memberships));

        let locked = MethodSet::from(["paypal", "bank_transfer", "cheque"]);
        let result = strategy.apply(locked, &actor(42)).await;

        assert_eq!(result, MethodSet::from(["paypal"]));
    }

    #[tokio::test]
    async fn no_active_plans_is_a_noop() {
        let memberships = InMemoryMembershipProvider::new();
        memberships.set_plan_methods(7, ["bank_transfer"]);
        let strategy = MembershipUnlockStrategy::new(Arc::new(memberships));

        let locked = MethodSet::from(["bank_transfer"]);
        assert_eq!(strategy.apply(locked.clone(), &actor(42)).await, locked);
    }

    #[tokio::test]
    async fn missing_user_is_a_noop() {
        let memberships = InMemoryMembershipProvider::new();
        memberships.set_active_plans(42, [7]);
        memberships.set_plan_methods(7, ["bank_transfer"]);
        let strategy = MembershipUnlockStrategy::new(Arc::new(memberships));

        let locked = MethodSet::from(["bank_transfer"]);
        assert_eq!(
            strategy.apply(locked.clone(), &ResolvedActor::default()).await,
            locked
        );
    }

    #[tokio::test]
    async fn unavailable_integration_reports_disabled() {
        let memberships = InMemoryMembershipProvider::new();
        memberships.set_available(false);
        let strategy = MembershipUnlockStrategy::new(Arc::new(memberships));

        let config = StaticConfig::new(GatingConfig::default());
        assert!(!strategy.is_enabled(&config).await);
    }

    #[tokio::test]
    async fn available_integration_follows_config_toggle() {
        let memberships = InMemoryMembershipProvider::new();
        let strategy = MembershipUnlockStrategy::new(Arc::new(memberships));

        let enabled = StaticConfig::new(GatingConfig::default());
        assert!(strategy.is_enabled(&enabled).await);

        let disabled = StaticConfig::new(GatingConfig {
            unlock_by_membership: false,
            ..GatingConfig::default()
        });
        assert!(!strategy.is_enabled(&disabled).await);
    }
}
