//! Role-based blanket unlock.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::actor::ResolvedActor;
use crate::config::ConfigProvider;
use crate::storage::RoleProvider;
use crate::strategy::UnlockStrategy;
use crate::types::MethodSet;

/// Grants full access to every locked method when the actor holds one
/// of the configured full-access roles.
///
/// Unlike the other strategies this one is all-or-nothing: a role match
/// empties the locked set outright rather than subtracting per-method
/// grants. No match, no user id, or a failed role/config read leaves
/// the input unchanged.
pub struct RoleUnlockStrategy {
    config: Arc<dyn ConfigProvider>,
    roles: Arc<dyn RoleProvider>,
}

impl RoleUnlockStrategy {
    /// Create the strategy over a config and role provider.
    #[must_use]
    pub fn new(config: Arc<dyn ConfigProvider>, roles: Arc<dyn RoleProvider>) -> Self {
        Self { config, roles }
    }
}

#[async_trait]
impl UnlockStrategy for RoleUnlockStrategy {
    fn name(&self) -> &'static str {
        super::ROLE
    }

    async fn apply(&self, locked: MethodSet, actor: &ResolvedActor) -> MethodSet {
        let Some(user_id) = actor.user_id else {
            return locked;
        };

        let access_list = match self.config.full_access_roles().await {
            Ok(list) => list,
            Err(err) => {
                warn!(strategy = self.name(), %err, "failed to read full-access roles, keeping methods locked");
                return locked;
            }
        };

        let actor_roles = match self.roles.roles(user_id).await {
            Ok(roles) => roles,
            Err(err) => {
                warn!(strategy = self.name(), user_id, %err, "failed to read user roles, keeping methods locked");
                return locked;
            }
        };

        if access_list.matches(&actor_roles) {
            debug!(strategy = self.name(), user_id, "role match, unlocking all methods");
            MethodSet::new()
        } else {
            locked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatingConfig, RoleAccessList, RoleMatch, StaticConfig};
    use crate::storage::test::InMemoryRoleProvider;

    fn strategy_with(
        access: RoleAccessList,
        roles: &InMemoryRoleProvider,
    ) -> RoleUnlockStrategy {
        let config = GatingConfig {
            full_access_roles: access,
            ..GatingConfig::default()
        };
        RoleUnlockStrategy::new(Arc::new(StaticConfig::new(config)), Arc::new(roles.clone()))
    }

    #[tokio::test]
    async fn matching_role_unlocks_everything() {
        let roles = InMemoryRoleProvider::new();
        roles.set_roles(42, ["shop_manager"]);
        let strategy = strategy_with(
            RoleAccessList::new(["administrator", "shop_manager"]),
            &roles,
        );

        let locked = MethodSet::from(["paypal", "bank_transfer"]);
        let actor = ResolvedActor {
            user_id: Some(42),
            order_id: None,
        };

        assert!(strategy.apply(locked, &actor).await.is_empty());
    }

    #[tokio::test]
    async fn non_matching_role_is_a_noop() {
        let roles = InMemoryRoleProvider::new();
        roles.set_roles(42, ["customer"]);
        let strategy = strategy_with(
            RoleAccessList::new(["administrator", "shop_manager"]),
            &roles,
        );

        let locked = MethodSet::from(["paypal"]);
        let actor = ResolvedActor {
            user_id: Some(42),
            order_id: None,
        };

        assert_eq!(strategy.apply(locked.clone(), &actor).await, locked);
    }

    #[tokio::test]
    async fn missing_user_is_a_noop() {
        let roles = InMemoryRoleProvider::new();
        let strategy = strategy_with(RoleAccessList::new(["administrator"]), &roles);

        let locked = MethodSet::from(["paypal"]);
        assert_eq!(
            strategy.apply(locked.clone(), &ResolvedActor::default()).await,
            locked
        );
    }

    #[tokio::test]
    async fn all_combinator_requires_every_role() {
        let roles = InMemoryRoleProvider::new();
        roles.set_roles(7, ["administrator"]);
        let strategy = strategy_with(
            RoleAccessList {
                roles: vec!["administrator".to_string(), "auditor".to_string()],
                combinator: RoleMatch::All,
            },
            &roles,
        );

        let locked = MethodSet::from(["paypal"]);
        let actor = ResolvedActor {
            user_id: Some(7),
            order_id: None,
        };
        assert_eq!(strategy.apply(locked.clone(), &actor).await, locked);

        roles.set_roles(7, ["administrator", "auditor"]);
        assert!(strategy.apply(locked, &actor).await.is_empty());
    }
}
