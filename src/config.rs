//! Gating configuration and the configuration capability trait.
//!
//! Hosts that keep their settings in memory can wrap a [`GatingConfig`]
//! in [`StaticConfig`]. Hosts that store settings in a database or an
//! options table implement [`ConfigProvider`] directly so toggles are
//! re-read on every evaluation, never cached across requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::MethodSet;

/// How the manager behaves when the base configuration cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Treat every candidate method as still locked (safer default: a
    /// method that should have required approval is never leaked).
    #[default]
    Closed,
    /// Pass all candidates through unfiltered. Opt-in for deployments
    /// still being set up.
    Open,
}

/// Combinator for matching the actor's roles against the configured
/// full-access list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleMatch {
    /// Any single matching role suffices.
    #[default]
    Any,
    /// The actor must hold every configured role.
    All,
}

/// Configured set of role slugs granted blanket access, plus the
/// combinator used to match them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAccessList {
    /// Role slugs with full access to all enabled payment methods.
    pub roles: Vec<String>,
    /// How the actor's roles are matched against `roles`.
    #[serde(default)]
    pub combinator: RoleMatch,
}

impl RoleAccessList {
    /// Create a list with the default `Any` combinator.
    #[must_use]
    pub fn new(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            combinator: RoleMatch::Any,
        }
    }

    /// Whether `actor_roles` satisfies this access list.
    ///
    /// An empty configured list never matches, regardless of combinator.
    #[must_use]
    pub fn matches(&self, actor_roles: &[String]) -> bool {
        if self.roles.is_empty() {
            return false;
        }
        match self.combinator {
            RoleMatch::Any => self
                .roles
                .iter()
                .any(|role| actor_roles.iter().any(|r| r == role)),
            RoleMatch::All => self
                .roles
                .iter()
                .all(|role| actor_roles.iter().any(|r| r == role)),
        }
    }
}

/// Static gating configuration.
///
/// Field defaults mirror a fresh install: role and user-grant unlocks
/// enabled, order-grant disabled, membership enabled (it self-disables
/// when the integration is absent), no methods locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatingConfig {
    /// Payment-method ids locked by default, pending explicit approval.
    #[serde(default)]
    pub locked_methods: MethodSet,
    /// Enable the role-based blanket unlock.
    #[serde(default = "default_true")]
    pub unlock_by_role: bool,
    /// Roles granted blanket access when the role unlock is enabled.
    #[serde(default = "default_full_access_roles")]
    pub full_access_roles: RoleAccessList,
    /// Enable per-user grant records.
    #[serde(default = "default_true")]
    pub unlock_by_user_grant: bool,
    /// Enable per-order grant records.
    #[serde(default)]
    pub unlock_by_order_grant: bool,
    /// Enable membership-plan unlocks.
    #[serde(default = "default_true")]
    pub unlock_by_membership: bool,
}

fn default_true() -> bool {
    true
}

fn default_full_access_roles() -> RoleAccessList {
    RoleAccessList::new(["administrator", "shop_manager"])
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            locked_methods: MethodSet::new(),
            unlock_by_role: true,
            full_access_roles: default_full_access_roles(),
            unlock_by_user_grant: true,
            unlock_by_order_grant: false,
            unlock_by_membership: true,
        }
    }
}

impl GatingConfig {
    /// Configuration with the given locked methods and default toggles.
    #[must_use]
    pub fn with_locked_methods(locked: impl Into<MethodSet>) -> Self {
        Self {
            locked_methods: locked.into(),
            ..Self::default()
        }
    }
}

/// Read-side capability trait for the gating configuration.
///
/// The manager and strategies call this on every evaluation, so
/// database-backed implementations see toggle changes immediately.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// The payment-method ids locked by default.
    async fn locked_method_ids(&self) -> Result<MethodSet>;

    /// Whether the named strategy is enabled.
    ///
    /// Unknown strategy names should report `false`.
    async fn is_strategy_enabled(&self, strategy: &str) -> Result<bool>;

    /// The configured full-access role list.
    async fn full_access_roles(&self) -> Result<RoleAccessList>;
}

/// [`ConfigProvider`] over an in-process [`GatingConfig`].
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    config: GatingConfig,
}

impl StaticConfig {
    /// Wrap a configuration.
    #[must_use]
    pub fn new(config: GatingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn locked_method_ids(&self) -> Result<MethodSet> {
        Ok(self.config.locked_methods.clone())
    }

    async fn is_strategy_enabled(&self, strategy: &str) -> Result<bool> {
        Ok(match strategy {
            crate::strategies::ROLE => self.config.unlock_by_role,
            crate::strategies::USER_GRANT => self.config.unlock_by_user_grant,
            crate::strategies::ORDER_GRANT => self.config.unlock_by_order_grant,
            crate::strategies::MEMBERSHIP => self.config.unlock_by_membership,
            _ => false,
        })
    }

    async fn full_access_roles(&self) -> Result<RoleAccessList> {
        Ok(self.config.full_access_roles.clone())
    }
}
