//! Capability traits for the host-owned data stores.
//!
//! Grant records, role sets, order lookups, and membership plans are
//! owned and mutated by the host's admin/profile UIs; the engine only
//! reads them. Implement these traits over your database; in-memory
//! implementations are provided in [`test`] for testing.

use async_trait::async_trait;

use crate::error::Result;

/// Prefix for host-side grant-record keys produced by
/// [`grant_meta_key`].
pub const GRANT_META_PREFIX: &str = "tollgate_grant_access_";

/// The key under which hosts with generic key/value meta tables are
/// expected to store the grant record for `method_id`.
///
/// Using one well-known key shape lets admin UIs and the store
/// implementation agree without extra coordination.
#[must_use]
pub fn grant_meta_key(method_id: &str) -> String {
    format!("{GRANT_META_PREFIX}{method_id}")
}

/// Boolean grant records keyed by `(subject id, method id)`.
///
/// The subject id is a user id for the user-grant strategy and an order
/// id for the order-grant strategy; a store instance serves exactly one
/// of the two.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Whether `subject_id` has been granted access to `method_id`.
    ///
    /// Absent records are `false`, not an error.
    async fn get_grant(&self, subject_id: u64, method_id: &str) -> Result<bool>;
}

/// Read access to a user's role slugs.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// The role slugs currently held by `user_id`.
    ///
    /// Unknown users have no roles.
    async fn roles(&self, user_id: u64) -> Result<Vec<String>>;
}

/// Order lookups.
#[async_trait]
pub trait OrderProvider: Send + Sync {
    /// Resolve an order to its customer's user id.
    ///
    /// `Ok(None)` means the order exists but has no attached customer
    /// (a guest order); a missing order is
    /// [`TollgateError::OrderNotFound`](crate::TollgateError::OrderNotFound).
    async fn resolve_customer(&self, order_id: u64) -> Result<Option<u64>>;
}

/// Read access to an external membership system.
///
/// The membership strategy treats an unavailable provider as disabled,
/// so hosts without the integration can pass a provider whose
/// [`is_available`](MembershipProvider::is_available) returns `false`
/// (or simply not register the strategy).
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// Whether the backing integration is installed and at a supported
    /// version.
    async fn is_available(&self) -> bool;

    /// Ids of the membership plans `user_id` is currently an active
    /// member of.
    async fn active_plan_ids(&self, user_id: u64) -> Result<Vec<u64>>;

    /// Payment-method ids explicitly unlocked by `plan_id`.
    async fn unlocked_method_ids(&self, plan_id: u64) -> Result<Vec<String>>;
}

/// In-memory store implementations for testing.
pub mod test {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    use crate::error::TollgateError;

    /// In-memory grant store for testing.
    ///
    /// Wraps data in `Arc` for cheap cloning; seed grants with
    /// [`set_grant`](InMemoryGrantStore::set_grant) and make individual
    /// lookups fail with [`fail_for`](InMemoryGrantStore::fail_for).
    #[derive(Default, Clone)]
    pub struct InMemoryGrantStore {
        inner: Arc<InMemoryGrantStoreInner>,
    }

    #[derive(Default)]
    struct InMemoryGrantStoreInner {
        grants: RwLock<HashMap<(u64, String), bool>>,
        failing: RwLock<Vec<String>>,
    }

    impl InMemoryGrantStore {
        /// Create an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a grant record.
        pub fn set_grant(&self, subject_id: u64, method_id: &str, granted: bool) {
            self.inner
                .grants
                .write()
                .unwrap()
                .insert((subject_id, method_id.to_string()), granted);
        }

        /// Make lookups for `method_id` return a store error.
        pub fn fail_for(&self, method_id: &str) {
            self.inner
                .failing
                .write()
                .unwrap()
                .push(method_id.to_string());
        }
    }

    #[async_trait]
    impl GrantStore for InMemoryGrantStore {
        async fn get_grant(&self, subject_id: u64, method_id: &str) -> Result<bool> {
            if self.inner.failing.read().unwrap().iter().any(|m| m == method_id) {
                return Err(TollgateError::GrantRead {
                    method_id: method_id.to_string(),
                    reason: "simulated store failure".to_string(),
                });
            }
            Ok(self
                .inner
                .grants
                .read()
                .unwrap()
                .get(&(subject_id, method_id.to_string()))
                .copied()
                .unwrap_or(false))
        }
    }

    /// In-memory role provider for testing.
    #[derive(Default, Clone)]
    pub struct InMemoryRoleProvider {
        roles: Arc<RwLock<HashMap<u64, Vec<String>>>>,
    }

    impl InMemoryRoleProvider {
        /// Create an empty provider.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a user's roles.
        pub fn set_roles(&self, user_id: u64, roles: impl IntoIterator<Item = impl Into<String>>) {
            self.roles
                .write()
                .unwrap()
                .insert(user_id, roles.into_iter().map(Into::into).collect());
        }
    }

    #[async_trait]
    impl RoleProvider for InMemoryRoleProvider {
        async fn roles(&self, user_id: u64) -> Result<Vec<String>> {
            Ok(self
                .roles
                .read()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// In-memory order provider for testing.
    #[derive(Default, Clone)]
    pub struct InMemoryOrderProvider {
        customers: Arc<RwLock<HashMap<u64, Option<u64>>>>,
    }

    impl InMemoryOrderProvider {
        /// Create an empty provider.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed an order with its customer.
        pub fn set_order(&self, order_id: u64, customer_id: u64) {
            self.customers
                .write()
                .unwrap()
                .insert(order_id, Some(customer_id));
        }

        /// Seed a guest order with no attached customer.
        pub fn set_guest_order(&self, order_id: u64) {
            self.customers.write().unwrap().insert(order_id, None);
        }
    }

    #[async_trait]
    impl OrderProvider for InMemoryOrderProvider {
        async fn resolve_customer(&self, order_id: u64) -> Result<Option<u64>> {
            match self.customers.read().unwrap().get(&order_id) {
                Some(customer) => Ok(*customer),
                None => Err(TollgateError::OrderNotFound { order_id }),
            }
        }
    }

    /// In-memory membership provider for testing.
    #[derive(Clone)]
    pub struct InMemoryMembershipProvider {
        inner: Arc<InMemoryMembershipInner>,
    }

    #[derive(Default)]
    struct InMemoryMembershipInner {
        available: RwLock<bool>,
        active_plans: RwLock<HashMap<u64, Vec<u64>>>,
        plan_methods: RwLock<HashMap<u64, Vec<String>>>,
    }

    impl Default for InMemoryMembershipProvider {
        fn default() -> Self {
            let provider = Self {
                inner: Arc::new(InMemoryMembershipInner::default()),
            };
            *provider.inner.available.write().unwrap() = true;
            provider
        }
    }

    impl InMemoryMembershipProvider {
        /// Create an available provider with no plans.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark the integration available or not.
        pub fn set_available(&self, available: bool) {
            *self.inner.available.write().unwrap() = available;
        }

        /// Seed a user's active plan memberships.
        pub fn set_active_plans(&self, user_id: u64, plan_ids: impl IntoIterator<Item = u64>) {
            self.inner
                .active_plans
                .write()
                .unwrap()
                .insert(user_id, plan_ids.into_iter().collect());
        }

        /// Seed the methods a plan unlocks.
        pub fn set_plan_methods(
            &self,
            plan_id: u64,
            method_ids: impl IntoIterator<Item = impl Into<String>>,
        ) {
            self.inner
                .plan_methods
                .write()
                .unwrap()
                .insert(plan_id, method_ids.into_iter().map(Into::into).collect());
        }
    }

    #[async_trait]
    impl MembershipProvider for InMemoryMembershipProvider {
        async fn is_available(&self) -> bool {
            *self.inner.available.read().unwrap()
        }

        async fn active_plan_ids(&self, user_id: u64) -> Result<Vec<u64>> {
            Ok(self
                .inner
                .active_plans
                .read()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn unlocked_method_ids(&self, plan_id: u64) -> Result<Vec<String>> {
            Ok(self
                .inner
                .plan_methods
                .read()
                .unwrap()
                .get(&plan_id)
                .cloned()
                .unwrap_or_default())
        }
    }
}
