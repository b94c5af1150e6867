//! Tollgate - a payment-method gating engine for checkout flows
//!
//! Tollgate withholds configured payment methods from checkout unless
//! the current actor (a user, or the order being paid) has been granted
//! access through one of several independent unlock mechanisms. The
//! host supplies configuration and grant data through capability
//! traits; tollgate supplies the decision logic.
//!
//! # How it works
//!
//! - A configured set of payment-method ids is **locked** by default.
//! - An ordered pipeline of **unlock strategies** removes ids the
//!   actor has been approved for: role-based blanket access, per-user
//!   grants, per-order grants, and membership-plan unlocks.
//! - Removal is monotonic: once a strategy unlocks a method, no later
//!   strategy can re-lock it, and the result is always a subset of the
//!   candidates the checkout flow passed in.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tollgate::storage::test::{
//!     InMemoryGrantStore, InMemoryMembershipProvider, InMemoryOrderProvider,
//!     InMemoryRoleProvider,
//! };
//! use tollgate::{ActorContext, GatingConfig, LockManager, MethodSet, StaticConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = Arc::new(StaticConfig::new(GatingConfig::with_locked_methods([
//!     "paypal",
//!     "bank_transfer",
//! ])));
//!
//! let user_grants = InMemoryGrantStore::new();
//! user_grants.set_grant(42, "bank_transfer", true);
//!
//! let manager = LockManager::builder(config)
//!     .order_provider(Arc::new(InMemoryOrderProvider::new()))
//!     .default_strategies(
//!         Arc::new(InMemoryRoleProvider::new()),
//!         Arc::new(user_grants),
//!         Arc::new(InMemoryGrantStore::new()),
//!         Arc::new(InMemoryMembershipProvider::new()),
//!     )
//!     .build();
//!
//! let candidates = MethodSet::from(["paypal", "bank_transfer", "cod"]);
//! let allowed = manager
//!     .filter_available_methods(&candidates, &ActorContext::user(42))
//!     .await;
//!
//! // cod was never locked, bank_transfer was granted, paypal stays hidden.
//! assert_eq!(allowed, MethodSet::from(["bank_transfer", "cod"]));
//! # }
//! ```

mod actor;
mod config;
mod error;
mod manager;
pub mod storage;
pub mod strategies;
mod strategy;
mod types;

pub use actor::{ActorContext, ResolvedActor};
pub use config::{
    ConfigProvider, FailureMode, GatingConfig, RoleAccessList, RoleMatch, StaticConfig,
};
pub use error::{Result, TollgateError};
pub use manager::{LockManager, LockManagerBuilder};
pub use storage::{
    grant_meta_key, GrantStore, MembershipProvider, OrderProvider, RoleProvider,
    GRANT_META_PREFIX,
};
pub use strategy::UnlockStrategy;
pub use types::MethodSet;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with environment-based configuration.
///
/// Reads the filter from `RUST_LOG` (default `info`) and switches to
/// JSON output when `TOLLGATE_LOG_JSON=true`. Hosts that already run
/// their own subscriber should skip this.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("TOLLGATE_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn both_log_formats_can_be_built() {
        // Builds (without installing) the same subscriber stacks
        // init_tracing chooses between; the JSON layer in particular
        // needs its cargo feature enabled.
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(tracing_subscriber::fmt::layer().json());
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(tracing_subscriber::fmt::layer());
    }
}
