//! Built-in unlock strategies.
//!
//! The engine ships four strategies, registered in this order by
//! [`LockManagerBuilder::default_strategies`]:
//!
//! 1. [`RoleUnlockStrategy`]: blanket unlock for configured roles
//! 2. [`UserGrantUnlockStrategy`]: per-method grants on the user
//! 3. [`OrderGrantUnlockStrategy`]: per-method grants on the order
//! 4. [`MembershipUnlockStrategy`]: unlocks via active membership plans
//!
//! [`LockManagerBuilder::default_strategies`]: crate::LockManagerBuilder::default_strategies

mod membership;
mod order_grant;
mod role;
mod user_grant;

pub use membership::MembershipUnlockStrategy;
pub use order_grant::OrderGrantUnlockStrategy;
pub use role::RoleUnlockStrategy;
pub use user_grant::UserGrantUnlockStrategy;

/// Slug of the role strategy.
pub const ROLE: &str = "role";
/// Slug of the user-grant strategy.
pub const USER_GRANT: &str = "user_grant";
/// Slug of the order-grant strategy.
pub const ORDER_GRANT: &str = "order_grant";
/// Slug of the membership strategy.
pub const MEMBERSHIP: &str = "membership";
