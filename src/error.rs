//! Error types for the gating engine.

use thiserror::Error;

/// The main error type for tollgate operations.
///
/// Most of these never reach the checkout call site: the [`LockManager`]
/// consumes configuration and store failures according to its failure
/// policy and returns a plain method set. The enum exists for the
/// capability traits that hosts implement.
///
/// [`LockManager`]: crate::LockManager
#[derive(Debug, Error)]
pub enum TollgateError {
    /// The base gating configuration could not be read.
    #[error("Configuration unavailable: {0}")]
    ConfigUnavailable(String),

    /// An order id did not resolve to a real order.
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The order id that could not be resolved.
        order_id: u64,
    },

    /// A single grant lookup failed at the store level.
    #[error("Grant lookup failed for method `{method_id}`: {reason}")]
    GrantRead {
        /// The payment-method id whose grant could not be read.
        method_id: String,
        /// Store-reported failure reason.
        reason: String,
    },

    /// A backing integration (e.g. the membership system) is absent or
    /// below its minimum supported version.
    #[error("Integration unavailable: {0}")]
    IntegrationUnavailable(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias using [`TollgateError`].
pub type Result<T> = std::result::Result<T, TollgateError>;
