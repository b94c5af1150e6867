//! Actor context: the subject of a gating evaluation.
//!
//! Strategies never consult ambient request state ("who is the current
//! user?"); the host passes everything it knows about the subject into
//! [`LockManager::filter_available_methods`] explicitly.
//!
//! [`LockManager::filter_available_methods`]: crate::LockManager::filter_available_methods

/// The subject of an evaluation: a user, an order being paid, or both.
///
/// On a regular checkout page the host passes the authenticated user.
/// On a pay-for-order page it additionally passes the order id, which
/// activates the order-grant strategy and lets the engine resolve the
/// order's customer when no user id was given (guest checkout links).
///
/// # Example
///
/// ```rust
/// use tollgate::ActorContext;
///
/// let shopper = ActorContext::user(42);
/// let pay_page = ActorContext::user(42).with_order(1001);
/// let guest_link = ActorContext::order(1001);
/// # let _ = (shopper, pay_page, guest_link);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorContext {
    /// The user the host authenticated for this request, if any.
    pub user_id: Option<u64>,
    /// The order being paid for, if the request is an order-payment
    /// context.
    pub order_id: Option<u64>,
}

impl ActorContext {
    /// An anonymous context with no user and no order.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated user.
    #[must_use]
    pub fn user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            order_id: None,
        }
    }

    /// Context for an order-payment page without a known user.
    #[must_use]
    pub fn order(order_id: u64) -> Self {
        Self {
            user_id: None,
            order_id: Some(order_id),
        }
    }

    /// Attach an order id to this context.
    #[must_use]
    pub fn with_order(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

/// An [`ActorContext`] after the manager has validated the order id and
/// resolved the order's customer.
///
/// `order_id` here is only present when the order actually exists; an
/// unresolvable order is dropped before the strategies run, which makes
/// the order-grant strategy a no-op for that call. `user_id` is the
/// explicit user when one was given, else the resolved order customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedActor {
    /// The user the evaluation is scoped to, if any.
    pub user_id: Option<u64>,
    /// The validated order id, if the actor is in an order context.
    pub order_id: Option<u64>,
}
