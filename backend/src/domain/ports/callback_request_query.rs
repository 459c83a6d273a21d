//! Driving port for read-only callback request lookups.

use async_trait::async_trait;

use crate::domain::{CustomerInteraction, DealerCustomerInfo, Error};

/// Driving port for tracking and dealer listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallbackRequestQuery: Send + Sync {
    /// Fetch the full record behind a tracking code.
    ///
    /// `request_id` is taken raw so length validation happens before any
    /// store access.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when `request_id` is not exactly four digits.
    /// - `NotFound` when no record uses it.
    async fn track(&self, request_id: &str) -> Result<CustomerInteraction, Error>;

    /// List the customers assigned to `dealer_name`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when `dealer_name` is blank.
    /// - `NotFound` when the dealer has no records. An empty list is never
    ///   returned.
    async fn list_by_dealer(&self, dealer_name: &str) -> Result<Vec<DealerCustomerInfo>, Error>;
}
