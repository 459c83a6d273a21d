//! Driven port for the customer interaction store.
//!
//! The [`InteractionRepository`] trait is the only way the lifecycle service
//! touches persisted callback requests. Adapters own the table layout; the
//! domain only sees [`CustomerInteraction`] values.

use async_trait::async_trait;

use crate::domain::{CustomerInteraction, NewCustomerInteraction, RequestId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by interaction repository adapters.
    pub enum InteractionRepositoryError {
        /// The store could not be reached or a connection dropped.
        Connection { message: String } =>
            "interaction repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "interaction repository query failed: {message}",
        /// A staged tracking code is already taken. Nothing was written.
        DuplicateRequestId { request_id: String } =>
            "tracking code {request_id} is already in use",
        /// The record to update no longer exists.
        NotFound { request_id: String } =>
            "no interaction stored under tracking code {request_id}",
    }
}

/// Port for storing and reading customer interactions.
///
/// # Atomicity
///
/// [`InteractionRepository::insert_batch`] commits every staged record or
/// none of them. A tracking-code collision with an existing row is reported
/// as [`InteractionRepositoryError::DuplicateRequestId`] so the caller can
/// re-allocate and retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Insert all staged records in one transaction, returning them with
    /// their assigned keys in input order.
    async fn insert_batch(
        &self,
        records: &[NewCustomerInteraction],
    ) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError>;

    /// Whether a live record already uses `request_id`.
    async fn request_id_exists(
        &self,
        request_id: &RequestId,
    ) -> Result<bool, InteractionRepositoryError>;

    /// Look up one record by tracking code.
    async fn find_by_request_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<CustomerInteraction>, InteractionRepositoryError>;

    /// Every record whose `dealer_name` equals `dealer_name` exactly, oldest
    /// first.
    async fn find_all_by_dealer(
        &self,
        dealer_name: &str,
    ) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError>;

    /// Persist the mutable fields of an existing record.
    async fn update(&self, record: &CustomerInteraction) -> Result<(), InteractionRepositoryError>;
}
