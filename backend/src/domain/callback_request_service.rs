//! Callback request lifecycle service implementing the driving ports.
//!
//! Creation allocates one tracking code per item and commits the batch in a
//! single repository call. A commit that loses a race for a code is
//! re-allocated and retried a bounded number of times.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CallbackRequestCommand, CallbackRequestQuery, CreatedCallbackRequests, InteractionRepository,
    InteractionRepositoryError,
};
use crate::domain::request_id::REQUEST_ID_LEN;
use crate::domain::request_id_generator::{AllocationError, RequestIdGenerator};
use crate::domain::{
    CallbackRequestItem, CareAgentUpdate, CustomerInteraction, DealerCustomerInfo, Error,
    ErrorCode, NewCustomerInteraction, RequestId,
};

/// Commit attempts per creation call before a collision is reported.
pub const MAX_COMMIT_ATTEMPTS: u32 = 3;

const NO_PAYLOAD: &str = "No payload data";
const REQUEST_ID_NOT_FOUND: &str = "Request ID not found, check once!";
const REQUEST_ID_MALFORMED: &str = "Request ID was wrong, check once again!";
const NAME_MISMATCH: &str =
    "customer_name associated with request_id not matched with name in payload";
const DEALER_NAME_BLANK: &str = "Dealer name should not be empty field";
const DEALER_HAS_NO_RECORDS: &str = "No records found under this dealer name";

/// Lifecycle service over an [`InteractionRepository`].
pub struct CallbackRequestService<R: ?Sized> {
    repo: Arc<R>,
    generator: RequestIdGenerator,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> Clone for CallbackRequestService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            generator: self.generator.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized> CallbackRequestService<R> {
    /// Create a service over `repo`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use callback_desk::domain::{CallbackRequestService, RequestIdGenerator};
    /// # use callback_desk::outbound::memory::InMemoryInteractionRepository;
    /// # use mockable::DefaultClock;
    /// let service = CallbackRequestService::new(
    ///     Arc::new(InMemoryInteractionRepository::default()),
    ///     RequestIdGenerator::random(),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, generator: RequestIdGenerator, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            generator,
            clock,
        }
    }
}

impl<R> CallbackRequestService<R>
where
    R: InteractionRepository + ?Sized,
{
    fn map_repository_error(err: InteractionRepositoryError) -> Error {
        match err {
            InteractionRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("interaction store unavailable: {message}"))
            }
            InteractionRepositoryError::Query { message } => {
                Error::internal(format!("interaction store error: {message}"))
            }
            InteractionRepositoryError::DuplicateRequestId { request_id } => {
                Error::conflict(format!("tracking code {request_id} is already in use"))
            }
            InteractionRepositoryError::NotFound { .. } => Error::not_found(REQUEST_ID_NOT_FOUND),
        }
    }

    fn map_allocation_error(err: AllocationError) -> Error {
        match err {
            AllocationError::Exhausted { attempts } => Error::id_space_exhausted(format!(
                "no free tracking code found after {attempts} draws"
            )),
            AllocationError::Repository(inner) => Self::map_repository_error(inner),
        }
    }

    async fn stage_batch(
        &self,
        items: &[CallbackRequestItem],
    ) -> Result<Vec<NewCustomerInteraction>, Error> {
        let now = self.clock.utc();
        let mut reserved = HashSet::with_capacity(items.len());
        let mut staged = Vec::with_capacity(items.len());
        for item in items {
            let request_id = self
                .generator
                .allocate(self.repo.as_ref(), &reserved)
                .await
                .map_err(Self::map_allocation_error)?;
            debug!(request_id = %request_id, "allocated tracking code");
            reserved.insert(request_id.clone());
            staged.push(NewCustomerInteraction::pending(request_id, item, now));
        }
        Ok(staged)
    }

    async fn commit_with_retry(
        &self,
        items: &[CallbackRequestItem],
    ) -> Result<Vec<CustomerInteraction>, Error> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let staged = self.stage_batch(items).await?;
            match self.repo.insert_batch(&staged).await {
                Ok(stored) => return Ok(stored),
                Err(InteractionRepositoryError::DuplicateRequestId { request_id }) => {
                    warn!(
                        request_id = %request_id,
                        attempt,
                        "tracking code taken by a concurrent insert; re-allocating batch"
                    );
                }
                Err(err) => return Err(Self::map_repository_error(err)),
            }
        }
        Err(Error::conflict(format!(
            "tracking codes kept colliding after {MAX_COMMIT_ATTEMPTS} commit attempts"
        )))
    }

    async fn load(&self, request_id: &RequestId) -> Result<CustomerInteraction, Error> {
        self.repo
            .find_by_request_id(request_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(REQUEST_ID_NOT_FOUND))
    }
}

fn log_failure(operation: &'static str, err: &Error) {
    match err.code() {
        ErrorCode::InternalError | ErrorCode::ServiceUnavailable => {
            error!(operation, code = ?err.code(), error = %err, "callback operation failed");
        }
        _ => warn!(operation, code = ?err.code(), error = %err, "callback operation rejected"),
    }
}

#[async_trait]
impl<R> CallbackRequestCommand for CallbackRequestService<R>
where
    R: InteractionRepository + ?Sized,
{
    async fn create(
        &self,
        items: Vec<CallbackRequestItem>,
    ) -> Result<CreatedCallbackRequests, Error> {
        info!(item_count = items.len(), "creating callback requests");
        if items.is_empty() {
            let err = Error::invalid_request(NO_PAYLOAD);
            log_failure("create", &err);
            return Err(err);
        }

        let stored = self.commit_with_retry(&items).await.inspect_err(|err| {
            log_failure("create", err);
        })?;
        let request_ids: Vec<RequestId> = stored.into_iter().map(|row| row.request_id).collect();
        let created = CreatedCallbackRequests::new(request_ids)
            .ok_or_else(|| Error::internal("store returned no rows for a non-empty batch"))?;
        info!(
            item_count = items.len(),
            request_id = %created.last_request_id(),
            "callback requests created"
        );
        Ok(created)
    }

    async fn update_by_care_agent(
        &self,
        update: CareAgentUpdate,
    ) -> Result<CustomerInteraction, Error> {
        info!(request_id = %update.request_id, "applying care agent update");
        let result = async {
            update
                .validate()
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            let mut record = self.load(&update.request_id).await?;
            if record.customer_name != update.customer_name {
                return Err(Error::conflict(NAME_MISMATCH));
            }
            record.apply_care_agent_update(update, self.clock.utc());
            self.repo
                .update(&record)
                .await
                .map_err(Self::map_repository_error)?;
            Ok(record)
        }
        .await;

        match &result {
            Ok(record) => info!(request_id = %record.request_id, "care agent update applied"),
            Err(err) => log_failure("update_by_care_agent", err),
        }
        result
    }
}

#[async_trait]
impl<R> CallbackRequestQuery for CallbackRequestService<R>
where
    R: InteractionRepository + ?Sized,
{
    async fn track(&self, request_id: &str) -> Result<CustomerInteraction, Error> {
        info!(request_id, "tracking callback request");
        let result = async {
            if request_id.chars().count() != REQUEST_ID_LEN {
                return Err(Error::invalid_request(REQUEST_ID_MALFORMED));
            }
            let request_id =
                RequestId::new(request_id).map_err(|_| Error::invalid_request(REQUEST_ID_MALFORMED))?;
            self.load(&request_id).await
        }
        .await;

        match &result {
            Ok(record) => info!(
                request_id = %record.request_id,
                status = %record.customer_status,
                "callback request tracked"
            ),
            Err(err) => log_failure("track", err),
        }
        result
    }

    async fn list_by_dealer(&self, dealer_name: &str) -> Result<Vec<DealerCustomerInfo>, Error> {
        info!(dealer_name, "listing dealer customers");
        let result = async {
            if dealer_name.trim().is_empty() {
                return Err(Error::invalid_request(DEALER_NAME_BLANK));
            }
            let rows = self
                .repo
                .find_all_by_dealer(dealer_name)
                .await
                .map_err(Self::map_repository_error)?;
            if rows.is_empty() {
                return Err(Error::not_found(DEALER_HAS_NO_RECORDS));
            }
            Ok(rows
                .into_iter()
                .map(DealerCustomerInfo::from)
                .collect::<Vec<_>>())
        }
        .await;

        match &result {
            Ok(customers) => info!(dealer_name, count = customers.len(), "dealer customers listed"),
            Err(err) => log_failure("list_by_dealer", err),
        }
        result
    }
}

#[cfg(test)]
#[path = "callback_request_service_tests.rs"]
mod tests;
