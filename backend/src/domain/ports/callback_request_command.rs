//! Driving port for operations that create or change callback requests.

use async_trait::async_trait;

use crate::domain::{CallbackRequestItem, CareAgentUpdate, CustomerInteraction, Error, RequestId};

/// Tracking codes allocated by one creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCallbackRequests {
    last: RequestId,
    request_ids: Vec<RequestId>,
}

impl CreatedCallbackRequests {
    /// Wrap the allocated codes, in input order.
    ///
    /// Returns `None` for an empty list: a successful creation always
    /// allocates at least one code.
    #[must_use]
    pub fn new(request_ids: Vec<RequestId>) -> Option<Self> {
        let last = request_ids.last()?.clone();
        Some(Self { last, request_ids })
    }

    /// The code of the last item, which is what the single `request_id`
    /// response field has always reported.
    #[must_use]
    pub fn last_request_id(&self) -> &RequestId {
        &self.last
    }

    /// Every allocated code, in input order.
    #[must_use]
    pub fn request_ids(&self) -> &[RequestId] {
        &self.request_ids
    }
}

/// Driving port for callback request mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallbackRequestCommand: Send + Sync {
    /// Create one pending request per item, committing all or none.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when `items` is empty.
    /// - `IdSpaceExhausted` when no free tracking code could be drawn.
    /// - `Conflict` when concurrent inserts kept taking the drawn codes.
    /// - `ServiceUnavailable`/`InternalError` on store failure.
    async fn create(&self, items: Vec<CallbackRequestItem>)
    -> Result<CreatedCallbackRequests, Error>;

    /// Annotate a request with dealer details and move it to Processing.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no record uses the tracking code.
    /// - `Conflict` when the supplied customer name differs from the stored
    ///   one; the record is left untouched.
    async fn update_by_care_agent(
        &self,
        update: CareAgentUpdate,
    ) -> Result<CustomerInteraction, Error>;
}
