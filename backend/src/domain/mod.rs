//! Domain primitives, the lifecycle service, and its ports.
//!
//! Purpose: define the strongly typed values behind a callback request and the
//! service that creates, annotates, and looks them up. Nothing here knows
//! about HTTP or SQL; adapters live in `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - RequestId: four-digit tracking code.
//! - CustomerInteraction and friends: stored record and its inputs.
//! - CallbackRequestService: implementation of the driving ports.

pub mod callback_request_service;
pub mod error;
pub mod interaction;
pub mod ports;
pub mod request_id;
pub mod request_id_generator;
pub mod trace_id;

pub use self::callback_request_service::{CallbackRequestService, MAX_COMMIT_ATTEMPTS};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::interaction::{
    CUSTOMER_NAME_MAX, CallbackRequestItem, CareAgentUpdate, CustomerInteraction, CustomerStatus,
    DEALER_NAME_MAX, DealerCustomerInfo, InteractionValidationError, NewCustomerInteraction,
    PHONE_NUMBER_MAX, REQUEST_TYPE_MAX, UnknownCustomerStatus,
};
pub use self::request_id::{RequestId, RequestIdValidationError};
pub use self::request_id_generator::{
    AllocationError, DEFAULT_DRAW_LIMIT, RandomRequestIdSource, RequestIdGenerator,
    RequestIdSource,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use callback_desk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
