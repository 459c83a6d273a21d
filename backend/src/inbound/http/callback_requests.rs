//! Callback request HTTP handlers.
//!
//! ```text
//! POST /api/callback_request
//! PUT  /api/callback_request/{request_id}
//! ```

use actix_web::{post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CallbackRequestItem, CareAgentUpdate, Error, RequestId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{CreatedResponse, FailureResponse, UpdatedResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_request_id_error, missing_field_error, parse_optional_preferred_time, too_long_error,
};

/// One item of a creation payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CallbackRequestPayload {
    /// Required, at most 100 characters.
    pub customer_name: Option<String>,
    /// Required, at most 20 characters.
    pub phone_number: Option<String>,
    /// Required, at most 50 characters.
    pub request_type: Option<String>,
    /// RFC 3339, or a naive ISO 8601 date-time read as UTC.
    #[schema(example = "2024-05-01T10:00:00Z")]
    pub preferred_time: Option<String>,
}

/// Care agent update body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CareAgentUpdatePayload {
    /// Must equal the stored customer name exactly.
    pub customer_name: Option<String>,
    /// Notes for the dealer; cleared when omitted.
    pub additional_info: Option<String>,
    /// Dealer to assign, at most 100 characters; cleared when omitted.
    pub dealer_name: Option<String>,
    /// Dealer contact, at most 20 characters; cleared when omitted.
    pub dealer_phone_number: Option<String>,
}

fn parse_item(index: usize, payload: CallbackRequestPayload) -> Result<CallbackRequestItem, Error> {
    let customer_name = payload
        .customer_name
        .ok_or_else(|| missing_field_error("customer_name", Some(index)))?;
    let phone_number = payload
        .phone_number
        .ok_or_else(|| missing_field_error("phone_number", Some(index)))?;
    let request_type = payload
        .request_type
        .ok_or_else(|| missing_field_error("request_type", Some(index)))?;
    let preferred_time = parse_optional_preferred_time(payload.preferred_time.as_deref(), index)?;

    CallbackRequestItem::new(customer_name, phone_number, request_type, preferred_time)
        .map_err(|err| too_long_error(&err, Some(index)))
}

fn parse_items(payload: Vec<CallbackRequestPayload>) -> Result<Vec<CallbackRequestItem>, Error> {
    payload
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_item(index, item))
        .collect()
}

fn parse_update(raw_id: &str, payload: CareAgentUpdatePayload) -> Result<CareAgentUpdate, Error> {
    let request_id = RequestId::new(raw_id).map_err(|_| invalid_request_id_error(raw_id))?;
    let customer_name = payload
        .customer_name
        .ok_or_else(|| missing_field_error("customer_name", None))?;
    let update = CareAgentUpdate {
        request_id,
        customer_name,
        additional_info: payload.additional_info,
        dealer_name: payload.dealer_name,
        dealer_phone_number: payload.dealer_phone_number,
    };
    update.validate().map_err(|err| too_long_error(&err, None))?;
    Ok(update)
}

/// Create one pending callback request per payload item.
#[utoipa::path(
    post,
    path = "/api/callback_request",
    request_body = Vec<CallbackRequestPayload>,
    responses(
        (status = 200, description = "Requests created", body = CreatedResponse),
        (status = 400, description = "Validation or persistence failure", body = FailureResponse)
    ),
    tags = ["callback requests"],
    operation_id = "createCallbackRequests"
)]
#[post("/callback_request")]
pub async fn create_callback_requests(
    state: web::Data<HttpState>,
    payload: web::Json<Vec<CallbackRequestPayload>>,
) -> ApiResult<web::Json<CreatedResponse>> {
    let items = parse_items(payload.into_inner())?;
    let created = state.command.create(items).await?;
    Ok(web::Json(CreatedResponse::from(created)))
}

/// Attach dealer details to a request and move it to Processing.
///
/// Omitted optional fields are cleared.
#[utoipa::path(
    put,
    path = "/api/callback_request/{request_id}",
    request_body = CareAgentUpdatePayload,
    params(("request_id" = String, Path, description = "Four-digit tracking code")),
    responses(
        (status = 200, description = "Request updated", body = UpdatedResponse),
        (status = 400, description = "Unknown code, name mismatch, or invalid body", body = FailureResponse)
    ),
    tags = ["callback requests"],
    operation_id = "updateCallbackRequest"
)]
#[put("/callback_request/{request_id}")]
pub async fn update_callback_request(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CareAgentUpdatePayload>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = parse_update(&path.into_inner(), payload.into_inner())?;
    state.command.update_by_care_agent(update).await?;
    Ok(web::Json(UpdatedResponse::success()))
}
