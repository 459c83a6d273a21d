//! JSON response envelopes.
//!
//! Every response carries `status`. Success bodies add `message`, `data`, or
//! tracking codes depending on the endpoint; failures add `message`, `code`,
//! and, when available, `details` and `trace_id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{CustomerInteraction, DealerCustomerInfo, Error, ErrorCode};
use crate::domain::ports::CreatedCallbackRequests;

/// Outcome marker shared by all envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EnvelopeStatus {
    /// The operation completed.
    Success,
    /// The operation was rejected or failed; see `code`.
    Failed,
}

/// Body returned by `POST /api/callback_request`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    /// Always `Success`.
    pub status: EnvelopeStatus,
    /// Fixed confirmation text.
    pub message: String,
    /// Tracking code of the last submitted item.
    #[schema(example = "4821")]
    pub request_id: String,
    /// Tracking codes of every submitted item, in input order.
    pub request_ids: Vec<String>,
}

impl From<CreatedCallbackRequests> for CreatedResponse {
    fn from(value: CreatedCallbackRequests) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: "Callback request created".to_owned(),
            request_id: value.last_request_id().to_string(),
            request_ids: value
                .request_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Body returned by `PUT /api/callback_request/{request_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse {
    /// Always `Success`.
    pub status: EnvelopeStatus,
    /// Fixed confirmation text.
    pub message: String,
}

impl UpdatedResponse {
    /// The only body this endpoint returns on success.
    pub fn success() -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: "Callback request updated successfully".to_owned(),
        }
    }
}

/// Full projection of a stored callback request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InteractionBody {
    /// Store-assigned row identity.
    pub interaction_id: i32,
    /// Four-digit tracking code.
    pub request_id: String,
    /// Name given when the request was created.
    pub customer_name: String,
    /// Number to call back.
    pub phone_number: String,
    /// Free-form category such as `service` or `demo`.
    pub request_type: String,
    /// RFC 3339 timestamp.
    pub preferred_time: Option<String>,
    /// Care agent notes.
    pub additional_info: Option<String>,
    /// Dealer assigned by the care agent.
    pub dealer_name: Option<String>,
    /// Dealer contact number.
    pub dealer_phone_number: Option<String>,
    /// Outcome of the call, when recorded.
    pub interaction_summary: Option<String>,
    /// Planned follow-up, when recorded.
    pub next_steps: Option<String>,
    /// `Pending` or `Processing`.
    pub customer_status: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 time of the last change.
    pub updated_at: String,
}

impl From<CustomerInteraction> for InteractionBody {
    fn from(value: CustomerInteraction) -> Self {
        Self {
            interaction_id: value.interaction_id,
            request_id: value.request_id.to_string(),
            customer_name: value.customer_name,
            phone_number: value.phone_number,
            request_type: value.request_type,
            preferred_time: value.preferred_time.map(|time| time.to_rfc3339()),
            additional_info: value.additional_info,
            dealer_name: value.dealer_name,
            dealer_phone_number: value.dealer_phone_number,
            interaction_summary: value.interaction_summary,
            next_steps: value.next_steps,
            customer_status: value.customer_status.to_string(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Body returned by `GET /api/track`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrackResponse {
    /// Always `Success`.
    pub status: EnvelopeStatus,
    /// The tracked record.
    pub data: InteractionBody,
}

impl From<CustomerInteraction> for TrackResponse {
    fn from(value: CustomerInteraction) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: value.into(),
        }
    }
}

/// What a dealer may see about one customer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DealerCustomerBody {
    /// Customer to call.
    pub customer_name: String,
    /// Number to call.
    pub phone_number: String,
    /// Care agent notes.
    pub additional_info: Option<String>,
    /// RFC 3339 timestamp.
    pub preferred_time: Option<String>,
    /// Category given at creation.
    pub request_type: String,
}

impl From<DealerCustomerInfo> for DealerCustomerBody {
    fn from(value: DealerCustomerInfo) -> Self {
        Self {
            customer_name: value.customer_name,
            phone_number: value.phone_number,
            additional_info: value.additional_info,
            preferred_time: value.preferred_time.map(|time| time.to_rfc3339()),
            request_type: value.request_type,
        }
    }
}

/// Body returned by `GET /api/dealers/customer_info`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DealerCustomersResponse {
    /// Always `Success`.
    pub status: EnvelopeStatus,
    /// Customers in creation order; never empty.
    pub data: Vec<DealerCustomerBody>,
}

impl From<Vec<DealerCustomerInfo>> for DealerCustomersResponse {
    fn from(value: Vec<DealerCustomerInfo>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: value.into_iter().map(DealerCustomerBody::from).collect(),
        }
    }
}

/// Body returned for every failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FailureResponse {
    /// Always `Failed`.
    pub status: EnvelopeStatus,
    /// Human-readable reason.
    pub message: String,
    /// Stable failure category.
    pub code: ErrorCode,
    /// Field-level context for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// Matches the `trace-id` response header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl From<&Error> for FailureResponse {
    fn from(value: &Error) -> Self {
        Self {
            status: EnvelopeStatus::Failed,
            message: value.message().to_owned(),
            code: value.code(),
            details: value.details().cloned(),
            trace_id: value.trace_id().map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CallbackRequestItem, NewCustomerInteraction, RequestId};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    fn record() -> CustomerInteraction {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let item = CallbackRequestItem::new("Jo", "555", "repair", Some(now)).expect("item");
        CustomerInteraction::from_new(
            1,
            NewCustomerInteraction::pending(RequestId::new("4821").expect("code"), &item, now),
        )
    }

    #[rstest]
    fn created_response_reports_last_and_all_codes() {
        let created = CreatedCallbackRequests::new(vec![
            RequestId::new("1111").expect("code"),
            RequestId::new("2222").expect("code"),
        ])
        .expect("non-empty");
        let body = serde_json::to_value(CreatedResponse::from(created)).expect("serialise");
        assert_eq!(
            body,
            json!({
                "status": "Success",
                "message": "Callback request created",
                "request_id": "2222",
                "request_ids": ["1111", "2222"],
            })
        );
    }

    #[rstest]
    fn track_response_uses_rfc3339_timestamps() {
        let body = serde_json::to_value(TrackResponse::from(record())).expect("serialise");
        assert_eq!(body["status"], "Success");
        assert_eq!(body["data"]["customer_status"], "Pending");
        assert_eq!(body["data"]["preferred_time"], "2024-05-01T09:00:00+00:00");
        assert_eq!(body["data"]["dealer_name"], Value::Null);
    }

    #[rstest]
    fn dealer_projection_omits_internal_fields() {
        let info = DealerCustomerInfo::from(record());
        let body = serde_json::to_value(DealerCustomersResponse::from(vec![info])).expect("json");
        let entry = body["data"][0].as_object().expect("object");
        let mut keys: Vec<&str> = entry.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "additional_info",
                "customer_name",
                "phone_number",
                "preferred_time",
                "request_type"
            ]
        );
    }

    #[rstest]
    fn failure_response_skips_absent_fields() {
        let body =
            serde_json::to_value(FailureResponse::from(&Error::not_found("missing"))).expect("json");
        assert_eq!(
            body,
            json!({ "status": "Failed", "message": "missing", "code": "not_found" })
        );
    }
}
