//! Customer interaction records and the values that create or mutate them.
//!
//! One [`CustomerInteraction`] exists per callback request. It is created in
//! the [`CustomerStatus::Pending`] state, moved to
//! [`CustomerStatus::Processing`] by a care agent, and never deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RequestId;

/// Maximum length of `customer_name`.
pub const CUSTOMER_NAME_MAX: usize = 100;
/// Maximum length of `phone_number` and `dealer_phone_number`.
pub const PHONE_NUMBER_MAX: usize = 20;
/// Maximum length of `request_type`.
pub const REQUEST_TYPE_MAX: usize = 50;
/// Maximum length of `dealer_name`.
pub const DEALER_NAME_MAX: usize = 100;

/// Progress of a callback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CustomerStatus {
    /// Submitted by the customer and awaiting a care agent.
    #[default]
    Pending,
    /// Assigned to a dealer by a care agent.
    Processing,
}

impl CustomerStatus {
    /// Stored and serialised representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown customer status: {0}")]
pub struct UnknownCustomerStatus(pub String);

impl FromStr for CustomerStatus {
    type Err = UnknownCustomerStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            other => Err(UnknownCustomerStatus(other.to_owned())),
        }
    }
}

/// Field-level validation failures for interaction inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionValidationError {
    /// A value exceeds its column width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field name as exposed over HTTP.
        field: &'static str,
        /// Column width.
        max: usize,
    },
}

impl InteractionValidationError {
    /// Name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::TooLong { field, .. } => *field,
        }
    }
}

fn check_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), InteractionValidationError> {
    if value.chars().count() > max {
        return Err(InteractionValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_optional_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), InteractionValidationError> {
    value.map_or(Ok(()), |inner| check_len(field, inner, max))
}

/// One validated item from a callback creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequestItem {
    customer_name: String,
    phone_number: String,
    request_type: String,
    preferred_time: Option<DateTime<Utc>>,
}

impl CallbackRequestItem {
    /// Validate column widths and build an item.
    pub fn new(
        customer_name: impl Into<String>,
        phone_number: impl Into<String>,
        request_type: impl Into<String>,
        preferred_time: Option<DateTime<Utc>>,
    ) -> Result<Self, InteractionValidationError> {
        let customer_name = customer_name.into();
        let phone_number = phone_number.into();
        let request_type = request_type.into();
        check_len("customer_name", &customer_name, CUSTOMER_NAME_MAX)?;
        check_len("phone_number", &phone_number, PHONE_NUMBER_MAX)?;
        check_len("request_type", &request_type, REQUEST_TYPE_MAX)?;
        Ok(Self {
            customer_name,
            phone_number,
            request_type,
            preferred_time,
        })
    }

    /// Customer's name as submitted.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Customer's phone number.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Kind of service requested.
    #[must_use]
    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    /// Preferred callback time, if given.
    #[must_use]
    pub fn preferred_time(&self) -> Option<DateTime<Utc>> {
        self.preferred_time
    }
}

/// A care agent's annotation of an existing request.
///
/// Omitted optional fields overwrite the stored values with null; callers
/// must resend everything they want to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareAgentUpdate {
    /// Tracking code of the request being annotated.
    pub request_id: RequestId,
    /// Must equal the stored customer name exactly.
    pub customer_name: String,
    /// Free-text notes from the care agent.
    pub additional_info: Option<String>,
    /// Dealer assigned to the request.
    pub dealer_name: Option<String>,
    /// Dealer contact number.
    pub dealer_phone_number: Option<String>,
}

impl CareAgentUpdate {
    /// Check the dealer fields against their column widths.
    pub fn validate(&self) -> Result<(), InteractionValidationError> {
        check_optional_len("dealer_name", self.dealer_name.as_deref(), DEALER_NAME_MAX)?;
        check_optional_len(
            "dealer_phone_number",
            self.dealer_phone_number.as_deref(),
            PHONE_NUMBER_MAX,
        )
    }
}

/// A record staged for insertion; the store assigns `interaction_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerInteraction {
    /// Freshly allocated tracking code.
    pub request_id: RequestId,
    /// Customer's name.
    pub customer_name: String,
    /// Customer's phone number.
    pub phone_number: String,
    /// Kind of service requested.
    pub request_type: String,
    /// Preferred callback time.
    pub preferred_time: Option<DateTime<Utc>>,
    /// Always [`CustomerStatus::Pending`] for new requests.
    pub customer_status: CustomerStatus,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` on insertion.
    pub updated_at: DateTime<Utc>,
}

impl NewCustomerInteraction {
    /// Stage a pending record for `item` under `request_id`.
    #[must_use]
    pub fn pending(request_id: RequestId, item: &CallbackRequestItem, now: DateTime<Utc>) -> Self {
        Self {
            request_id,
            customer_name: item.customer_name.clone(),
            phone_number: item.phone_number.clone(),
            request_type: item.request_type.clone(),
            preferred_time: item.preferred_time,
            customer_status: CustomerStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored callback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInteraction {
    /// Store-assigned primary key.
    pub interaction_id: i32,
    /// Customer-facing tracking code.
    pub request_id: RequestId,
    /// Customer's name.
    pub customer_name: String,
    /// Customer's phone number.
    pub phone_number: String,
    /// Kind of service requested.
    pub request_type: String,
    /// Preferred callback time.
    pub preferred_time: Option<DateTime<Utc>>,
    /// Care agent notes.
    pub additional_info: Option<String>,
    /// Assigned dealer.
    pub dealer_name: Option<String>,
    /// Assigned dealer's phone number.
    pub dealer_phone_number: Option<String>,
    /// Summary of the call, when one was recorded.
    pub interaction_summary: Option<String>,
    /// Agreed follow-up.
    pub next_steps: Option<String>,
    /// Lifecycle state.
    pub customer_status: CustomerStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl CustomerInteraction {
    /// Materialise a staged record once the store has assigned its key.
    #[must_use]
    pub fn from_new(interaction_id: i32, new: NewCustomerInteraction) -> Self {
        Self {
            interaction_id,
            request_id: new.request_id,
            customer_name: new.customer_name,
            phone_number: new.phone_number,
            request_type: new.request_type,
            preferred_time: new.preferred_time,
            additional_info: None,
            dealer_name: None,
            dealer_phone_number: None,
            interaction_summary: None,
            next_steps: None,
            customer_status: new.customer_status,
            created_at: new.created_at,
            updated_at: new.updated_at,
        }
    }

    /// Apply a care agent update whose name has already been checked.
    pub fn apply_care_agent_update(&mut self, update: CareAgentUpdate, now: DateTime<Utc>) {
        self.additional_info = update.additional_info;
        self.dealer_name = update.dealer_name;
        self.dealer_phone_number = update.dealer_phone_number;
        self.customer_status = CustomerStatus::Processing;
        self.updated_at = now;
    }
}

/// The reduced view of a request that dealers are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerCustomerInfo {
    /// Customer's name.
    pub customer_name: String,
    /// Customer's phone number.
    pub phone_number: String,
    /// Care agent notes.
    pub additional_info: Option<String>,
    /// Preferred callback time.
    pub preferred_time: Option<DateTime<Utc>>,
    /// Kind of service requested.
    pub request_type: String,
}

impl From<CustomerInteraction> for DealerCustomerInfo {
    fn from(value: CustomerInteraction) -> Self {
        Self {
            customer_name: value.customer_name,
            phone_number: value.phone_number,
            additional_info: value.additional_info,
            preferred_time: value.preferred_time,
            request_type: value.request_type,
        }
    }
}
