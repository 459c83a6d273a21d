//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::customer_interactions;

/// Row struct for reading from the customer_interactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customer_interactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InteractionRow {
    pub interaction_id: i32,
    pub request_id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub request_type: String,
    pub preferred_time: Option<DateTime<Utc>>,
    pub additional_info: Option<String>,
    pub dealer_name: Option<String>,
    pub dealer_phone_number: Option<String>,
    pub interaction_summary: Option<String>,
    pub next_steps: Option<String>,
    pub customer_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for staging new callback requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customer_interactions)]
pub(crate) struct NewInteractionRow<'a> {
    pub request_id: &'a str,
    pub customer_name: &'a str,
    pub phone_number: &'a str,
    pub request_type: &'a str,
    pub preferred_time: Option<DateTime<Utc>>,
    pub customer_status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for a care agent update.
///
/// `None` clears the column; omitted fields are not preserved.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customer_interactions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct InteractionUpdate<'a> {
    pub additional_info: Option<&'a str>,
    pub dealer_name: Option<&'a str>,
    pub dealer_phone_number: Option<&'a str>,
    pub customer_status: &'a str,
    pub updated_at: DateTime<Utc>,
}
