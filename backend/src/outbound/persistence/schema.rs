//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Callback requests and their care agent annotations.
    ///
    /// `request_id` carries a unique constraint named
    /// `customer_interactions_request_id_key`.
    customer_interactions (interaction_id) {
        /// Serial primary key.
        interaction_id -> Int4,
        /// Four-digit tracking code.
        #[max_length = 4]
        request_id -> Varchar,
        #[max_length = 100]
        customer_name -> Varchar,
        #[max_length = 20]
        phone_number -> Varchar,
        #[max_length = 50]
        request_type -> Varchar,
        preferred_time -> Nullable<Timestamptz>,
        additional_info -> Nullable<Text>,
        #[max_length = 100]
        dealer_name -> Nullable<Varchar>,
        #[max_length = 20]
        dealer_phone_number -> Nullable<Varchar>,
        interaction_summary -> Nullable<Text>,
        #[max_length = 255]
        next_steps -> Nullable<Varchar>,
        /// `Pending` or `Processing`.
        #[max_length = 50]
        customer_status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
