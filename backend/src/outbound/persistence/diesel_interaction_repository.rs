//! PostgreSQL-backed `InteractionRepository` implementation using Diesel ORM.
//!
//! Batches are inserted inside one transaction. The unique constraint on
//! `request_id` is what finally guarantees tracking codes stay unique when two
//! creation calls race, so its violation is surfaced as a typed error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{InteractionRepository, InteractionRepositoryError};
use crate::domain::{CustomerInteraction, CustomerStatus, NewCustomerInteraction, RequestId};

use super::models::{InteractionRow, InteractionUpdate, NewInteractionRow};
use super::pool::{DbPool, PoolError};
use super::schema::customer_interactions;

const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Diesel-backed implementation of the `InteractionRepository` port.
#[derive(Clone)]
pub struct DieselInteractionRepository {
    pool: DbPool,
}

impl DieselInteractionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InteractionRepositoryError {
    InteractionRepositoryError::connection(error.message())
}

/// Pull the offending code out of a Postgres unique violation detail such as
/// `Key (request_id)=(4821) already exists.`
fn duplicate_code_from_details(details: Option<&str>) -> String {
    details
        .and_then(|text| text.split_once("=("))
        .and_then(|(_, rest)| rest.split_once(')'))
        .map_or_else(|| UNKNOWN_REQUEST_ID.to_owned(), |(code, _)| code.to_owned())
}

fn map_diesel_error(error: DieselError) -> InteractionRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            InteractionRepositoryError::duplicate_request_id(duplicate_code_from_details(
                info.details(),
            ))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            InteractionRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => {
            InteractionRepositoryError::query("database query error")
        }
        DieselError::NotFound => InteractionRepositoryError::query("record not found"),
        _ => InteractionRepositoryError::query("database error"),
    }
}

fn row_to_interaction(row: InteractionRow) -> Result<CustomerInteraction, InteractionRepositoryError> {
    let request_id = RequestId::new(row.request_id).map_err(|err| {
        InteractionRepositoryError::query(format!(
            "stored row {} has an invalid tracking code: {err}",
            row.interaction_id
        ))
    })?;
    let customer_status = row
        .customer_status
        .parse::<CustomerStatus>()
        .map_err(|err| InteractionRepositoryError::query(err.to_string()))?;
    Ok(CustomerInteraction {
        interaction_id: row.interaction_id,
        request_id,
        customer_name: row.customer_name,
        phone_number: row.phone_number,
        request_type: row.request_type,
        preferred_time: row.preferred_time,
        additional_info: row.additional_info,
        dealer_name: row.dealer_name,
        dealer_phone_number: row.dealer_phone_number,
        interaction_summary: row.interaction_summary,
        next_steps: row.next_steps,
        customer_status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_interactions(
    rows: Vec<InteractionRow>,
) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError> {
    rows.into_iter().map(row_to_interaction).collect()
}

fn to_new_row(record: &NewCustomerInteraction) -> NewInteractionRow<'_> {
    NewInteractionRow {
        request_id: record.request_id.as_str(),
        customer_name: &record.customer_name,
        phone_number: &record.phone_number,
        request_type: &record.request_type,
        preferred_time: record.preferred_time,
        customer_status: record.customer_status.as_str(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

#[async_trait]
impl InteractionRepository for DieselInteractionRepository {
    async fn insert_batch(
        &self,
        records: &[NewCustomerInteraction],
    ) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_rows: Vec<NewInteractionRow<'_>> = records.iter().map(to_new_row).collect();

        let mut inserted: Vec<InteractionRow> = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    diesel::insert_into(customer_interactions::table)
                        .values(&new_rows)
                        .returning(InteractionRow::as_returning())
                        .get_results(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        // Serial keys follow VALUES order.
        inserted.sort_by_key(|row| row.interaction_id);
        rows_to_interactions(inserted)
    }

    async fn request_id_exists(
        &self,
        request_id: &RequestId,
    ) -> Result<bool, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            customer_interactions::table
                .filter(customer_interactions::request_id.eq(request_id.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_request_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<CustomerInteraction>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<InteractionRow> = customer_interactions::table
            .filter(customer_interactions::request_id.eq(request_id.as_str()))
            .select(InteractionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_interaction).transpose()
    }

    async fn find_all_by_dealer(
        &self,
        dealer_name: &str,
    ) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<InteractionRow> = customer_interactions::table
            .filter(customer_interactions::dealer_name.eq(dealer_name))
            .order_by(customer_interactions::interaction_id.asc())
            .select(InteractionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_interactions(rows)
    }

    async fn update(&self, record: &CustomerInteraction) -> Result<(), InteractionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = InteractionUpdate {
            additional_info: record.additional_info.as_deref(),
            dealer_name: record.dealer_name.as_deref(),
            dealer_phone_number: record.dealer_phone_number.as_deref(),
            customer_status: record.customer_status.as_str(),
            updated_at: record.updated_at,
        };
        let updated = diesel::update(
            customer_interactions::table
                .filter(customer_interactions::request_id.eq(record.request_id.as_str())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(InteractionRepositoryError::not_found(
                record.request_id.as_str(),
            ));
        }
        Ok(())
    }
}
