//! In-memory interaction store.
//!
//! Mirrors the PostgreSQL adapter's observable rules: `request_id` is unique,
//! batches commit all or nothing, keys are assigned serially, and dealer
//! listings come back in key order. Contents vanish with the process.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{InteractionRepository, InteractionRepositoryError};
use crate::domain::{CustomerInteraction, NewCustomerInteraction, RequestId};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<CustomerInteraction>,
    next_id: i32,
}

/// Process-local implementation of the `InteractionRepository` port.
#[derive(Debug, Default)]
pub struct InMemoryInteractionRepository {
    table: RwLock<Table>,
}

impl InMemoryInteractionRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

#[async_trait]
impl InteractionRepository for InMemoryInteractionRepository {
    async fn insert_batch(
        &self,
        records: &[NewCustomerInteraction],
    ) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError> {
        let mut table = self.table.write().await;

        let mut seen: HashSet<&RequestId> = table.rows.iter().map(|row| &row.request_id).collect();
        for record in records {
            if !seen.insert(&record.request_id) {
                return Err(InteractionRepositoryError::duplicate_request_id(
                    record.request_id.as_str(),
                ));
            }
        }
        drop(seen);

        let mut inserted = Vec::with_capacity(records.len());
        for record in records {
            table.next_id += 1;
            let row = CustomerInteraction::from_new(table.next_id, record.clone());
            inserted.push(row.clone());
            table.rows.push(row);
        }
        Ok(inserted)
    }

    async fn request_id_exists(
        &self,
        request_id: &RequestId,
    ) -> Result<bool, InteractionRepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().any(|row| &row.request_id == request_id))
    }

    async fn find_by_request_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<CustomerInteraction>, InteractionRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|row| &row.request_id == request_id)
            .cloned())
    }

    async fn find_all_by_dealer(
        &self,
        dealer_name: &str,
    ) -> Result<Vec<CustomerInteraction>, InteractionRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| row.dealer_name.as_deref() == Some(dealer_name))
            .cloned()
            .collect())
    }

    async fn update(&self, record: &CustomerInteraction) -> Result<(), InteractionRepositoryError> {
        let mut table = self.table.write().await;
        let stored = table
            .rows
            .iter_mut()
            .find(|row| row.request_id == record.request_id)
            .ok_or_else(|| InteractionRepositoryError::not_found(record.request_id.as_str()))?;
        stored.additional_info = record.additional_info.clone();
        stored.dealer_name = record.dealer_name.clone();
        stored.dealer_phone_number = record.dealer_phone_number.clone();
        stored.customer_status = record.customer_status;
        stored.updated_at = record.updated_at;
        Ok(())
    }
}
