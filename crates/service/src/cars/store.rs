use async_trait::async_trait;

use crate::errors::ServiceError;
use models::car::{Car, CarChanges, NewCar};

/// Persistence for car documents.
///
/// Ids passed in are already validated by `parse_id`. Lookups that match
/// nothing return `Ok(None)`; `Err` is reserved for the store itself failing.
#[async_trait]
pub trait CarStore: Send + Sync {
    async fn insert(&self, new: NewCar) -> Result<Car, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Car>, ServiceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Car>, ServiceError>;
    async fn update_by_id(&self, id: &str, changes: &CarChanges) -> Result<Option<Car>, ServiceError>;
    async fn delete_by_id(&self, id: &str) -> Result<Option<Car>, ServiceError>;
}
