use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::cars::input::CarInput;
use crate::cars::store::CarStore;
use crate::errors::ServiceError;
use models::car::Car;

/// Outcome of resolving a path id to a live car.
#[derive(Debug)]
pub enum Lookup {
    Found(Car),
    NotFound,
    Failed(ServiceError),
}

/// Validate a car id. Only the lowercase hyphenated UUID form ids are issued in
/// is accepted, so every car has exactly one address.
pub fn parse_id(raw: &str) -> Result<String, ServiceError> {
    match Uuid::try_parse(raw) {
        Ok(id) if id.hyphenated().to_string() == raw => Ok(raw.to_string()),
        _ => Err(ServiceError::MalformedId(raw.to_string())),
    }
}

/// Car operations over a single store handle, shared by all requests.
#[derive(Clone)]
pub struct CarService {
    store: Arc<dyn CarStore>,
}

impl CarService {
    pub fn new(store: Arc<dyn CarStore>) -> Self { Self { store } }

    #[instrument(skip_all)]
    pub async fn create(&self, input: CarInput) -> Result<Car, ServiceError> {
        let new = input.into_new_car()?;
        let car = self.store.insert(new).await?;
        info!(id = %car.id, "car created");
        Ok(car)
    }

    pub async fn list(&self) -> Result<Vec<Car>, ServiceError> {
        let cars = self.store.find_all().await?;
        debug!(count = cars.len(), "cars listed");
        Ok(cars)
    }

    /// Existence check run before every id-scoped operation.
    pub async fn lookup(&self, raw_id: &str) -> Lookup {
        let id = match parse_id(raw_id) {
            Ok(id) => id,
            Err(e) => return Lookup::Failed(e),
        };
        match self.store.find_by_id(&id).await {
            Ok(Some(car)) => Lookup::Found(car),
            Ok(None) => Lookup::NotFound,
            Err(e) => Lookup::Failed(e),
        }
    }

    /// Apply `input` to a car resolved by `lookup`.
    #[instrument(skip_all, fields(id = %existing.id))]
    pub async fn update(&self, existing: &Car, input: CarInput) -> Result<Car, ServiceError> {
        let changes = input.into_changes()?;
        let car = self
            .store
            .update_by_id(&existing.id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("car"))?;
        info!(revision = car.revision, "car updated");
        Ok(car)
    }

    /// Delete a car resolved by `lookup`, returning its last representation.
    #[instrument(skip_all, fields(id = %existing.id))]
    pub async fn delete(&self, existing: &Car) -> Result<Car, ServiceError> {
        let car = self
            .store
            .delete_by_id(&existing.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("car"))?;
        info!("car deleted");
        Ok(car)
    }
}
