use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::cars::store::CarStore;
use crate::errors::ServiceError;
use models::car::{self, Car, CarChanges, NewCar};

/// SeaORM-backed store (Postgres or SQLite).
pub struct SeaOrmCarStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CarStore for SeaOrmCarStore {
    async fn insert(&self, new: NewCar) -> Result<Car, ServiceError> {
        Ok(car::create(&self.db, new).await?.into())
    }

    async fn find_all(&self) -> Result<Vec<Car>, ServiceError> {
        Ok(car::list(&self.db).await?.into_iter().map(Car::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Car>, ServiceError> {
        Ok(car::find(&self.db, id).await?.map(Car::from))
    }

    async fn update_by_id(&self, id: &str, changes: &CarChanges) -> Result<Option<Car>, ServiceError> {
        Ok(car::update(&self.db, id, changes).await?.map(Car::from))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Car>, ServiceError> {
        Ok(car::delete(&self.db, id).await?.map(Car::from))
    }
}
