//! Car documents: storage backends, request-body coercion and the service facade.

pub mod input;
pub mod json_file;
pub mod seaorm;
pub mod service;
pub mod store;

use std::sync::Arc;

use configs::{DatabaseConfig, StoreKind};
use tracing::info;

pub use self::input::CarInput;
pub use models::car::{Car, CarChanges, NewCar};
pub use self::service::{parse_id, CarService, Lookup};
pub use self::store::CarStore;

use crate::errors::ServiceError;
use json_file::JsonFileCarStore;
use seaorm::SeaOrmCarStore;

/// Open the backend selected by the connection string.
///
/// SQL urls connect through SeaORM and create the `car` table when missing;
/// `file:` urls load (or create) a JSON document file.
pub async fn open_store(cfg: &DatabaseConfig) -> Result<Arc<dyn CarStore>, ServiceError> {
    let kind = cfg.store_kind().map_err(|e| ServiceError::Storage(e.to_string()))?;
    match kind {
        StoreKind::Sql => {
            let db = models::db::connect_with_config(cfg).await?;
            models::db::migrate(&db).await?;
            info!(backend = "sql", "car store ready");
            Ok(Arc::new(SeaOrmCarStore { db }))
        }
        StoreKind::JsonFile => {
            let path = cfg
                .file_path()
                .ok_or_else(|| ServiceError::Storage("file: url without a path".into()))?;
            let store = JsonFileCarStore::open(path).await?;
            info!(backend = "json_file", %path, "car store ready");
            Ok(Arc::new(store))
        }
    }
}
