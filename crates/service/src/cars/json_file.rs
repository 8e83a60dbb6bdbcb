use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use crate::cars::store::CarStore;
use crate::errors::ServiceError;
use models::car::{new_id, Car, CarChanges, NewCar};

/// Car documents kept in one JSON array file.
///
/// The whole collection is held in memory and the file is rewritten after
/// every mutation. Documents stay in insertion order. Without a path the
/// store is purely in-memory.
#[derive(Clone)]
pub struct JsonFileCarStore {
    inner: Arc<RwLock<Vec<Car>>>,
    file_path: Option<PathBuf>,
}

fn storage_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

impl JsonFileCarStore {
    /// Load documents from `path`, creating the file with an empty array if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(storage_err)?;
            }
        }

        let cars: Vec<Car> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(storage_err)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&file_path, b"[]").await.map_err(storage_err)?;
                Vec::new()
            }
            Err(e) => return Err(storage_err(e)),
        };

        Ok(Self { inner: Arc::new(RwLock::new(cars)), file_path: Some(file_path) })
    }

    pub fn in_memory() -> Self {
        Self { inner: Arc::new(RwLock::new(Vec::new())), file_path: None }
    }

    async fn save(&self, cars: &[Car]) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let data = serde_json::to_vec_pretty(cars).map_err(storage_err)?;
        // rename is atomic on the same filesystem; readers see the old or the new array
        let tmp = staging_path(path);
        fs::write(&tmp, data).await.map_err(storage_err)?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(storage_err(e));
        }
        Ok(())
    }
}

/// Sibling of `path` that a new version is written to before replacing it.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl CarStore for JsonFileCarStore {
    async fn insert(&self, new: NewCar) -> Result<Car, ServiceError> {
        let car = Car { id: new_id(), color: new.color, brand: new.brand, revision: 0 };
        let mut cars = self.inner.write().await;
        cars.push(car.clone());
        if let Err(e) = self.save(&cars).await {
            cars.pop();
            return Err(e);
        }
        Ok(car)
    }

    async fn find_all(&self) -> Result<Vec<Car>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Car>, ServiceError> {
        let cars = self.inner.read().await;
        Ok(cars.iter().find(|c| c.id == id).cloned())
    }

    async fn update_by_id(&self, id: &str, changes: &CarChanges) -> Result<Option<Car>, ServiceError> {
        let mut cars = self.inner.write().await;
        let Some(idx) = cars.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let previous = cars[idx].clone();
        if !changes.apply_to(&mut cars[idx]) {
            return Ok(Some(previous));
        }
        if let Err(e) = self.save(&cars).await {
            cars[idx] = previous;
            return Err(e);
        }
        Ok(Some(cars[idx].clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Car>, ServiceError> {
        let mut cars = self.inner.write().await;
        let Some(idx) = cars.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let removed = cars.remove(idx);
        if let Err(e) = self.save(&cars).await {
            cars.insert(idx, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }
}
