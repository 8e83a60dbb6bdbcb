use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub revision: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A car document as it is returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub revision: i32,
}

impl From<Model> for Car {
    fn from(m: Model) -> Self {
        Self { id: m.id, color: m.color, brand: m.brand, revision: m.revision }
    }
}

/// Field values for a car that does not exist yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewCar {
    pub color: Option<String>,
    pub brand: Option<String>,
}

/// Per-field changes; `None` leaves the field as it is, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarChanges {
    pub color: Option<Option<String>>,
    pub brand: Option<Option<String>>,
}

impl CarChanges {
    /// Apply to `car`, bumping its revision when a field actually changed.
    pub fn apply_to(&self, car: &mut Car) -> bool {
        let color = self.color.clone().unwrap_or_else(|| car.color.clone());
        let brand = self.brand.clone().unwrap_or_else(|| car.brand.clone());
        if color == car.color && brand == car.brand {
            return false;
        }
        car.color = color;
        car.brand = brand;
        car.revision += 1;
        true
    }
}

/// Fresh store-assigned identifier.
pub fn new_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

fn db_err(e: DbErr) -> ModelError {
    ModelError::Db(e.to_string())
}

pub async fn create(db: &DatabaseConnection, new: NewCar) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(new_id()),
        color: Set(new.color),
        brand: Set(new.brand),
        revision: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(db_err)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find()
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(db_err)
}

pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(db_err)
}

/// Returns `None` when no row has `id`, including when it disappears mid-update.
pub async fn update(db: &DatabaseConnection, id: &str, changes: &CarChanges) -> Result<Option<Model>, ModelError> {
    let Some(found) = find(db, id).await? else {
        return Ok(None);
    };

    let mut car = Car::from(found.clone());
    if !changes.apply_to(&mut car) {
        return Ok(Some(found));
    }

    let mut am: ActiveModel = found.into();
    am.color = Set(car.color);
    am.brand = Set(car.brand);
    am.revision = Set(car.revision);
    am.updated_at = Set(Utc::now().into());
    match am.update(db).await {
        Ok(m) => Ok(Some(m)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(db_err(e)),
    }
}

/// Delete by id and hand back the last stored representation.
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, ModelError> {
    let Some(found) = find(db, id).await? else {
        return Ok(None);
    };
    let res = Entity::delete_by_id(id).exec(db).await.map_err(db_err)?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(found))
}
