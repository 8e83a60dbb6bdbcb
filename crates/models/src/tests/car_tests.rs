use crate::car::{self, CarChanges, NewCar};
use crate::db;
use anyhow::Result;
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with the car table in place
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = db::connect("sqlite::memory:").await?;
    db::migrate(&db).await?;
    Ok(db)
}

fn blue_bmw() -> NewCar {
    NewCar { color: Some("Blue".into()), brand: Some("BMW".into()) }
}

#[tokio::test]
async fn test_car_create_assigns_id() -> Result<()> {
    let db = setup_test_db().await?;

    let created = car::create(&db, blue_bmw()).await?;
    assert!(!created.id.is_empty());
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    assert_eq!(created.color.as_deref(), Some("Blue"));
    assert_eq!(created.brand.as_deref(), Some("BMW"));
    assert_eq!(created.revision, 0);

    let found = car::find(&db, &created.id).await?;
    assert_eq!(found.map(|m| m.id), Some(created.id));
    Ok(())
}

#[tokio::test]
async fn test_car_create_without_fields() -> Result<()> {
    let db = setup_test_db().await?;

    let created = car::create(&db, NewCar::default()).await?;
    assert_eq!(created.color, None);
    assert_eq!(created.brand, None);
    Ok(())
}

#[tokio::test]
async fn test_car_list() -> Result<()> {
    let db = setup_test_db().await?;
    assert!(car::list(&db).await?.is_empty());

    let a = car::create(&db, blue_bmw()).await?;
    let b = car::create(&db, NewCar { color: Some("Red".into()), brand: None }).await?;

    let ids: Vec<String> = car::list(&db).await?.into_iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&a.id));
    assert!(ids.contains(&b.id));
    Ok(())
}

#[tokio::test]
async fn test_car_update_keeps_omitted_fields() -> Result<()> {
    let db = setup_test_db().await?;
    let created = car::create(&db, blue_bmw()).await?;

    let changes = CarChanges { color: Some(Some("Red".into())), brand: None };
    let updated = car::update(&db, &created.id, &changes).await?.expect("car exists");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.color.as_deref(), Some("Red"));
    assert_eq!(updated.brand.as_deref(), Some("BMW"));
    assert_eq!(updated.revision, 1);
    Ok(())
}

#[tokio::test]
async fn test_car_update_clears_null_fields() -> Result<()> {
    let db = setup_test_db().await?;
    let created = car::create(&db, blue_bmw()).await?;

    let changes = CarChanges { color: None, brand: Some(None) };
    let updated = car::update(&db, &created.id, &changes).await?.expect("car exists");
    assert_eq!(updated.color.as_deref(), Some("Blue"));
    assert_eq!(updated.brand, None);
    Ok(())
}

#[tokio::test]
async fn test_car_update_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    let created = car::create(&db, blue_bmw()).await?;

    let changes = CarChanges { color: Some(Some("Red".into())), brand: Some(Some("BMW".into())) };
    let once = car::update(&db, &created.id, &changes).await?.expect("car exists");
    let twice = car::update(&db, &created.id, &changes).await?.expect("car exists");
    assert_eq!(car::Car::from(once), car::Car::from(twice));
    Ok(())
}

#[tokio::test]
async fn test_car_update_missing_returns_none() -> Result<()> {
    let db = setup_test_db().await?;
    let changes = CarChanges { color: Some(Some("Red".into())), brand: None };
    assert!(car::update(&db, &car::new_id(), &changes).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_car_delete_returns_snapshot() -> Result<()> {
    let db = setup_test_db().await?;
    let created = car::create(&db, blue_bmw()).await?;

    let deleted = car::delete(&db, &created.id).await?.expect("car exists");
    assert_eq!(car::Car::from(deleted), car::Car::from(created.clone()));
    assert!(car::find(&db, &created.id).await?.is_none());
    assert!(car::delete(&db, &created.id).await?.is_none());
    Ok(())
}
