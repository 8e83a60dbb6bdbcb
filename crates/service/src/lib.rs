//! Service layer for car documents.
//! - `CarStore` abstracts the document store; SeaORM and JSON-file backends implement it.
//! - `CarService` owns one store handle and exposes the existence lookup used by id-scoped routes.
//! - Request bodies are coerced to field values here, not in the HTTP layer.

pub mod errors;
pub mod cars;
