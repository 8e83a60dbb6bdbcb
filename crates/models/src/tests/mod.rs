/// Car entity CRUD against an in-memory SQLite database
pub mod car_tests;
