//! Storage subsystem
//!
//! This module provides the persistence layer for activities, users and their
//! registrations.
//!
//! Components:
//! - `storage_trait`: the `ActivityStore` trait handed to the web layer.
//! - `types`: the response shapes produced by the store.
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `db_entities`: SeaORM entity models for the database backend.
//! - `seed`: the sample catalog written on first start.

pub mod database_storage;
pub mod db_entities;
pub mod seed;
pub mod storage_trait;
pub mod types;

pub use database_storage::DatabaseStorage;
pub use storage_trait::ActivityStore;
pub use types::{ActivityCatalog, ActivityDetails};
