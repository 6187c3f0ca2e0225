//! Storage Trait
//!
//! This module defines the `ActivityStore` trait, the interface between the web
//! layer and a persistence backend.
//!
//! Implementors of this trait are responsible for:
//! - Listing activities together with the emails of their participants
//! - Registering a student for an activity, enforcing capacity and uniqueness
//! - Removing a registration
//!
//! Every method runs as one unit of work: either all of its writes land or none do.

use crate::error_handling::types::{RegistrationError, StorageError};
use crate::storage::types::ActivityCatalog;
use async_trait::async_trait;

#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Returns every activity with its participant emails.
    async fn list_activities(&self) -> Result<ActivityCatalog, StorageError>;

    /// Registers `email` for the activity called `activity_name`.
    ///
    /// The user is created on the fly when no user with this email exists yet.
    async fn signup(&self, activity_name: &str, email: &str) -> Result<(), RegistrationError>;

    /// Removes the registration of `email` from `activity_name`.
    async fn unregister(&self, activity_name: &str, email: &str) -> Result<(), RegistrationError>;
}
