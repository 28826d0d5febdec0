//! Pet catalog: listings, reports, adoption applications and profiles.

use std::future::Future;
use std::pin::Pin;

pub mod application;
pub mod application_store;
pub mod filters;
pub mod pet;
pub mod pet_store;
pub mod profile;

pub use application::{AdoptionApplication, ApplicationStatus};
pub use application_store::{ApplicationStore, SqliteApplicationStore};
pub use filters::{PetFilterParams, PetFilters};
pub use pet::{Pet, PetGender, PetReport, PetSize};
pub use pet_store::{PetStore, SqlitePetStore};
pub use profile::{Profile, ProfileStore, SqliteProfileStore};

/// Boxed future type for catalog store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
