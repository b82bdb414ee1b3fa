//! Read-only access to stored definition resources.
//!
//! The resolver only ever issues point lookups by kind and name through
//! `DefinitionStore`. `InMemoryStore` backs tests and the helper binaries;
//! `DefinitionIndex` loads one from a schema-validated JSON document.

pub mod index;
pub mod memory;

pub use index::DefinitionIndex;
pub use memory::InMemoryStore;

use crate::definition::{DefinitionKind, DefinitionResource};
use thiserror::Error;

/// Failure returned by a store query.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: DefinitionKind, name: String },
    #[error("query canceled")]
    Canceled,
    #[error("query deadline exceeded")]
    DeadlineExceeded,
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Point lookups against whatever holds the definition resources.
///
/// Implementations must not mutate anything observable; deadlines and
/// cancellation, if any, surface as `StoreError::DeadlineExceeded` and
/// `StoreError::Canceled`.
pub trait DefinitionStore {
    fn get_definition(
        &self,
        kind: DefinitionKind,
        name: &str,
    ) -> Result<DefinitionResource, StoreError>;
}

impl<S: DefinitionStore + ?Sized> DefinitionStore for &S {
    fn get_definition(
        &self,
        kind: DefinitionKind,
        name: &str,
    ) -> Result<DefinitionResource, StoreError> {
        (**self).get_definition(kind, name)
    }
}
