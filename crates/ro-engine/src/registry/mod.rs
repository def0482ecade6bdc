//! The override registry: store, registration, and resolution.
//!
//! The registry is an explicit object handed by reference to both the
//! controlling actor (registration API) and the call-interception trampoline
//! (resolution API); nothing here lives in ambient global state.

use std::sync::Arc;

use ro_core::hierarchy::TypeGraph;

mod registration;
mod resolution;
mod store;

pub use store::{ActiveGuard, OverrideRecord, OverrideStore, OverrideTable};

pub struct Registry {
    types: Arc<TypeGraph>,
    store: OverrideStore,
}

impl Registry {
    pub fn new(types: Arc<TypeGraph>) -> Self {
        Self {
            types,
            store: OverrideStore::new(),
        }
    }

    pub fn types(&self) -> &TypeGraph {
        &self.types
    }

    pub fn store(&self) -> &OverrideStore {
        &self.store
    }
}
