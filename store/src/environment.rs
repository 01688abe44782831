//! Catalog environment.
//!
//! Injected dependencies for the catalog reducer. Remote I/O lives in the
//! imperative shell ([`crate::store::CatalogStore`]), so the reducer needs
//! only a clock for status derivation.

use campus_events_core::environment::Clock;
use std::sync::Arc;

/// Environment dependencies for the catalog reducer.
#[derive(Clone)]
pub struct CatalogEnvironment {
    /// Clock for deriving event status on ingest.
    pub clock: Arc<dyn Clock>,
}

impl CatalogEnvironment {
    /// Creates a new `CatalogEnvironment`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}
