//! Trait definitions for external interactions
//!
//! These traits define the boundary between the scoring/aggregation logic and
//! whatever holds the data. Implementations live in other crates.

use crate::{Incident, Inspector, Port};

/// Read-only access to a loaded incident snapshot
///
/// Implemented by the infrastructure layer (nabeeh-store). Nothing in the
/// snapshot changes after it is built, so every method borrows.
pub trait IncidentStore {
    /// All incidents, in load order
    fn incidents(&self) -> &[Incident];

    /// All ports, in load order
    fn ports(&self) -> &[Port];

    /// Look up a port by id
    fn port_by_id(&self, id: &str) -> Option<&Port>;

    /// All inspectors, in load order
    fn inspectors(&self) -> &[Inspector];

    /// Look up an inspector by id
    fn inspector_by_id(&self, id: &str) -> Option<&Inspector>;
}

impl<S: IncidentStore + ?Sized> IncidentStore for std::sync::Arc<S> {
    fn incidents(&self) -> &[Incident] {
        (**self).incidents()
    }

    fn ports(&self) -> &[Port] {
        (**self).ports()
    }

    fn port_by_id(&self, id: &str) -> Option<&Port> {
        (**self).port_by_id(id)
    }

    fn inspectors(&self) -> &[Inspector] {
        (**self).inspectors()
    }

    fn inspector_by_id(&self, id: &str) -> Option<&Inspector> {
        (**self).inspector_by_id(id)
    }
}
