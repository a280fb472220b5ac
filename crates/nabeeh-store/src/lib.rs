//! Nabeeh Storage Layer
//!
//! Implements the [`IncidentStore`] trait over an in-memory snapshot.
//!
//! # Architecture
//!
//! - The snapshot is a JSON document with `ports`, `inspectors` and
//!   `incidents` arrays, loaded once at startup
//! - Records are validated on load; a bad record fails the whole load
//! - After load the store is immutable and shared behind an `Arc`
//! - [`SnapshotCell`] guarantees the load runs at most once
//!
//! # Examples
//!
//! ```no_run
//! use nabeeh_store::MemoryStore;
//!
//! let store = MemoryStore::from_json_file("data/sample_snapshot.json").unwrap();
//! // Store is now ready for analytics queries
//! ```

#![warn(missing_docs)]

pub mod cell;
pub mod snapshot;

pub use cell::SnapshotCell;
pub use snapshot::{Snapshot, TaxonomyReport};

use nabeeh_domain::{Incident, IncidentStore, Inspector, Port};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while building the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Snapshot file could not be read
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON for the expected shape
    #[error("Failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records in the same table share an id
    #[error("Duplicate {kind} id: {id}")]
    Duplicate {
        /// Table the duplicate was found in
        kind: &'static str,
        /// The repeated id
        id: String,
    },

    /// A record points at a port or inspector that does not exist
    #[error("{kind} {id} references unknown {target} {target_id}")]
    DanglingReference {
        /// Kind of the referring record
        kind: &'static str,
        /// Id of the referring record
        id: String,
        /// Kind of the missing record
        target: &'static str,
        /// Id of the missing record
        target_id: String,
    },

    /// Incident confidence outside [0, 1]
    #[error("Incident {id} has confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange {
        /// Incident id
        id: String,
        /// Offending value
        value: f64,
    },
}

/// In-memory implementation of [`IncidentStore`]
///
/// Holds the three tables in load order plus id indexes for the two
/// reference tables.
///
/// # Thread Safety
///
/// The store has no interior mutability; share it with `Arc<MemoryStore>`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ports: Vec<Port>,
    inspectors: Vec<Inspector>,
    incidents: Vec<Incident>,
    port_index: HashMap<String, usize>,
    inspector_index: HashMap<String, usize>,
}

impl MemoryStore {
    /// Build a store from a snapshot, validating every record
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        snapshot.validate()?;

        let Snapshot {
            ports,
            inspectors,
            incidents,
        } = snapshot;

        let port_index = ports
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let inspector_index = inspectors
            .iter()
            .enumerate()
            .map(|(i, insp)| (insp.id.clone(), i))
            .collect();

        info!(
            ports = ports.len(),
            inspectors = inspectors.len(),
            incidents = incidents.len(),
            "Incident snapshot loaded"
        );

        Ok(Self {
            ports,
            inspectors,
            incidents,
            port_index,
            inspector_index,
        })
    }

    /// Parse and build a store from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Read, parse and build a store from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Loading incident snapshot from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

impl IncidentStore for MemoryStore {
    fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    fn ports(&self) -> &[Port] {
        &self.ports
    }

    fn port_by_id(&self, id: &str) -> Option<&Port> {
        self.port_index.get(id).map(|&i| &self.ports[i])
    }

    fn inspectors(&self) -> &[Inspector] {
        &self.inspectors
    }

    fn inspector_by_id(&self, id: &str) -> Option<&Inspector> {
        self.inspector_index.get(id).map(|&i| &self.inspectors[i])
    }
}
