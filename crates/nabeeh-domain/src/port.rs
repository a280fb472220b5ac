//! Port and inspector reference data
//!
//! Both tables are loaded once and never mutated.

use serde::{Deserialize, Serialize};

/// A border port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port identifier (e.g. `port_01`)
    pub id: String,

    /// Arabic display name
    pub name_ar: String,

    /// English display name
    #[serde(default)]
    pub name_en: String,

    /// ISO country code
    pub country: String,

    /// Latitude in decimal degrees
    pub lat: f64,

    /// Longitude in decimal degrees
    pub lng: f64,
}

/// A masked inspector identity
///
/// Inspectors are tied to one primary port but may appear in incidents at
/// other ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspector {
    /// Inspector identifier (e.g. `insp_0042`)
    pub id: String,

    /// Masked display name, never the real name
    pub display_name: String,

    /// Primary port assignment
    pub port_id: String,
}
