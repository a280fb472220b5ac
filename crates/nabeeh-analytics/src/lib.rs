//! Nabeeh Analytics
//!
//! Aggregation layer: nationwide, per-port and per-inspector risk summaries
//! built from the domain filter and scorer over an [`IncidentStore`].
//!
//! # Operations
//!
//! | Operation | Shape |
//! |---|---|
//! | [`Analytics::nationwide_summary`] | [`NationwideSummary`] |
//! | [`Analytics::port_summaries`] | one [`PortSummary`] per known port |
//! | [`Analytics::port_detail`] | [`PortDetail`] |
//! | [`Analytics::inspector_detail`] | [`InspectorDetail`] |
//! | [`Analytics::inspector_list`] | [`InspectorList`] |
//! | [`Analytics::heatmap`] | [`Heatmap`] |
//! | [`Analytics::port_kpis`] | [`PortKpis`] |
//! | [`Analytics::port_incidents`] | [`PortIncidents`] |
//!
//! Rankings by count break ties by id ascending; recent-incident lists order
//! by timestamp descending, then id ascending.
//!
//! [`IncidentStore`]: nabeeh_domain::IncidentStore

#![warn(missing_docs)]

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod views;

pub use engine::Analytics;
pub use error::AnalyticsError;
pub use views::{
    Heatmap, InspectorDetail, InspectorIncident, InspectorList, InspectorSummary,
    NationwideSummary, PortDetail, PortIncident, PortIncidents, PortKpis, PortSummary,
    SeverityBreakdown, ViolationBreakdown,
};

use nabeeh_domain::IncidentFilter;

/// Inspectors listed on a port detail
pub const TOP_INSPECTORS: usize = 10;

/// Recent incidents listed on a port detail
pub const PORT_RECENT_INCIDENTS: usize = 10;

/// Recent incidents listed on an inspector detail
pub const INSPECTOR_RECENT_INCIDENTS: usize = 20;

/// Inspector list size when the caller gives no limit
pub const DEFAULT_INSPECTOR_LIMIT: usize = 50;

/// Upper bound on the inspector list size
pub const MAX_INSPECTOR_LIMIT: usize = 200;

/// Port incident list size when the caller gives no limit
pub const DEFAULT_INCIDENT_LIMIT: usize = 50;

/// Upper bound on the port incident list size
pub const MAX_INCIDENT_LIMIT: usize = 100;

/// Composite score that maps to full heatmap intensity
pub const HEATMAP_SATURATION_SCORE: f64 = 50.0;

/// Reject a filter whose window is inverted
///
/// The engine itself tolerates inverted windows (they match nothing); the
/// boundary layer calls this first so callers get a distinct error.
pub fn check_range(filter: &IncidentFilter) -> Result<(), AnalyticsError> {
    if filter.is_well_formed() {
        return Ok(());
    }
    match (filter.start, filter.end) {
        (Some(start), Some(end)) => Err(AnalyticsError::InvalidRange { start, end }),
        _ => Ok(()),
    }
}
