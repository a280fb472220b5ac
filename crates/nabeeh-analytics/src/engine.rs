//! Analytics engine: filter, score, shape

use crate::aggregate::{
    distinct_ports, group_by, last_incident_at, most_recent, rank_inspectors, round_score,
    severity_breakdown, unique_inspectors, violation_breakdown,
};
use crate::views::{
    Heatmap, InspectorDetail, InspectorIncident, InspectorList, InspectorSummary,
    NationwideSummary, PortDetail, PortIncident, PortIncidents, PortKpis, PortSummary,
};
use crate::{
    AnalyticsError, DEFAULT_INCIDENT_LIMIT, DEFAULT_INSPECTOR_LIMIT, HEATMAP_SATURATION_SCORE,
    INSPECTOR_RECENT_INCIDENTS, MAX_INCIDENT_LIMIT, MAX_INSPECTOR_LIMIT, PORT_RECENT_INCIDENTS,
    TOP_INSPECTORS,
};
use nabeeh_domain::{Incident, IncidentFilter, IncidentStore, Port, RiskScorer};
use tracing::debug;

/// Read-only analytics over an incident store
///
/// Every operation filters the store's snapshot, scores the result with the
/// configured [`RiskScorer`] and shapes it into one of the view types. Nothing
/// is cached and nothing is mutated.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nabeeh_analytics::Analytics;
/// use nabeeh_domain::{Incident, IncidentFilter, IncidentStore, Inspector, Port, RiskScorer};
///
/// struct Empty;
///
/// impl IncidentStore for Empty {
///     fn incidents(&self) -> &[Incident] { &[] }
///     fn ports(&self) -> &[Port] { &[] }
///     fn port_by_id(&self, _: &str) -> Option<&Port> { None }
///     fn inspectors(&self) -> &[Inspector] { &[] }
///     fn inspector_by_id(&self, _: &str) -> Option<&Inspector> { None }
/// }
///
/// let analytics = Analytics::new(Empty, RiskScorer::default());
/// let filter = IncidentFilter::between(
///     Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap(),
/// );
///
/// let summary = analytics.nationwide_summary(&filter);
/// assert_eq!(summary.total_incidents, 0);
/// assert!(analytics.port_detail("port_01", &filter).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Analytics<S> {
    store: S,
    scorer: RiskScorer,
}

impl<S: IncidentStore> Analytics<S> {
    /// Create an engine over a store handle and scorer
    pub fn new(store: S, scorer: RiskScorer) -> Self {
        Self { store, scorer }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Nationwide aggregates over every matching incident
    pub fn nationwide_summary(&self, filter: &IncidentFilter) -> NationwideSummary {
        let matched = filter.apply(self.store.incidents());
        let score = self.scorer.composite_score(matched.iter().copied());

        debug!(incidents = matched.len(), score, "Computed nationwide summary");

        NationwideSummary {
            total_risk_score: round_score(score),
            total_incidents: matched.len(),
            total_inspectors_impacted: unique_inspectors(&matched),
            total_ports_affected: distinct_ports(&matched).len(),
            last_incident_at: last_incident_at(&matched),
            incidents_by_severity: severity_breakdown(&matched),
            incidents_by_violation: violation_breakdown(&matched),
        }
    }

    /// One summary per known port, in store order
    ///
    /// Any port predicate on `filter` is replaced by each port's own id, so
    /// ports without matching incidents still appear with a zero score.
    pub fn port_summaries(&self, filter: &IncidentFilter) -> Vec<PortSummary> {
        let matched = self.unscoped_by_port(filter);
        let by_port = group_by(&matched, |i| i.port_id.as_str());

        let summaries: Vec<PortSummary> = self
            .store
            .ports()
            .iter()
            .map(|port| {
                let incidents = by_port.get(port.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                self.port_summary(port, incidents)
            })
            .collect();

        debug!(ports = summaries.len(), incidents = matched.len(), "Computed port summaries");
        summaries
    }

    /// Port summary with breakdowns, top inspectors and recent incidents
    pub fn port_detail(
        &self,
        port_id: &str,
        filter: &IncidentFilter,
    ) -> Result<PortDetail, AnalyticsError> {
        let port = self.find_port(port_id)?;
        let scoped = filter.clone().with_port(port_id);
        let matched = scoped.apply(self.store.incidents());

        let top_inspectors = rank_inspectors(&matched)
            .into_iter()
            .take(TOP_INSPECTORS)
            .map(|(id, incidents)| self.inspector_summary(id, &incidents))
            .collect();

        let recent_incidents = most_recent(&matched, PORT_RECENT_INCIDENTS)
            .into_iter()
            .map(PortIncident::from)
            .collect();

        debug!(port_id, incidents = matched.len(), "Computed port detail");

        Ok(PortDetail {
            summary: self.port_summary(port, &matched),
            violations_breakdown: violation_breakdown(&matched),
            severity_breakdown: severity_breakdown(&matched),
            top_inspectors,
            recent_incidents,
        })
    }

    /// Analytics for one inspector
    ///
    /// Other predicates on `filter` (including port) still apply. A known
    /// inspector with no matching incidents yields a zero-valued detail.
    pub fn inspector_detail(
        &self,
        inspector_id: &str,
        filter: &IncidentFilter,
    ) -> Result<InspectorDetail, AnalyticsError> {
        let inspector = self
            .store
            .inspector_by_id(inspector_id)
            .ok_or_else(|| AnalyticsError::InspectorNotFound(inspector_id.to_string()))?;

        let scoped = filter.clone().with_inspector(inspector_id);
        let matched = scoped.apply(self.store.incidents());
        let (score, level) = self.scorer.assess(matched.iter().copied());

        let recent_incidents = most_recent(&matched, INSPECTOR_RECENT_INCIDENTS)
            .into_iter()
            .map(|incident| self.inspector_incident(incident))
            .collect();

        debug!(inspector_id, incidents = matched.len(), score, "Computed inspector detail");

        Ok(InspectorDetail {
            id: inspector.id.clone(),
            display_name: inspector.display_name.clone(),
            risk_score: round_score(score),
            risk_level: level,
            total_incidents: matched.len(),
            last_incident_at: last_incident_at(&matched),
            violations_breakdown: violation_breakdown(&matched),
            severity_breakdown: severity_breakdown(&matched),
            ports_affected: distinct_ports(&matched),
            recent_incidents,
        })
    }

    /// Inspectors ranked by incident count
    ///
    /// `limit` defaults to [`DEFAULT_INSPECTOR_LIMIT`] and is clamped to
    /// `1..=MAX_INSPECTOR_LIMIT`. The reported total counts every distinct
    /// inspector in the filtered set, not just the returned entries.
    pub fn inspector_list(&self, filter: &IncidentFilter, limit: Option<usize>) -> InspectorList {
        let limit = limit
            .unwrap_or(DEFAULT_INSPECTOR_LIMIT)
            .clamp(1, MAX_INSPECTOR_LIMIT);
        let matched = filter.apply(self.store.incidents());
        let ranked = rank_inspectors(&matched);
        let total_unique_inspectors = ranked.len();

        let inspectors = ranked
            .into_iter()
            .take(limit)
            .map(|(id, incidents)| self.inspector_summary(id, &incidents))
            .collect();

        debug!(total_unique_inspectors, limit, "Computed inspector list");

        InspectorList {
            total_unique_inspectors,
            inspectors,
        }
    }

    /// Heat intensity per known port, `min(1, score / 50)`
    pub fn heatmap(&self, filter: &IncidentFilter) -> Heatmap {
        let matched = self.unscoped_by_port(filter);
        let by_port = group_by(&matched, |i| i.port_id.as_str());

        let points = self
            .store
            .ports()
            .iter()
            .map(|port| {
                let incidents = by_port.get(port.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                let score = self.scorer.composite_score(incidents.iter().copied());
                let intensity = if score > 0.0 {
                    (score / HEATMAP_SATURATION_SCORE).min(1.0)
                } else {
                    0.0
                };
                [port.lat, port.lng, intensity]
            })
            .collect();

        Heatmap {
            points,
            from: filter.start,
            to: filter.end,
        }
    }

    /// Compact KPI block for one port
    pub fn port_kpis(
        &self,
        port_id: &str,
        filter: &IncidentFilter,
    ) -> Result<PortKpis, AnalyticsError> {
        let port = self.find_port(port_id)?;
        let scoped = filter.clone().with_port(port_id);
        let matched = scoped.apply(self.store.incidents());
        let (score, level) = self.scorer.assess(matched.iter().copied());

        Ok(PortKpis {
            port_id: port.id.clone(),
            from: filter.start,
            to: filter.end,
            risk_score: round_score(score),
            risk_level: level,
            counts: violation_breakdown(&matched),
            total_events: matched.len(),
            unique_inspectors: unique_inspectors(&matched),
            last_incident_at: last_incident_at(&matched),
        })
    }

    /// Newest incidents at one port
    ///
    /// `limit` defaults to [`DEFAULT_INCIDENT_LIMIT`] and is clamped to
    /// `1..=MAX_INCIDENT_LIMIT`.
    pub fn port_incidents(
        &self,
        port_id: &str,
        filter: &IncidentFilter,
        limit: Option<usize>,
    ) -> Result<PortIncidents, AnalyticsError> {
        let port = self.find_port(port_id)?;
        let limit = limit
            .unwrap_or(DEFAULT_INCIDENT_LIMIT)
            .clamp(1, MAX_INCIDENT_LIMIT);
        let scoped = filter.clone().with_port(port_id);
        let matched = scoped.apply(self.store.incidents());

        Ok(PortIncidents {
            port_id: port.id.clone(),
            from: filter.start,
            to: filter.end,
            incidents: most_recent(&matched, limit).into_iter().cloned().collect(),
        })
    }

    fn find_port(&self, port_id: &str) -> Result<&Port, AnalyticsError> {
        self.store
            .port_by_id(port_id)
            .ok_or_else(|| AnalyticsError::PortNotFound(port_id.to_string()))
    }

    /// Filtered set with any port predicate lifted, for per-port grouping
    fn unscoped_by_port(&self, filter: &IncidentFilter) -> Vec<&Incident> {
        let unscoped = IncidentFilter {
            port_id: None,
            ..filter.clone()
        };
        unscoped.apply(self.store.incidents())
    }

    fn port_summary(&self, port: &Port, incidents: &[&Incident]) -> PortSummary {
        let (score, level) = self.scorer.assess(incidents.iter().copied());
        PortSummary {
            id: port.id.clone(),
            name_ar: port.name_ar.clone(),
            name_en: port.name_en.clone(),
            lat: port.lat,
            lng: port.lng,
            risk_score: round_score(score),
            risk_level: level,
            incident_count: incidents.len(),
            unique_inspectors_count: unique_inspectors(incidents),
            last_incident_at: last_incident_at(incidents),
        }
    }

    fn inspector_summary(&self, id: &str, incidents: &[&Incident]) -> InspectorSummary {
        let (score, level) = self.scorer.assess(incidents.iter().copied());
        InspectorSummary {
            id: id.to_string(),
            risk_score: round_score(score),
            risk_level: level,
            incident_count: incidents.len(),
            last_incident_at: last_incident_at(incidents),
        }
    }

    fn inspector_incident(&self, incident: &Incident) -> InspectorIncident {
        let (port_name_ar, port_name_en) = self
            .store
            .port_by_id(&incident.port_id)
            .map(|p| (p.name_ar.clone(), p.name_en.clone()))
            .unwrap_or_default();

        InspectorIncident {
            id: incident.id.clone(),
            timestamp: incident.timestamp,
            violation_type: incident.violation_type.clone(),
            severity: incident.severity,
            port_id: incident.port_id.clone(),
            port_name_ar,
            port_name_en,
            confidence: incident.confidence,
        }
    }
}
